//! Question-set edits: add, update, remove and reorder.
//!
//! All four are rejected with `SurveyLocked` once the survey has a response.
//! The handler checks first for a clear error; the store re-checks inside
//! its write so a submission committed in between still blocks the edit.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::handlers::loaders::load_owned_survey;
use crate::domain::foundation::{QuestionId, RespondentId, SurveyId, Timestamp};
use crate::domain::survey::{Question, QuestionDraft, Survey, SurveyError};
use crate::ports::{ResponseRepository, SurveyRepository};

/// Shared plumbing of the question-set handlers.
struct QuestionEditor {
    surveys: Arc<dyn SurveyRepository>,
    responses: Arc<dyn ResponseRepository>,
}

impl QuestionEditor {
    async fn load_unlocked(
        &self,
        survey_id: &SurveyId,
        teacher_id: &RespondentId,
    ) -> Result<Survey, SurveyError> {
        let survey = load_owned_survey(self.surveys.as_ref(), survey_id, teacher_id).await?;
        if self.responses.count_for_survey(survey.id()).await? > 0 {
            warn!(survey_id = %survey_id, "Question edit rejected: survey has responses");
            return Err(SurveyError::SurveyLocked);
        }
        Ok(survey)
    }

    async fn store(&self, survey: &Survey, action: &str) -> Result<(), SurveyError> {
        self.surveys.update_questions(survey).await?;
        info!(
            survey_id = %survey.id(),
            questions = survey.questions().len(),
            action,
            "Survey questions changed"
        );
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AddQuestionCommand {
    pub teacher_id: RespondentId,
    pub survey_id: SurveyId,
    pub draft: QuestionDraft,
    pub now: Timestamp,
}

pub struct AddQuestionHandler {
    editor: QuestionEditor,
}

impl AddQuestionHandler {
    pub fn new(surveys: Arc<dyn SurveyRepository>, responses: Arc<dyn ResponseRepository>) -> Self {
        Self {
            editor: QuestionEditor { surveys, responses },
        }
    }

    /// Appends the question after the current last one.
    pub async fn handle(&self, cmd: AddQuestionCommand) -> Result<Question, SurveyError> {
        let mut survey = self.editor.load_unlocked(&cmd.survey_id, &cmd.teacher_id).await?;
        let question = survey.add_question(cmd.draft, cmd.now)?.clone();
        self.editor.store(&survey, "add").await?;
        Ok(question)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateQuestionCommand {
    pub teacher_id: RespondentId,
    pub survey_id: SurveyId,
    pub question_id: QuestionId,
    pub draft: QuestionDraft,
    pub now: Timestamp,
}

pub struct UpdateQuestionHandler {
    editor: QuestionEditor,
}

impl UpdateQuestionHandler {
    pub fn new(surveys: Arc<dyn SurveyRepository>, responses: Arc<dyn ResponseRepository>) -> Self {
        Self {
            editor: QuestionEditor { surveys, responses },
        }
    }

    pub async fn handle(&self, cmd: UpdateQuestionCommand) -> Result<Question, SurveyError> {
        let mut survey = self.editor.load_unlocked(&cmd.survey_id, &cmd.teacher_id).await?;
        if !survey.update_question(&cmd.question_id, cmd.draft, cmd.now)? {
            return Err(SurveyError::not_found("Question", cmd.question_id));
        }
        self.editor.store(&survey, "update").await?;
        survey
            .question(&cmd.question_id)
            .cloned()
            .ok_or_else(|| SurveyError::not_found("Question", cmd.question_id))
    }
}

#[derive(Debug, Clone)]
pub struct RemoveQuestionCommand {
    pub teacher_id: RespondentId,
    pub survey_id: SurveyId,
    pub question_id: QuestionId,
    pub now: Timestamp,
}

pub struct RemoveQuestionHandler {
    editor: QuestionEditor,
}

impl RemoveQuestionHandler {
    pub fn new(surveys: Arc<dyn SurveyRepository>, responses: Arc<dyn ResponseRepository>) -> Self {
        Self {
            editor: QuestionEditor { surveys, responses },
        }
    }

    pub async fn handle(&self, cmd: RemoveQuestionCommand) -> Result<(), SurveyError> {
        let mut survey = self.editor.load_unlocked(&cmd.survey_id, &cmd.teacher_id).await?;
        if !survey.remove_question(&cmd.question_id, cmd.now) {
            return Err(SurveyError::not_found("Question", cmd.question_id));
        }
        self.editor.store(&survey, "remove").await
    }
}

#[derive(Debug, Clone)]
pub struct ReorderQuestionsCommand {
    pub teacher_id: RespondentId,
    pub survey_id: SurveyId,
    /// Every question id of the survey, in the new order.
    pub question_ids: Vec<QuestionId>,
    pub now: Timestamp,
}

pub struct ReorderQuestionsHandler {
    editor: QuestionEditor,
}

impl ReorderQuestionsHandler {
    pub fn new(surveys: Arc<dyn SurveyRepository>, responses: Arc<dyn ResponseRepository>) -> Self {
        Self {
            editor: QuestionEditor { surveys, responses },
        }
    }

    pub async fn handle(&self, cmd: ReorderQuestionsCommand) -> Result<Vec<Question>, SurveyError> {
        let mut survey = self.editor.load_unlocked(&cmd.survey_id, &cmd.teacher_id).await?;
        survey.reorder_questions(&cmd.question_ids, cmd.now)?;
        self.editor.store(&survey, "reorder").await?;
        Ok(survey.questions().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{DomainError, ErrorCode};
    use crate::domain::survey::{Answer, QuestionKind, Response};
    use async_trait::async_trait;

    fn draft(text: &str) -> QuestionDraft {
        QuestionDraft {
            text: text.to_string(),
            kind: QuestionKind::ShortAnswer,
            is_required: false,
        }
    }

    async fn setup() -> (Arc<InMemoryStore>, Survey) {
        let store = Arc::new(InMemoryStore::new());
        let now = Timestamp::now();
        let mut survey = Survey::new(SurveyId::new(), RespondentId::new(), "Quiz", "", now).unwrap();
        survey.add_question(draft("One"), now).unwrap();
        survey.add_question(draft("Two"), now).unwrap();
        SurveyRepository::save(store.as_ref(), &survey).await.unwrap();
        (store, survey)
    }

    async fn stored(store: &InMemoryStore, id: &SurveyId) -> Survey {
        SurveyRepository::find_by_id(store, id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn add_appends_after_last_question() {
        let (store, survey) = setup().await;
        let handler = AddQuestionHandler::new(store.clone(), store.clone());
        let question = handler
            .handle(AddQuestionCommand {
                teacher_id: *survey.creator_id(),
                survey_id: *survey.id(),
                draft: draft("Three"),
                now: Timestamp::now(),
            })
            .await
            .unwrap();

        assert_eq!(question.order(), 2);
        assert_eq!(stored(&store, survey.id()).await.questions().len(), 3);
    }

    #[tokio::test]
    async fn edits_are_locked_once_a_response_exists() {
        let (store, survey) = setup().await;
        let response = Response::complete(*survey.id(), RespondentId::new(), Timestamp::now());
        store.submit(&response, &[], survey.revision()).await.unwrap();

        let handler = RemoveQuestionHandler::new(store.clone(), store.clone());
        let err = handler
            .handle(RemoveQuestionCommand {
                teacher_id: *survey.creator_id(),
                survey_id: *survey.id(),
                question_id: *survey.questions()[0].id(),
                now: Timestamp::now(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, SurveyError::SurveyLocked);
        assert_eq!(stored(&store, survey.id()).await.questions().len(), 2);
    }

    /// Reports no responses, as if the handler's check ran before a
    /// concurrent submission committed.
    struct StaleCount;

    #[async_trait]
    impl ResponseRepository for StaleCount {
        async fn submit(&self, _r: &Response, _a: &[Answer], _v: u32) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::InternalError, "unused"))
        }

        async fn exists_for(&self, _s: &SurveyId, _r: &RespondentId) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn count_for_survey(&self, _s: &SurveyId) -> Result<u32, DomainError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn store_rejects_edit_that_raced_a_submission() {
        let (store, survey) = setup().await;
        let response = Response::complete(*survey.id(), RespondentId::new(), Timestamp::now());
        store.submit(&response, &[], survey.revision()).await.unwrap();

        let handler = AddQuestionHandler::new(store.clone(), Arc::new(StaleCount));
        let err = handler
            .handle(AddQuestionCommand {
                teacher_id: *survey.creator_id(),
                survey_id: *survey.id(),
                draft: draft("Late"),
                now: Timestamp::now(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, SurveyError::SurveyLocked);
    }

    #[tokio::test]
    async fn update_and_reorder_apply_to_stored_survey() {
        let (store, survey) = setup().await;
        let first = *survey.questions()[0].id();
        let second = *survey.questions()[1].id();

        UpdateQuestionHandler::new(store.clone(), store.clone())
            .handle(UpdateQuestionCommand {
                teacher_id: *survey.creator_id(),
                survey_id: *survey.id(),
                question_id: first,
                draft: draft("One, reworded"),
                now: Timestamp::now(),
            })
            .await
            .unwrap();

        let reordered = ReorderQuestionsHandler::new(store.clone(), store.clone())
            .handle(ReorderQuestionsCommand {
                teacher_id: *survey.creator_id(),
                survey_id: *survey.id(),
                question_ids: vec![second, first],
                now: Timestamp::now(),
            })
            .await
            .unwrap();
        assert_eq!(reordered[0].id(), &second);

        let saved = stored(&store, survey.id()).await;
        assert_eq!(saved.questions()[1].text(), "One, reworded");
        assert_eq!(saved.questions()[1].order(), 1);
    }

    #[tokio::test]
    async fn unknown_question_is_not_found() {
        let (store, survey) = setup().await;
        let err = RemoveQuestionHandler::new(store.clone(), store.clone())
            .handle(RemoveQuestionCommand {
                teacher_id: *survey.creator_id(),
                survey_id: *survey.id(),
                question_id: QuestionId::new(),
                now: Timestamp::now(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SurveyError::NotFound { resource: "Question", .. }));
    }
}
