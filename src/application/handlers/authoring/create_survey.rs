//! CreateSurveyHandler - Command handler for authoring a new survey.

use std::sync::Arc;

use tracing::info;

use crate::application::handlers::loaders::load_respondent;
use crate::domain::foundation::{RespondentId, SectionId, SurveyId, Timestamp};
use crate::domain::survey::{QuestionDraft, Survey, SurveyError, SurveySettings};
use crate::ports::{RespondentRepository, SectionRepository, SurveyRepository};

/// Command to create a survey with its questions and assignments.
#[derive(Debug, Clone)]
pub struct CreateSurveyCommand {
    pub creator_id: RespondentId,
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub due_date: Option<Timestamp>,
    pub section_ids: Vec<SectionId>,
    pub questions: Vec<QuestionDraft>,
    pub now: Timestamp,
}

pub struct CreateSurveyHandler {
    respondents: Arc<dyn RespondentRepository>,
    sections: Arc<dyn SectionRepository>,
    surveys: Arc<dyn SurveyRepository>,
}

impl CreateSurveyHandler {
    pub fn new(
        respondents: Arc<dyn RespondentRepository>,
        sections: Arc<dyn SectionRepository>,
        surveys: Arc<dyn SurveyRepository>,
    ) -> Self {
        Self {
            respondents,
            sections,
            surveys,
        }
    }

    pub async fn handle(&self, cmd: CreateSurveyCommand) -> Result<Survey, SurveyError> {
        let creator = load_respondent(self.respondents.as_ref(), &cmd.creator_id).await?;
        if !creator.is_teacher() {
            return Err(SurveyError::Forbidden);
        }
        require_sections(self.sections.as_ref(), &cmd.section_ids).await?;

        let mut survey = Survey::new(
            SurveyId::new(),
            *creator.id(),
            cmd.title,
            cmd.description,
            cmd.now,
        )?;
        survey.update_settings(
            SurveySettings {
                is_active: Some(cmd.is_active),
                due_date: Some(cmd.due_date),
                ..Default::default()
            },
            cmd.now,
        )?;
        survey.assign_sections(cmd.section_ids, cmd.now);
        for draft in cmd.questions {
            survey.add_question(draft, cmd.now)?;
        }

        self.surveys.save(&survey).await?;

        info!(
            survey_id = %survey.id(),
            creator_id = %survey.creator_id(),
            questions = survey.questions().len(),
            "Survey created"
        );
        Ok(survey)
    }
}

/// Fails with `NotFound` on the first id that has no section.
pub(crate) async fn require_sections(
    sections: &dyn SectionRepository,
    ids: &[SectionId],
) -> Result<(), SurveyError> {
    let found = sections.find_by_ids(ids).await?;
    match ids.iter().find(|id| !found.iter().any(|s| s.id() == *id)) {
        Some(missing) => Err(SurveyError::not_found("Section", missing)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::respondent::Respondent;
    use crate::domain::section::Section;
    use crate::domain::survey::QuestionKind;

    async fn setup() -> (Arc<InMemoryStore>, CreateSurveyHandler, Respondent, Section) {
        let store = Arc::new(InMemoryStore::new());
        let section = Section::new(SectionId::new(), "Homeroom", "HR", "", Timestamp::now()).unwrap();
        SectionRepository::save(store.as_ref(), &section).await.unwrap();
        let teacher = Respondent::teacher(RespondentId::new(), "Mr. Okafor");
        RespondentRepository::save(store.as_ref(), &teacher).await.unwrap();
        let handler = CreateSurveyHandler::new(store.clone(), store.clone(), store.clone());
        (store, handler, teacher, section)
    }

    fn command(creator_id: RespondentId, sections: Vec<SectionId>) -> CreateSurveyCommand {
        CreateSurveyCommand {
            creator_id,
            title: "Start of term".to_string(),
            description: "Quick check-in".to_string(),
            is_active: true,
            due_date: None,
            section_ids: sections,
            questions: vec![
                QuestionDraft {
                    text: "Mood?".to_string(),
                    kind: QuestionKind::Likert(Default::default()),
                    is_required: true,
                },
                QuestionDraft {
                    text: "Anything else?".to_string(),
                    kind: QuestionKind::LongAnswer,
                    is_required: false,
                },
            ],
            now: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn creates_survey_with_ordered_questions() {
        let (store, handler, teacher, section) = setup().await;
        let survey = handler
            .handle(command(*teacher.id(), vec![*section.id()]))
            .await
            .unwrap();

        let stored = SurveyRepository::find_by_id(store.as_ref(), survey.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.questions().len(), 2);
        assert_eq!(stored.questions()[1].order(), 1);
        assert!(stored.is_assigned_to(section.id()));
    }

    #[tokio::test]
    async fn students_cannot_author() {
        let (store, handler, _, section) = setup().await;
        let student = Respondent::student(RespondentId::new(), "Pat", *section.id());
        RespondentRepository::save(store.as_ref(), &student).await.unwrap();

        let err = handler.handle(command(*student.id(), vec![])).await.unwrap_err();
        assert_eq!(err, SurveyError::Forbidden);
    }

    #[tokio::test]
    async fn unknown_section_is_not_found() {
        let (_, handler, teacher, _) = setup().await;
        let err = handler
            .handle(command(*teacher.id(), vec![SectionId::new()]))
            .await
            .unwrap_err();
        assert!(matches!(err, SurveyError::NotFound { resource: "Section", .. }));
    }

    #[tokio::test]
    async fn invalid_question_is_rejected() {
        let (_, handler, teacher, _) = setup().await;
        let mut cmd = command(*teacher.id(), vec![]);
        cmd.questions.push(QuestionDraft {
            text: "Pick".to_string(),
            kind: QuestionKind::MultipleChoice {
                choices: vec!["Only".to_string()],
            },
            is_required: true,
        });
        let err = handler.handle(cmd).await.unwrap_err();
        assert!(matches!(err, SurveyError::InvalidDefinition { .. }));
    }
}
