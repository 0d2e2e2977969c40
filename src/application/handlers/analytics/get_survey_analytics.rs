//! GetSurveyAnalyticsHandler - Query handler for per-question summaries.

use std::sync::Arc;

use tracing::debug;

use crate::application::handlers::loaders::load_owned_survey;
use crate::domain::analytics::{AnalyticsAggregator, SurveyAnalytics};
use crate::domain::foundation::{RespondentId, SurveyId};
use crate::domain::survey::SurveyError;
use crate::ports::{ResponseReader, ResponseRepository, SurveyRepository};

#[derive(Debug, Clone)]
pub struct GetSurveyAnalyticsQuery {
    pub teacher_id: RespondentId,
    pub survey_id: SurveyId,
}

/// Recomputes analytics from committed responses on every call.
pub struct GetSurveyAnalyticsHandler {
    surveys: Arc<dyn SurveyRepository>,
    responses: Arc<dyn ResponseRepository>,
    reader: Arc<dyn ResponseReader>,
}

impl GetSurveyAnalyticsHandler {
    pub fn new(
        surveys: Arc<dyn SurveyRepository>,
        responses: Arc<dyn ResponseRepository>,
        reader: Arc<dyn ResponseReader>,
    ) -> Self {
        Self {
            surveys,
            responses,
            reader,
        }
    }

    pub async fn handle(&self, query: GetSurveyAnalyticsQuery) -> Result<SurveyAnalytics, SurveyError> {
        let survey =
            load_owned_survey(self.surveys.as_ref(), &query.survey_id, &query.teacher_id).await?;

        let total = self.responses.count_for_survey(survey.id()).await?;
        let answers = self.reader.answers_for_survey(survey.id()).await?;
        debug!(
            survey_id = %query.survey_id,
            responses = total,
            answers = answers.len(),
            "Aggregating survey analytics"
        );

        Ok(AnalyticsAggregator::aggregate(&survey, total, &answers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::analytics::Summary;
    use crate::domain::foundation::Timestamp;
    use crate::domain::survey::{
        Answer, AnswerValue, QuestionDraft, QuestionKind, Response, Survey,
    };

    async fn two_votes() -> (Arc<InMemoryStore>, Survey, RespondentId) {
        let store = Arc::new(InMemoryStore::new());
        let now = Timestamp::now();
        let teacher = RespondentId::new();
        let mut survey = Survey::new(SurveyId::new(), teacher, "Poll", "", now).unwrap();
        survey
            .add_question(
                QuestionDraft {
                    text: "Choose".to_string(),
                    kind: QuestionKind::MultipleChoice {
                        choices: vec!["A".to_string(), "B".to_string()],
                    },
                    is_required: true,
                },
                now,
            )
            .unwrap();
        SurveyRepository::save(store.as_ref(), &survey).await.unwrap();

        for pick in ["A", "B"] {
            let response = Response::complete(*survey.id(), RespondentId::new(), now);
            let answer = Answer::new(
                *response.id(),
                *survey.questions()[0].id(),
                AnswerValue::Choice(pick.to_string()),
            );
            store.submit(&response, &[answer], survey.revision()).await.unwrap();
        }
        (store, survey, teacher)
    }

    #[tokio::test]
    async fn owner_gets_choice_counts() {
        let (store, survey, teacher) = two_votes().await;
        let handler = GetSurveyAnalyticsHandler::new(store.clone(), store.clone(), store);

        let analytics = handler
            .handle(GetSurveyAnalyticsQuery {
                teacher_id: teacher,
                survey_id: *survey.id(),
            })
            .await
            .unwrap();

        assert_eq!(analytics.total_responses, 2);
        let Some(Summary::Choice(summary)) = analytics.summary_for(survey.questions()[0].id())
        else {
            panic!("expected choice summary");
        };
        assert_eq!(summary.count_for("A"), Some(1));
        assert_eq!(summary.count_for("B"), Some(1));
        assert_eq!(summary.total, 2);
    }

    #[tokio::test]
    async fn non_owner_is_forbidden() {
        let (store, survey, _) = two_votes().await;
        let handler = GetSurveyAnalyticsHandler::new(store.clone(), store.clone(), store);

        let err = handler
            .handle(GetSurveyAnalyticsQuery {
                teacher_id: RespondentId::new(),
                survey_id: *survey.id(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, SurveyError::Forbidden);
    }
}
