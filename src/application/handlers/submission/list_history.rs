//! ListHistoryHandler - Query handler for a respondent's past responses.

use std::sync::Arc;

use crate::application::handlers::loaders::load_respondent;
use crate::domain::foundation::RespondentId;
use crate::domain::survey::SurveyError;
use crate::ports::{RespondentRepository, ResponseReader, ResponseSummary};

#[derive(Debug, Clone)]
pub struct ListHistoryQuery {
    pub respondent_id: RespondentId,
}

/// Lists every response of a respondent, newest first, whatever the current
/// state of the survey it belongs to.
pub struct ListHistoryHandler {
    respondents: Arc<dyn RespondentRepository>,
    reader: Arc<dyn ResponseReader>,
}

impl ListHistoryHandler {
    pub fn new(
        respondents: Arc<dyn RespondentRepository>,
        reader: Arc<dyn ResponseReader>,
    ) -> Self {
        Self {
            respondents,
            reader,
        }
    }

    pub async fn handle(&self, query: ListHistoryQuery) -> Result<Vec<ResponseSummary>, SurveyError> {
        let respondent = load_respondent(self.respondents.as_ref(), &query.respondent_id).await?;
        Ok(self.reader.history_for(respondent.id()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{SectionId, SurveyId, Timestamp};
    use crate::domain::respondent::Respondent;
    use crate::domain::section::Section;
    use crate::domain::survey::{Response, Survey, SurveySettings};
    use crate::ports::{ResponseRepository, SectionRepository, SurveyRepository};

    #[tokio::test]
    async fn history_survives_survey_closing_and_is_newest_first() {
        let store = Arc::new(InMemoryStore::new());
        let now = Timestamp::now();
        let section = Section::new(SectionId::new(), "Period 4", "P4", "", now).unwrap();
        SectionRepository::save(store.as_ref(), &section).await.unwrap();
        let student = Respondent::student(RespondentId::new(), "Kai", *section.id());
        RespondentRepository::save(store.as_ref(), &student).await.unwrap();

        let mut first = Survey::new(SurveyId::new(), RespondentId::new(), "First", "", now).unwrap();
        let second = Survey::new(SurveyId::new(), RespondentId::new(), "Second", "", now).unwrap();
        SurveyRepository::save(store.as_ref(), &first).await.unwrap();
        SurveyRepository::save(store.as_ref(), &second).await.unwrap();

        store
            .submit(&Response::complete(*first.id(), *student.id(), now.minus_days(2)), &[], 0)
            .await
            .unwrap();
        store
            .submit(&Response::complete(*second.id(), *student.id(), now.minus_days(1)), &[], 0)
            .await
            .unwrap();

        first
            .update_settings(
                SurveySettings {
                    is_active: Some(false),
                    ..Default::default()
                },
                now,
            )
            .unwrap();
        store.update_settings(&first).await.unwrap();

        let handler = ListHistoryHandler::new(store.clone(), store.clone());
        let history = handler
            .handle(ListHistoryQuery {
                respondent_id: *student.id(),
            })
            .await
            .unwrap();

        let titles: Vec<&str> = history.iter().map(|h| h.survey_title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn unknown_respondent_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let handler = ListHistoryHandler::new(store.clone(), store);
        let err = handler
            .handle(ListHistoryQuery {
                respondent_id: RespondentId::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SurveyError::NotFound { .. }));
    }
}
