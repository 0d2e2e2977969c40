//! ListSurveyResponsesHandler - Query handler for the owner's paged list of
//! a survey's responses.

use std::sync::Arc;

use serde::Serialize;

use crate::application::handlers::loaders::load_owned_survey;
use crate::domain::foundation::{RespondentId, SurveyId};
use crate::domain::survey::SurveyError;
use crate::ports::{ResponseListOptions, ResponseReader, SurveyRepository, SurveyResponseRow};

/// Rows per page of the response listing.
pub const RESPONSES_PER_PAGE: u32 = 20;

#[derive(Debug, Clone)]
pub struct ListSurveyResponsesQuery {
    pub teacher_id: RespondentId,
    pub survey_id: SurveyId,
    /// Case-insensitive part of a respondent's display name.
    pub search: Option<String>,
    /// 1-based. Zero and missing mean the first page.
    pub page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyResponsePage {
    pub survey_id: SurveyId,
    /// Newest first.
    pub items: Vec<SurveyResponseRow>,
    pub total: u32,
    pub page: u32,
    pub per_page: u32,
    pub page_count: u32,
}

pub struct ListSurveyResponsesHandler {
    surveys: Arc<dyn SurveyRepository>,
    reader: Arc<dyn ResponseReader>,
}

impl ListSurveyResponsesHandler {
    pub fn new(surveys: Arc<dyn SurveyRepository>, reader: Arc<dyn ResponseReader>) -> Self {
        Self { surveys, reader }
    }

    pub async fn handle(
        &self,
        query: ListSurveyResponsesQuery,
    ) -> Result<SurveyResponsePage, SurveyError> {
        let survey =
            load_owned_survey(self.surveys.as_ref(), &query.survey_id, &query.teacher_id).await?;

        let requested = query.page.unwrap_or(1).max(1);
        let options = |page: u32| {
            ResponseListOptions::paginated(page, RESPONSES_PER_PAGE)
                .with_search(query.search.as_deref())
        };

        let mut page = requested;
        let mut list = self.reader.list_for_survey(survey.id(), &options(page)).await?;
        let page_count = list.total.div_ceil(RESPONSES_PER_PAGE).max(1);

        // Past the end: show the last page instead.
        if page > page_count {
            page = page_count;
            list = self.reader.list_for_survey(survey.id(), &options(page)).await?;
        }

        Ok(SurveyResponsePage {
            survey_id: *survey.id(),
            items: list.items,
            total: list.total,
            page,
            per_page: RESPONSES_PER_PAGE,
            page_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{SectionId, Timestamp};
    use crate::domain::respondent::Respondent;
    use crate::domain::section::Section;
    use crate::domain::survey::{Response, Survey};
    use crate::ports::{RespondentRepository, ResponseRepository, SectionRepository};

    struct Fixture {
        handler: ListSurveyResponsesHandler,
        owner: RespondentId,
        survey: SurveyId,
    }

    /// Survey with `count` responses, one second apart, from students named
    /// "Student 1".."Student N" plus one from "Zed".
    async fn fixture(count: usize) -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let now = Timestamp::now();
        let owner = RespondentId::new();
        let section = Section::new(SectionId::new(), "Period 1", "P1", "", now).unwrap();
        SectionRepository::save(store.as_ref(), &section).await.unwrap();

        let survey = Survey::new(SurveyId::new(), owner, "Exit ticket", "", now).unwrap();
        SurveyRepository::save(store.as_ref(), &survey).await.unwrap();

        let mut names: Vec<String> = (1..=count).map(|i| format!("Student {}", i)).collect();
        names.push("Zed".to_string());
        for (i, name) in names.iter().enumerate() {
            let student = Respondent::student(RespondentId::new(), name.as_str(), *section.id());
            RespondentRepository::save(store.as_ref(), &student).await.unwrap();
            let response = Response::complete(*survey.id(), *student.id(), now.plus_secs(i as i64));
            store.submit(&response, &[], survey.revision()).await.unwrap();
        }

        Fixture {
            handler: ListSurveyResponsesHandler::new(store.clone(), store),
            owner,
            survey: *survey.id(),
        }
    }

    fn query(f: &Fixture, search: Option<&str>, page: Option<u32>) -> ListSurveyResponsesQuery {
        ListSurveyResponsesQuery {
            teacher_id: f.owner,
            survey_id: f.survey,
            search: search.map(str::to_string),
            page,
        }
    }

    #[tokio::test]
    async fn first_page_is_newest_twenty() {
        let f = fixture(24).await;
        let page = f.handler.handle(query(&f, None, None)).await.unwrap();

        assert_eq!(page.total, 25);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.items[0].respondent_name, "Zed");
        assert!(page
            .items
            .windows(2)
            .all(|pair| pair[0].submitted_at >= pair[1].submitted_at));
    }

    #[tokio::test]
    async fn page_past_the_end_shows_the_last_page() {
        let f = fixture(24).await;
        let page = f.handler.handle(query(&f, None, Some(9))).await.unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[4].respondent_name, "Student 1");
    }

    #[tokio::test]
    async fn search_matches_names_case_insensitively() {
        let f = fixture(3).await;
        let page = f.handler.handle(query(&f, Some("zE"), Some(0))).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.items[0].respondent_name, "Zed");

        let none = f.handler.handle(query(&f, Some("nobody"), None)).await.unwrap();
        assert_eq!(none.total, 0);
        assert_eq!(none.page_count, 1);
        assert!(none.items.is_empty());
    }

    #[tokio::test]
    async fn only_the_owner_may_list() {
        let f = fixture(1).await;
        let mut q = query(&f, None, None);
        q.teacher_id = RespondentId::new();
        assert_eq!(f.handler.handle(q).await.unwrap_err(), SurveyError::Forbidden);
    }
}
