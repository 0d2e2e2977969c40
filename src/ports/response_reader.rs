//! Response reader port (read side / CQRS queries).
//!
//! Read-optimized views over submitted responses, used by history, response
//! detail, the owner's response listing and analytics queries.

use std::collections::{HashMap, HashSet};

use crate::domain::analytics::SubmissionRecord;
use crate::domain::foundation::{
    DomainError, RespondentId, ResponseId, SectionId, SurveyId, Timestamp,
};
use crate::domain::survey::{Answer, Response};
use async_trait::async_trait;
use serde::Serialize;

#[async_trait]
pub trait ResponseReader: Send + Sync {
    /// All responses of a respondent, complete or not, regardless of the
    /// survey's current state. Ordered by submitted_at descending.
    async fn history_for(
        &self,
        respondent_id: &RespondentId,
    ) -> Result<Vec<ResponseSummary>, DomainError>;

    /// Ids of surveys the respondent has a complete response for.
    async fn completed_survey_ids(
        &self,
        respondent_id: &RespondentId,
    ) -> Result<HashSet<SurveyId>, DomainError>;

    /// A response together with its answers.
    async fn find_by_id(&self, id: &ResponseId) -> Result<Option<StoredResponse>, DomainError>;

    /// Every answer belonging to a complete response of the survey.
    async fn answers_for_survey(&self, survey_id: &SurveyId) -> Result<Vec<Answer>, DomainError>;

    /// Response counts for a survey keyed by the respondent's section.
    async fn counts_by_section(
        &self,
        survey_id: &SurveyId,
    ) -> Result<HashMap<SectionId, u32>, DomainError>;

    /// One page of a survey's responses, ordered by submitted_at descending.
    ///
    /// `total` counts every response matching the search, not just the page.
    async fn list_for_survey(
        &self,
        survey_id: &SurveyId,
        options: &ResponseListOptions,
    ) -> Result<SurveyResponseList, DomainError>;

    /// Responses to any of `filter.survey_ids` that pass the filter.
    async fn submissions(
        &self,
        filter: &SubmissionFilter,
    ) -> Result<Vec<SubmissionRecord>, DomainError>;
}

/// Paging and search for a survey's response listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseListOptions {
    /// Case-insensitive substring of the respondent's display name.
    pub search: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl ResponseListOptions {
    /// Options for a 1-based page. Page 0 is treated as page 1.
    pub fn paginated(page: u32, per_page: u32) -> Self {
        Self {
            search: None,
            limit: per_page,
            offset: page.max(1).saturating_sub(1).saturating_mul(per_page),
        }
    }

    /// Narrows by display name. Blank text clears the search.
    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self
    }

    /// Whether `display_name` passes the search.
    pub fn matches(&self, display_name: &str) -> bool {
        match &self.search {
            Some(search) => display_name.to_lowercase().contains(&search.to_lowercase()),
            None => true,
        }
    }
}

/// One row of a survey's response listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyResponseRow {
    pub response_id: ResponseId,
    pub respondent_id: RespondentId,
    pub respondent_name: String,
    pub section_id: Option<SectionId>,
    pub submitted_at: Timestamp,
    pub is_complete: bool,
    pub answer_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyResponseList {
    pub items: Vec<SurveyResponseRow>,
    pub total: u32,
}

/// Narrowing applied to dashboard submissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub survey_ids: Vec<SurveyId>,
    /// Only respondents of this section.
    pub section_id: Option<SectionId>,
    /// Inclusive lower bound on submitted_at.
    pub submitted_from: Option<Timestamp>,
    /// Exclusive upper bound on submitted_at.
    pub submitted_before: Option<Timestamp>,
}

impl SubmissionFilter {
    pub fn admits(&self, submitted_at: &Timestamp) -> bool {
        self.submitted_from.map_or(true, |from| !submitted_at.is_before(&from))
            && self.submitted_before.map_or(true, |before| submitted_at.is_before(&before))
    }
}

/// History row for one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseSummary {
    pub response_id: ResponseId,
    pub survey_id: SurveyId,
    pub survey_title: String,
    pub submitted_at: Timestamp,
    pub is_complete: bool,
    pub answer_count: u32,
}

/// A response as stored, with its answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResponse {
    pub response: Response,
    pub answers: Vec<Answer>,
}
