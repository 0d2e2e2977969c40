//! Teacher-facing analytics queries.

mod get_dashboard;
mod get_participation;
mod get_survey_analytics;
mod list_survey_responses;

pub use get_dashboard::{GetDashboardHandler, GetDashboardQuery};
pub use get_participation::{GetParticipationHandler, GetParticipationQuery};
pub use get_survey_analytics::{GetSurveyAnalyticsHandler, GetSurveyAnalyticsQuery};
pub use list_survey_responses::{
    ListSurveyResponsesHandler, ListSurveyResponsesQuery, SurveyResponsePage, RESPONSES_PER_PAGE,
};
