//! Respondent-facing handlers: survey reading, eligibility listing, submission,
//! history and response detail.

mod get_response;
mod get_survey;
mod list_eligible_surveys;
mod list_history;
mod submit_response;

pub use get_response::{AnsweredQuestion, GetResponseHandler, GetResponseQuery, ResponseDetail};
pub use get_survey::{GetSurveyHandler, GetSurveyQuery};
pub use list_eligible_surveys::{
    ListEligibleSurveysHandler, ListEligibleSurveysQuery, SurveySummary,
};
pub use list_history::{ListHistoryHandler, ListHistoryQuery};
pub use submit_response::{SubmitResponseCommand, SubmitResponseHandler, SubmitResponseResult};
