//! HTTP adapter - REST API over the application handlers.
//!
//! Actor identity travels in the path (`/respondents/:id`, `/teachers/:id`);
//! authentication sits in front of this service.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{handle_survey_error, ErrorResponse};
pub use routes::api_router;
pub use state::{Repositories, SurveyAppState};
