//! Respondent handlers.

mod register_respondent;

pub use register_respondent::{RegisterRespondentCommand, RegisterRespondentHandler};
