//! Respondent domain module.
//!
//! A respondent is a user acting as a student (who answers surveys) or a
//! teacher (who authors them and reads analytics).

mod respondent;

pub use respondent::{Respondent, RespondentKind, RespondentRole, MAX_DISPLAY_NAME_LENGTH};
