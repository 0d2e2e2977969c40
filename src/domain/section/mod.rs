//! Section domain module.
//!
//! A section is a class cohort that surveys are assigned to. Students belong
//! to exactly one section; sections are referenced, never owned, by surveys
//! and respondents.

mod section;

pub use section::{Section, MAX_CODE_LENGTH, MAX_NAME_LENGTH};
