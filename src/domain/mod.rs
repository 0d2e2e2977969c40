//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamp, errors)
//! - `section` - Class cohorts that surveys are assigned to
//! - `respondent` - Students and teachers
//! - `survey` - Survey aggregate, responses, eligibility and answer validation
//! - `analytics` - Pure aggregation of answers into summaries

pub mod analytics;
pub mod foundation;
pub mod respondent;
pub mod section;
pub mod survey;
