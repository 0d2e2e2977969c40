//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Repository Ports
//!
//! - `SectionRepository` - Section cohorts
//! - `RespondentRepository` - Students and teachers
//! - `SurveyRepository` - Survey aggregate with questions and assignments
//! - `ResponseRepository` - Atomic response submission (write side)
//! - `ResponseReader` - History, detail, listing and analytics reads
//!
//! ## Ambient Ports
//!
//! - `Clock` - Source of the current time, read at the edge

mod clock;
mod respondent_repository;
mod response_reader;
mod response_repository;
mod section_repository;
mod survey_repository;

pub use clock::{Clock, FixedClock, SystemClock};
pub use respondent_repository::RespondentRepository;
pub use response_reader::{
    ResponseListOptions, ResponseReader, ResponseSummary, StoredResponse, SubmissionFilter,
    SurveyResponseList, SurveyResponseRow,
};
pub use response_repository::ResponseRepository;
pub use section_repository::SectionRepository;
pub use survey_repository::SurveyRepository;
