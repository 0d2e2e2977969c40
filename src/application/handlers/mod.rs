//! Application handlers.
//!
//! One command or query handler per operation. Handlers hold their port
//! dependencies as `Arc<dyn Port>` and expose `async fn handle`.

pub mod analytics;
pub mod authoring;
pub(crate) mod loaders;
pub mod respondent;
pub mod section;
pub mod submission;
