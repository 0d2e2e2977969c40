//! In-memory adapter.
//!
//! Backs tests and runs the service without a database.

mod store;

pub use store::InMemoryStore;
