//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - REST API (axum)
//! - `memory` - In-process store for development and tests
//! - `postgres` - PostgreSQL repositories (sqlx)

pub mod http;
pub mod memory;
pub mod postgres;
