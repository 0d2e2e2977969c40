//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresSectionRepository` - Sections with unique codes
//! - `PostgresRespondentRepository` - Students and teachers
//! - `PostgresSurveyRepository` - Surveys, questions and assignments
//! - `PostgresResponseRepository` - Transactional response submission
//! - `PostgresResponseReader` - History, detail and analytics queries

mod answer_codec;
mod respondent_repository;
mod response_reader;
mod response_repository;
mod section_repository;
mod survey_repository;

pub use respondent_repository::PostgresRespondentRepository;
pub use response_reader::PostgresResponseReader;
pub use response_repository::PostgresResponseRepository;
pub use section_repository::PostgresSectionRepository;
pub use survey_repository::PostgresSurveyRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Opens a connection pool sized and timed from configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
