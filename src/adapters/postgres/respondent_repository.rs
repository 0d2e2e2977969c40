//! PostgreSQL implementation of RespondentRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, RespondentId, SectionId};
use crate::domain::respondent::Respondent;
use crate::ports::RespondentRepository;

/// PostgreSQL implementation of RespondentRepository.
#[derive(Clone)]
pub struct PostgresRespondentRepository {
    pool: PgPool,
}

impl PostgresRespondentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RespondentRepository for PostgresRespondentRepository {
    async fn save(&self, respondent: &Respondent) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO respondents (id, display_name, kind, section_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(respondent.id().as_uuid())
        .bind(respondent.display_name())
        .bind(respondent.kind().as_str())
        .bind(respondent.section_id().map(|s| *s.as_uuid()))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                let section = respondent
                    .section_id()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                Err(DomainError::new(
                    ErrorCode::SectionNotFound,
                    format!("Section not found: {}", section),
                )
                .with_detail("id", section))
            }
            Err(e) => Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert respondent: {}", e),
            )),
        }
    }

    async fn find_by_id(&self, id: &RespondentId) -> Result<Option<Respondent>, DomainError> {
        let row = sqlx::query(
            "SELECT id, display_name, kind, section_id FROM respondents WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch respondent: {}", e),
            )
        })?;

        row.map(row_to_respondent).transpose()
    }

    async fn count_students_in_section(&self, section_id: &SectionId) -> Result<u32, DomainError> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM respondents WHERE section_id = $1 AND kind = 'student'",
        )
        .bind(section_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to count students: {}", e),
            )
        })?;

        Ok(result.0 as u32)
    }
}

fn row_to_respondent(row: sqlx::postgres::PgRow) -> Result<Respondent, DomainError> {
    let map_err = |e: sqlx::Error| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to read respondent row: {}", e),
        )
    };

    let id: Uuid = row.try_get("id").map_err(map_err)?;
    let display_name: String = row.try_get("display_name").map_err(map_err)?;
    let kind: String = row.try_get("kind").map_err(map_err)?;
    let section_id: Option<Uuid> = row.try_get("section_id").map_err(map_err)?;

    let id = RespondentId::from_uuid(id);
    match (kind.as_str(), section_id) {
        ("student", Some(section_id)) => Ok(Respondent::student(
            id,
            display_name,
            SectionId::from_uuid(section_id),
        )),
        ("teacher", None) => Ok(Respondent::teacher(id, display_name)),
        (other, _) => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid respondent kind '{}' for {}", other, id),
        )),
    }
}
