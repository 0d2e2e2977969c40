//! PostgreSQL implementation of SectionRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, SectionId, Timestamp};
use crate::domain::section::Section;
use crate::ports::SectionRepository;

/// PostgreSQL implementation of SectionRepository.
#[derive(Clone)]
pub struct PostgresSectionRepository {
    pool: PgPool,
}

impl PostgresSectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SectionRepository for PostgresSectionRepository {
    async fn save(&self, section: &Section) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO sections (id, name, code, description, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(section.id().as_uuid())
        .bind(section.name())
        .bind(section.code())
        .bind(section.description())
        .bind(section.created_at().as_datetime())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DomainError::new(
                    ErrorCode::DuplicateSectionCode,
                    format!("Section code '{}' is already in use", section.code()),
                )
                .with_detail("field", "code"))
            }
            Err(e) => Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert section: {}", e),
            )),
        }
    }

    async fn find_by_id(&self, id: &SectionId) -> Result<Option<Section>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, code, description, created_at FROM sections WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch section: {}", e))
        })?;

        row.map(row_to_section).transpose()
    }

    async fn find_by_ids(&self, ids: &[SectionId]) -> Result<Vec<Section>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows = sqlx::query(
            r#"
            SELECT id, name, code, description, created_at
            FROM sections
            WHERE id = ANY($1)
            ORDER BY name, id
            "#,
        )
        .bind(&uuids[..])
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch sections: {}", e))
        })?;

        rows.into_iter().map(row_to_section).collect()
    }

    async fn list_all(&self) -> Result<Vec<Section>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, name, code, description, created_at FROM sections ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to list sections: {}", e))
        })?;

        rows.into_iter().map(row_to_section).collect()
    }

    async fn delete(&self, id: &SectionId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM sections WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(DomainError::new(
                ErrorCode::SectionNotFound,
                format!("Section not found: {}", id),
            )
            .with_detail("id", id.to_string())),
            Ok(_) => Ok(()),
            // Students or survey assignments still reference the section.
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                Err(DomainError::new(
                    ErrorCode::SectionInUse,
                    "Section still has students or assigned surveys",
                )
                .with_detail("id", id.to_string()))
            }
            Err(e) => Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to delete section: {}", e),
            )),
        }
    }
}

fn row_to_section(row: sqlx::postgres::PgRow) -> Result<Section, DomainError> {
    let map_err = |e: sqlx::Error| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to read section row: {}", e))
    };

    let id: Uuid = row.try_get("id").map_err(map_err)?;
    let name: String = row.try_get("name").map_err(map_err)?;
    let code: String = row.try_get("code").map_err(map_err)?;
    let description: String = row.try_get("description").map_err(map_err)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(map_err)?;

    Ok(Section::reconstitute(
        SectionId::from_uuid(id),
        name,
        code,
        description,
        Timestamp::from_datetime(created_at),
    ))
}
