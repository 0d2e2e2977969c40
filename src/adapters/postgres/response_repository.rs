//! PostgreSQL implementation of ResponseRepository.
//!
//! `submit` inserts the response and all of its answers in one transaction.
//! The UNIQUE (survey_id, respondent_id) constraint decides which of two
//! concurrent submissions wins; the loser sees `AlreadySubmitted` and none of
//! its rows survive the rollback. The survey row is read `FOR SHARE` before
//! any insert and its revision must match the one the answers were validated
//! against.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, RespondentId, SurveyId};
use crate::domain::survey::{Answer, Response};
use crate::ports::ResponseRepository;

use super::answer_codec::encode_value;

/// PostgreSQL implementation of ResponseRepository.
#[derive(Clone)]
pub struct PostgresResponseRepository {
    pool: PgPool,
}

impl PostgresResponseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResponseRepository for PostgresResponseRepository {
    async fn submit(
        &self,
        response: &Response,
        answers: &[Answer],
        survey_revision: u32,
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        // Held until commit so survey edits wait for in-flight submissions.
        let stored: Option<(i32,)> =
            sqlx::query_as("SELECT revision FROM surveys WHERE id = $1 FOR SHARE")
                .bind(response.survey_id().as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Failed to lock survey: {}", e))
                })?;
        let Some((revision,)) = stored else {
            return Err(DomainError::new(
                ErrorCode::SurveyNotFound,
                format!("Survey not found: {}", response.survey_id()),
            )
            .with_detail("id", response.survey_id().to_string()));
        };
        if i64::from(revision) != i64::from(survey_revision) {
            return Err(DomainError::new(
                ErrorCode::SurveyChanged,
                format!(
                    "Survey revision is {}, answers were checked against {}",
                    revision, survey_revision
                ),
            )
            .with_detail("id", response.survey_id().to_string()));
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO responses (id, survey_id, respondent_id, submitted_at, is_complete)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(response.id().as_uuid())
        .bind(response.survey_id().as_uuid())
        .bind(response.respondent_id().as_uuid())
        .bind(response.submitted_at().as_datetime())
        .bind(response.is_complete())
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(DomainError::new(
                    ErrorCode::AlreadySubmitted,
                    "A response already exists for this survey and respondent",
                ));
            }
            Err(e) => {
                return Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to insert response: {}", e),
                ));
            }
        }

        for answer in answers {
            let (kind, text, number) = encode_value(&answer.value);
            let inserted = sqlx::query(
                r#"
                INSERT INTO answers (id, response_id, question_id, value_kind, value_text, value_number)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(answer.id.as_uuid())
            .bind(answer.response_id.as_uuid())
            .bind(answer.question_id.as_uuid())
            .bind(kind)
            .bind(text)
            .bind(number)
            .execute(&mut *tx)
            .await;

            match inserted {
                Ok(_) => {}
                Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                    return Err(DomainError::new(
                        ErrorCode::ValidationFailed,
                        "More than one answer for the same question",
                    )
                    .with_detail("field", "answers"));
                }
                // Answer references a question that is not stored.
                Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                    return Err(DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Question {} no longer exists", answer.question_id),
                    ));
                }
                Err(e) => {
                    return Err(DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to insert answer: {}", e),
                    ));
                }
            }
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit response: {}", e),
            )
        })?;

        Ok(())
    }

    async fn exists_for(
        &self,
        survey_id: &SurveyId,
        respondent_id: &RespondentId,
    ) -> Result<bool, DomainError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM responses WHERE survey_id = $1 AND respondent_id = $2)",
        )
        .bind(survey_id.as_uuid())
        .bind(respondent_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to check response existence: {}", e),
            )
        })?;

        Ok(result.0)
    }

    async fn count_for_survey(&self, survey_id: &SurveyId) -> Result<u32, DomainError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM responses WHERE survey_id = $1")
            .bind(survey_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to count responses: {}", e),
                )
            })?;

        Ok(result.0 as u32)
    }
}
