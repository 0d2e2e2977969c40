//! PostgreSQL implementation of ResponseReader.
//!
//! Read-optimized queries for history, response detail, the owner's
//! response listing and analytics.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::domain::analytics::SubmissionRecord;
use crate::domain::foundation::{
    DomainError, ErrorCode, RespondentId, ResponseId, SectionId, SurveyId, Timestamp,
};
use crate::domain::survey::{Answer, Response};
use crate::ports::{
    ResponseListOptions, ResponseReader, ResponseSummary, StoredResponse, SubmissionFilter,
    SurveyResponseList, SurveyResponseRow,
};

use super::answer_codec::row_to_answer;

/// PostgreSQL implementation of ResponseReader.
#[derive(Clone)]
pub struct PostgresResponseReader {
    pool: PgPool,
}

impl PostgresResponseReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResponseReader for PostgresResponseReader {
    async fn history_for(
        &self,
        respondent_id: &RespondentId,
    ) -> Result<Vec<ResponseSummary>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.survey_id, s.title AS survey_title, r.submitted_at, r.is_complete,
                   COUNT(a.id) AS answer_count
            FROM responses r
            JOIN surveys s ON s.id = r.survey_id
            LEFT JOIN answers a ON a.response_id = r.id
            WHERE r.respondent_id = $1
            GROUP BY r.id, r.survey_id, s.title, r.submitted_at, r.is_complete
            ORDER BY r.submitted_at DESC, r.id
            "#,
        )
        .bind(respondent_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch response history: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_summary).collect()
    }

    async fn completed_survey_ids(
        &self,
        respondent_id: &RespondentId,
    ) -> Result<HashSet<SurveyId>, DomainError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT survey_id FROM responses WHERE respondent_id = $1 AND is_complete",
        )
        .bind(respondent_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch completed surveys: {}", e),
            )
        })?;

        Ok(rows.into_iter().map(|(id,)| SurveyId::from_uuid(id)).collect())
    }

    async fn find_by_id(&self, id: &ResponseId) -> Result<Option<StoredResponse>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, survey_id, respondent_id, submitted_at, is_complete
            FROM responses
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch response: {}", e))
        })?;

        let response = match row {
            Some(row) => row_to_response(row)?,
            None => return Ok(None),
        };

        let answers = sqlx::query(
            r#"
            SELECT id, response_id, question_id, value_kind, value_text, value_number
            FROM answers
            WHERE response_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch answers: {}", e))
        })?
        .into_iter()
        .map(row_to_answer)
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(StoredResponse { response, answers }))
    }

    async fn answers_for_survey(&self, survey_id: &SurveyId) -> Result<Vec<Answer>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT a.id, a.response_id, a.question_id, a.value_kind, a.value_text, a.value_number
            FROM answers a
            JOIN responses r ON r.id = a.response_id
            WHERE r.survey_id = $1 AND r.is_complete
            "#,
        )
        .bind(survey_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch survey answers: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_answer).collect()
    }

    async fn counts_by_section(
        &self,
        survey_id: &SurveyId,
    ) -> Result<HashMap<SectionId, u32>, DomainError> {
        let rows: Vec<(Uuid, i64)> = sqlx::query_as(
            r#"
            SELECT p.section_id, COUNT(*)
            FROM responses r
            JOIN respondents p ON p.id = r.respondent_id
            WHERE r.survey_id = $1 AND p.section_id IS NOT NULL
            GROUP BY p.section_id
            "#,
        )
        .bind(survey_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to count responses by section: {}", e),
            )
        })?;

        Ok(rows
            .into_iter()
            .map(|(section_id, count)| (SectionId::from_uuid(section_id), count as u32))
            .collect())
    }

    async fn list_for_survey(
        &self,
        survey_id: &SurveyId,
        options: &ResponseListOptions,
    ) -> Result<SurveyResponseList, DomainError> {
        let pattern = options.search.as_deref().map(like_pattern);

        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM responses r
            JOIN respondents p ON p.id = r.respondent_id
            WHERE r.survey_id = $1 AND ($2::TEXT IS NULL OR p.display_name ILIKE $2)
            "#,
        )
        .bind(survey_id.as_uuid())
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to count survey responses: {}", e),
            )
        })?;

        let rows = sqlx::query(
            r#"
            SELECT r.id, r.respondent_id, p.display_name, p.section_id, r.submitted_at,
                   r.is_complete, COUNT(a.id) AS answer_count
            FROM responses r
            JOIN respondents p ON p.id = r.respondent_id
            LEFT JOIN answers a ON a.response_id = r.id
            WHERE r.survey_id = $1 AND ($2::TEXT IS NULL OR p.display_name ILIKE $2)
            GROUP BY r.id, r.respondent_id, p.display_name, p.section_id, r.submitted_at,
                     r.is_complete
            ORDER BY r.submitted_at DESC, r.id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(survey_id.as_uuid())
        .bind(pattern.as_deref())
        .bind(i64::from(options.limit))
        .bind(i64::from(options.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list survey responses: {}", e),
            )
        })?;

        Ok(SurveyResponseList {
            items: rows.into_iter().map(row_to_listing).collect::<Result<_, _>>()?,
            total: total as u32,
        })
    }

    async fn submissions(
        &self,
        filter: &SubmissionFilter,
    ) -> Result<Vec<SubmissionRecord>, DomainError> {
        if filter.survey_ids.is_empty() {
            return Ok(Vec::new());
        }
        let survey_ids: Vec<Uuid> = filter.survey_ids.iter().map(|id| *id.as_uuid()).collect();

        let rows: Vec<(Uuid, Option<Uuid>, chrono::DateTime<chrono::Utc>)> = sqlx::query_as(
            r#"
            SELECT r.survey_id, p.section_id, r.submitted_at
            FROM responses r
            JOIN respondents p ON p.id = r.respondent_id
            WHERE r.survey_id = ANY($1)
              AND ($2::UUID IS NULL OR p.section_id = $2)
              AND ($3::TIMESTAMPTZ IS NULL OR r.submitted_at >= $3)
              AND ($4::TIMESTAMPTZ IS NULL OR r.submitted_at < $4)
            "#,
        )
        .bind(&survey_ids[..])
        .bind(filter.section_id.map(|id| *id.as_uuid()))
        .bind(filter.submitted_from.map(|t| *t.as_datetime()))
        .bind(filter.submitted_before.map(|t| *t.as_datetime()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch dashboard submissions: {}", e),
            )
        })?;

        Ok(rows
            .into_iter()
            .map(|(survey_id, section_id, submitted_at)| SubmissionRecord {
                survey_id: SurveyId::from_uuid(survey_id),
                section_id: section_id.map(SectionId::from_uuid),
                submitted_at: Timestamp::from_datetime(submitted_at),
            })
            .collect())
    }
}

/// `%text%` with LIKE metacharacters escaped (backslash is the default
/// escape character).
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn row_to_listing(row: sqlx::postgres::PgRow) -> Result<SurveyResponseRow, DomainError> {
    let map_err = |e: sqlx::Error| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to read listing row: {}", e))
    };

    let id: Uuid = row.try_get("id").map_err(map_err)?;
    let respondent_id: Uuid = row.try_get("respondent_id").map_err(map_err)?;
    let display_name: String = row.try_get("display_name").map_err(map_err)?;
    let section_id: Option<Uuid> = row.try_get("section_id").map_err(map_err)?;
    let submitted_at: chrono::DateTime<chrono::Utc> =
        row.try_get("submitted_at").map_err(map_err)?;
    let is_complete: bool = row.try_get("is_complete").map_err(map_err)?;
    let answer_count: i64 = row.try_get("answer_count").map_err(map_err)?;

    Ok(SurveyResponseRow {
        response_id: ResponseId::from_uuid(id),
        respondent_id: RespondentId::from_uuid(respondent_id),
        respondent_name: display_name,
        section_id: section_id.map(SectionId::from_uuid),
        submitted_at: Timestamp::from_datetime(submitted_at),
        is_complete,
        answer_count: answer_count as u32,
    })
}

fn row_to_response(row: sqlx::postgres::PgRow) -> Result<Response, DomainError> {
    let map_err = |e: sqlx::Error| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to read response row: {}", e))
    };

    let id: Uuid = row.try_get("id").map_err(map_err)?;
    let survey_id: Uuid = row.try_get("survey_id").map_err(map_err)?;
    let respondent_id: Uuid = row.try_get("respondent_id").map_err(map_err)?;
    let submitted_at: chrono::DateTime<chrono::Utc> =
        row.try_get("submitted_at").map_err(map_err)?;
    let is_complete: bool = row.try_get("is_complete").map_err(map_err)?;

    Ok(Response::reconstitute(
        ResponseId::from_uuid(id),
        SurveyId::from_uuid(survey_id),
        RespondentId::from_uuid(respondent_id),
        Timestamp::from_datetime(submitted_at),
        is_complete,
    ))
}

fn row_to_summary(row: sqlx::postgres::PgRow) -> Result<ResponseSummary, DomainError> {
    let map_err = |e: sqlx::Error| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to read history row: {}", e))
    };

    let id: Uuid = row.try_get("id").map_err(map_err)?;
    let survey_id: Uuid = row.try_get("survey_id").map_err(map_err)?;
    let survey_title: String = row.try_get("survey_title").map_err(map_err)?;
    let submitted_at: chrono::DateTime<chrono::Utc> =
        row.try_get("submitted_at").map_err(map_err)?;
    let is_complete: bool = row.try_get("is_complete").map_err(map_err)?;
    let answer_count: i64 = row.try_get("answer_count").map_err(map_err)?;

    Ok(ResponseSummary {
        response_id: ResponseId::from_uuid(id),
        survey_id: SurveyId::from_uuid(survey_id),
        survey_title,
        submitted_at: Timestamp::from_datetime(submitted_at),
        is_complete,
        answer_count: answer_count as u32,
    })
}
