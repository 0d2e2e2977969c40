//! PostgreSQL implementation of SurveyRepository.
//!
//! A survey spans four tables: `surveys`, `questions`, `survey_sections` and,
//! for the lock check and cascade, `responses`/`answers`. Every write that
//! touches more than one table runs in a single transaction.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row};
use std::collections::{BTreeSet, HashMap, HashSet};
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, QuestionId, RespondentId, SectionId, SurveyId, Timestamp,
};
use crate::domain::survey::{Question, QuestionKind, Survey};
use crate::ports::SurveyRepository;

const SURVEY_COLUMNS: &str =
    "s.id, s.title, s.description, s.creator_id, s.is_active, s.due_date, s.created_at, s.updated_at, s.revision";

/// PostgreSQL implementation of SurveyRepository.
#[derive(Clone)]
pub struct PostgresSurveyRepository {
    pool: PgPool,
}

impl PostgresSurveyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads questions and assignments for the given survey rows.
    async fn hydrate(&self, rows: Vec<sqlx::postgres::PgRow>) -> Result<Vec<Survey>, DomainError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids = rows
            .iter()
            .map(|row| row.try_get::<Uuid, _>("id"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_error("read survey id"))?;

        let question_rows = sqlx::query(
            r#"
            SELECT id, survey_id, text, config, is_required, position
            FROM questions
            WHERE survey_id = ANY($1)
            ORDER BY survey_id, position
            "#,
        )
        .bind(&ids[..])
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("fetch questions"))?;

        let mut questions: HashMap<Uuid, Vec<Question>> = HashMap::new();
        for row in question_rows {
            let question = row_to_question(row)?;
            questions
                .entry(*question.survey_id().as_uuid())
                .or_default()
                .push(question);
        }

        let assignments: Vec<(Uuid, Uuid)> = sqlx::query_as(
            "SELECT survey_id, section_id FROM survey_sections WHERE survey_id = ANY($1)",
        )
        .bind(&ids[..])
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("fetch survey sections"))?;

        let mut sections: HashMap<Uuid, BTreeSet<SectionId>> = HashMap::new();
        for (survey_id, section_id) in assignments {
            sections
                .entry(survey_id)
                .or_default()
                .insert(SectionId::from_uuid(section_id));
        }

        rows.into_iter()
            .map(|row| {
                let id: Uuid = row.try_get("id").map_err(db_error("read survey id"))?;
                row_to_survey(
                    row,
                    questions.remove(&id).unwrap_or_default(),
                    sections.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    }
}

#[async_trait]
impl SurveyRepository for PostgresSurveyRepository {
    async fn save(&self, survey: &Survey) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        require_sections(&mut *tx, survey.section_ids()).await?;

        sqlx::query(
            r#"
            INSERT INTO surveys (
                id, title, description, creator_id, is_active, due_date, created_at, updated_at,
                revision
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(survey.id().as_uuid())
        .bind(survey.title())
        .bind(survey.description())
        .bind(survey.creator_id().as_uuid())
        .bind(survey.is_active())
        .bind(survey.due_date().map(|d| *d.as_datetime()))
        .bind(survey.created_at().as_datetime())
        .bind(survey.updated_at().as_datetime())
        .bind(survey.revision() as i32)
        .execute(&mut *tx)
        .await
        .map_err(db_error("insert survey"))?;

        insert_questions(&mut *tx, survey.questions()).await?;
        insert_assignments(&mut *tx, survey.id(), survey.section_ids()).await?;

        tx.commit().await.map_err(db_error("commit survey"))?;
        Ok(())
    }

    async fn update_settings(&self, survey: &Survey) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        require_sections(&mut *tx, survey.section_ids()).await?;

        let result = sqlx::query(
            r#"
            UPDATE surveys SET
                title = $2,
                description = $3,
                is_active = $4,
                due_date = $5,
                updated_at = $6,
                revision = revision + 1
            WHERE id = $1
            "#,
        )
        .bind(survey.id().as_uuid())
        .bind(survey.title())
        .bind(survey.description())
        .bind(survey.is_active())
        .bind(survey.due_date().map(|d| *d.as_datetime()))
        .bind(survey.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("update survey"))?;

        if result.rows_affected() == 0 {
            return Err(survey_not_found(survey.id()));
        }

        sqlx::query("DELETE FROM survey_sections WHERE survey_id = $1")
            .bind(survey.id().as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_error("clear survey sections"))?;
        insert_assignments(&mut *tx, survey.id(), survey.section_ids()).await?;

        tx.commit().await.map_err(db_error("commit survey settings"))?;
        Ok(())
    }

    async fn update_questions(&self, survey: &Survey) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        // Row lock serialises with submissions, which hold FOR SHARE on the
        // same row until they commit.
        let locked = sqlx::query("SELECT id FROM surveys WHERE id = $1 FOR UPDATE")
            .bind(survey.id().as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("lock survey"))?;
        if locked.is_none() {
            return Err(survey_not_found(survey.id()));
        }

        let (has_responses,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM responses WHERE survey_id = $1)")
                .bind(survey.id().as_uuid())
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error("check responses"))?;
        if has_responses {
            return Err(DomainError::new(ErrorCode::SurveyLocked, "Survey already has responses")
                .with_detail("id", survey.id().to_string()));
        }

        sqlx::query("DELETE FROM questions WHERE survey_id = $1")
            .bind(survey.id().as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_error("clear questions"))?;
        insert_questions(&mut *tx, survey.questions()).await?;

        sqlx::query("UPDATE surveys SET updated_at = $2, revision = revision + 1 WHERE id = $1")
            .bind(survey.id().as_uuid())
            .bind(survey.updated_at().as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(db_error("touch survey"))?;

        tx.commit().await.map_err(db_error("commit questions"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &SurveyId) -> Result<Option<Survey>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM surveys s WHERE s.id = $1", SURVEY_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch survey"))?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_creator(&self, creator_id: &RespondentId) -> Result<Vec<Survey>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM surveys s WHERE s.creator_id = $1 ORDER BY s.created_at DESC, s.id",
            SURVEY_COLUMNS
        ))
        .bind(creator_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("fetch surveys by creator"))?;

        self.hydrate(rows).await
    }

    async fn find_assigned_to_section(
        &self,
        section_id: &SectionId,
    ) -> Result<Vec<Survey>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM surveys s
            JOIN survey_sections ss ON ss.survey_id = s.id
            WHERE ss.section_id = $1
            ORDER BY s.created_at DESC, s.id
            "#,
            SURVEY_COLUMNS
        ))
        .bind(section_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("fetch surveys by section"))?;

        self.hydrate(rows).await
    }

    async fn delete(&self, id: &SurveyId) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        let statements = [
            "DELETE FROM answers WHERE response_id IN (SELECT id FROM responses WHERE survey_id = $1)",
            "DELETE FROM responses WHERE survey_id = $1",
            "DELETE FROM survey_sections WHERE survey_id = $1",
            "DELETE FROM questions WHERE survey_id = $1",
        ];
        for statement in statements {
            sqlx::query(statement)
                .bind(id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(db_error("delete survey children"))?;
        }

        let result = sqlx::query("DELETE FROM surveys WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_error("delete survey"))?;
        if result.rows_affected() == 0 {
            return Err(survey_not_found(id));
        }

        tx.commit().await.map_err(db_error("commit survey delete"))?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════════

fn db_error(action: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, e))
}

fn survey_not_found(id: &SurveyId) -> DomainError {
    DomainError::new(ErrorCode::SurveyNotFound, format!("Survey not found: {}", id))
        .with_detail("id", id.to_string())
}

async fn require_sections(
    conn: &mut PgConnection,
    ids: &BTreeSet<SectionId>,
) -> Result<(), DomainError> {
    if ids.is_empty() {
        return Ok(());
    }
    let wanted: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

    let found: Vec<(Uuid,)> = sqlx::query_as("SELECT id FROM sections WHERE id = ANY($1)")
        .bind(&wanted[..])
        .fetch_all(&mut *conn)
        .await
        .map_err(db_error("check sections"))?;
    let found: HashSet<Uuid> = found.into_iter().map(|(id,)| id).collect();

    match ids.iter().find(|id| !found.contains(id.as_uuid())) {
        Some(missing) => Err(DomainError::new(
            ErrorCode::SectionNotFound,
            format!("Section not found: {}", missing),
        )
        .with_detail("id", missing.to_string())),
        None => Ok(()),
    }
}

async fn insert_questions(
    conn: &mut PgConnection,
    questions: &[Question],
) -> Result<(), DomainError> {
    for question in questions {
        let config = serde_json::to_string(question.kind()).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to encode question config: {}", e),
            )
        })?;

        sqlx::query(
            r#"
            INSERT INTO questions (id, survey_id, text, question_type, config, is_required, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(question.id().as_uuid())
        .bind(question.survey_id().as_uuid())
        .bind(question.text())
        .bind(question.question_type().as_str())
        .bind(config)
        .bind(question.is_required())
        .bind(question.order() as i32)
        .execute(&mut *conn)
        .await
        .map_err(db_error("insert question"))?;
    }
    Ok(())
}

async fn insert_assignments(
    conn: &mut PgConnection,
    survey_id: &SurveyId,
    section_ids: &BTreeSet<SectionId>,
) -> Result<(), DomainError> {
    for section_id in section_ids {
        sqlx::query("INSERT INTO survey_sections (survey_id, section_id) VALUES ($1, $2)")
            .bind(survey_id.as_uuid())
            .bind(section_id.as_uuid())
            .execute(&mut *conn)
            .await
            .map_err(db_error("insert survey section"))?;
    }
    Ok(())
}

fn row_to_question(row: sqlx::postgres::PgRow) -> Result<Question, DomainError> {
    let map_err = db_error("read question row");

    let id: Uuid = row.try_get("id").map_err(&map_err)?;
    let survey_id: Uuid = row.try_get("survey_id").map_err(&map_err)?;
    let text: String = row.try_get("text").map_err(&map_err)?;
    let config: String = row.try_get("config").map_err(&map_err)?;
    let is_required: bool = row.try_get("is_required").map_err(&map_err)?;
    let position: i32 = row.try_get("position").map_err(&map_err)?;

    let kind: QuestionKind = serde_json::from_str(&config).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid question config for {}: {}", id, e),
        )
    })?;

    Ok(Question::reconstitute(
        QuestionId::from_uuid(id),
        SurveyId::from_uuid(survey_id),
        text,
        kind,
        is_required,
        position.max(0) as u32,
    ))
}

fn row_to_survey(
    row: sqlx::postgres::PgRow,
    questions: Vec<Question>,
    section_ids: BTreeSet<SectionId>,
) -> Result<Survey, DomainError> {
    let map_err = db_error("read survey row");

    let id: Uuid = row.try_get("id").map_err(&map_err)?;
    let title: String = row.try_get("title").map_err(&map_err)?;
    let description: String = row.try_get("description").map_err(&map_err)?;
    let creator_id: Uuid = row.try_get("creator_id").map_err(&map_err)?;
    let is_active: bool = row.try_get("is_active").map_err(&map_err)?;
    let due_date: Option<chrono::DateTime<chrono::Utc>> =
        row.try_get("due_date").map_err(&map_err)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(&map_err)?;
    let updated_at: chrono::DateTime<chrono::Utc> = row.try_get("updated_at").map_err(&map_err)?;
    let revision: i32 = row.try_get("revision").map_err(&map_err)?;

    Ok(Survey::reconstitute(
        SurveyId::from_uuid(id),
        title,
        description,
        RespondentId::from_uuid(creator_id),
        is_active,
        due_date.map(Timestamp::from_datetime),
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
        revision.max(0) as u32,
        questions,
        section_ids,
    ))
}
