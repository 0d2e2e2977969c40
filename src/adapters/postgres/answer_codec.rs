//! Column encoding for answer values.
//!
//! Answers are stored as `(value_kind, value_text, value_number)` with
//! `value_number` set only for likert answers.

use sqlx::Row;
use uuid::Uuid;

use crate::domain::foundation::{AnswerId, DomainError, ErrorCode, QuestionId, ResponseId};
use crate::domain::survey::{Answer, AnswerValue};

pub(super) fn encode_value(value: &AnswerValue) -> (&'static str, Option<&str>, Option<i32>) {
    match value {
        AnswerValue::Text(text) => ("text", Some(text.as_str()), None),
        AnswerValue::Choice(label) => ("choice", Some(label.as_str()), None),
        AnswerValue::Number(n) => ("number", None, Some(*n)),
    }
}

pub(super) fn row_to_answer(row: sqlx::postgres::PgRow) -> Result<Answer, DomainError> {
    let map_err = |e: sqlx::Error| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to read answer row: {}", e))
    };

    let id: Uuid = row.try_get("id").map_err(map_err)?;
    let response_id: Uuid = row.try_get("response_id").map_err(map_err)?;
    let question_id: Uuid = row.try_get("question_id").map_err(map_err)?;
    let kind: String = row.try_get("value_kind").map_err(map_err)?;
    let text: Option<String> = row.try_get("value_text").map_err(map_err)?;
    let number: Option<i32> = row.try_get("value_number").map_err(map_err)?;

    let value = match (kind.as_str(), text, number) {
        ("text", Some(text), _) => AnswerValue::Text(text),
        ("choice", Some(label), _) => AnswerValue::Choice(label),
        ("number", _, Some(n)) => AnswerValue::Number(n),
        (other, _, _) => {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid answer value '{}' for answer {}", other, id),
            ))
        }
    };

    Ok(Answer {
        id: AnswerId::from_uuid(id),
        response_id: ResponseId::from_uuid(response_id),
        question_id: QuestionId::from_uuid(question_id),
        value,
    })
}
