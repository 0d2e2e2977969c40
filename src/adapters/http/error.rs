//! Error body shared by every endpoint and the `SurveyError` to status mapping.

use std::str::FromStr;

use chrono::NaiveDate;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::domain::survey::SurveyError;

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl ToString, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Maps a handler error onto its HTTP status and error body.
pub fn handle_survey_error(err: SurveyError) -> Response {
    let code = err.code();
    let message = err.to_string();

    let (status, body) = match err {
        SurveyError::NotFound { id, .. } => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new(code, message).with_details(json!({ "id": id })),
        ),
        SurveyError::Forbidden | SurveyError::NotEligible => {
            (StatusCode::FORBIDDEN, ErrorResponse::new(code, message))
        }
        SurveyError::AlreadySubmitted
        | SurveyError::SurveyLocked
        | SurveyError::SectionInUse
        | SurveyError::SurveyChanged => (StatusCode::CONFLICT, ErrorResponse::new(code, message)),
        SurveyError::ValidationFailed(violations) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorResponse::new(code, message).with_details(json!({ "violations": violations })),
        ),
        SurveyError::InvalidDefinition { field, .. } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(code, message).with_details(json!({ "field": field })),
        ),
        SurveyError::StorageUnavailable(reason) => {
            error!(%reason, "Storage unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new(code, "Storage is temporarily unavailable, retry the request"),
            )
        }
    };

    (status, Json(body)).into_response()
}

/// Parses a path identifier, answering 400 when it is not a UUID.
pub fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, Response> {
    raw.parse::<T>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(format!("Invalid {} ID", what))),
        )
            .into_response()
    })
}

/// Parses an optional query filter. Blank and `all` select everything.
pub fn parse_filter<T: FromStr>(raw: Option<&str>, what: &str) -> Result<Option<T>, Response> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => parse_id(value, what).map(Some),
    }
}

/// Parses an optional `YYYY-MM-DD` query date.
pub fn parse_date(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>, Response> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::bad_request(format!(
                        "Invalid {}, expected YYYY-MM-DD",
                        field
                    ))),
                )
                    .into_response()
            }),
    }
}
