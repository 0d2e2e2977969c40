//! Integration tests for the HTTP API.
//!
//! Sends requests through the full router over the in-memory store and
//! checks status codes and JSON bodies.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::Router;
use http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use survey_engine::adapters::http::{api_router, Repositories, SurveyAppState};
use survey_engine::adapters::memory::InMemoryStore;
use survey_engine::ports::SystemClock;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app() -> Router {
    let store = Arc::new(InMemoryStore::new());
    api_router(SurveyAppState::new(
        Repositories::in_memory(store),
        Arc::new(SystemClock),
    ))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

struct Seeded {
    app: Router,
    teacher: String,
    student: String,
    survey: String,
    choice_q: String,
    scale_q: String,
}

async fn seeded() -> Seeded {
    let app = app();

    let (status, section) = send(
        &app,
        Method::POST,
        "/api/sections",
        Some(json!({ "name": "Period 1", "code": "P1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let section_id = id_of(&section);

    let (_, teacher) = send(
        &app,
        Method::POST,
        "/api/respondents",
        Some(json!({ "display_name": "Ms. Rivera", "kind": "teacher" })),
    )
    .await;
    let (status, student) = send(
        &app,
        Method::POST,
        "/api/respondents",
        Some(json!({ "display_name": "Alice", "kind": "student", "section_id": section_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let teacher = id_of(&teacher);
    let (status, survey) = send(
        &app,
        Method::POST,
        &format!("/api/teachers/{}/surveys", teacher),
        Some(json!({
            "title": "Lab safety check",
            "section_ids": [section_id],
            "questions": [
                {
                    "text": "Which goggles did you use?",
                    "question_type": "multiple_choice",
                    "is_required": true,
                    "choices": ["Clear", "Tinted"]
                },
                {
                    "text": "How safe did you feel?",
                    "question_type": "likert",
                    "is_required": true
                }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    Seeded {
        app,
        teacher,
        student: id_of(&student),
        survey: id_of(&survey),
        choice_q: survey["questions"][0]["id"].as_str().unwrap().to_string(),
        scale_q: survey["questions"][1]["id"].as_str().unwrap().to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn created_survey_exposes_flattened_questions() {
    let s = seeded().await;
    let uri = format!("/api/respondents/{}/surveys/{}", s.student, s.survey);

    let (status, survey) = send(&s.app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(survey["questions"][0]["type"], "multiple_choice");
    assert_eq!(survey["questions"][0]["choices"], json!(["Clear", "Tinted"]));
    assert_eq!(survey["questions"][1]["type"], "likert");
    assert_eq!(survey["questions"][1]["min"], 1);
    assert_eq!(survey["questions"][1]["max"], 5);
}

#[tokio::test]
async fn submission_lifecycle() {
    let s = seeded().await;
    let submit_uri = format!("/api/respondents/{}/surveys/{}/responses", s.student, s.survey);

    let (status, list) = send(
        &s.app,
        Method::GET,
        &format!("/api/respondents/{}/surveys", s.student),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let mut answers = serde_json::Map::new();
    answers.insert(s.choice_q.clone(), json!("Clear"));
    answers.insert(s.scale_q.clone(), json!(4));
    let body = json!({ "answers": answers });

    let (status, ack) = send(&s.app, Method::POST, &submit_uri, Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ack["answer_count"], 2);

    let (status, err) = send(&s.app, Method::POST, &submit_uri, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], "ALREADY_SUBMITTED");

    let (status, history) = send(
        &s.app,
        Method::GET,
        &format!("/api/respondents/{}/responses", s.student),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0]["survey_title"], "Lab safety check");
}

#[tokio::test]
async fn invalid_answers_return_every_violation() {
    let s = seeded().await;
    let mut answers = serde_json::Map::new();
    answers.insert(s.choice_q.clone(), json!("Mirrored"));
    answers.insert(s.scale_q.clone(), json!(11));

    let (status, err) = send(
        &s.app,
        Method::POST,
        &format!("/api/respondents/{}/surveys/{}/responses", s.student, s.survey),
        Some(json!({ "answers": answers })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["code"], "VALIDATION_FAILED");
    assert_eq!(err["details"]["violations"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn analytics_require_ownership_and_count_responses() {
    let s = seeded().await;
    let mut answers = serde_json::Map::new();
    answers.insert(s.choice_q.clone(), json!("Tinted"));
    answers.insert(s.scale_q.clone(), json!("5"));
    send(
        &s.app,
        Method::POST,
        &format!("/api/respondents/{}/surveys/{}/responses", s.student, s.survey),
        Some(json!({ "answers": answers })),
    )
    .await;

    let (status, analytics) = send(
        &s.app,
        Method::GET,
        &format!("/api/teachers/{}/surveys/{}/analytics", s.teacher, s.survey),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(analytics["total_responses"], 1);
    assert_eq!(analytics["questions"][0]["summary"]["kind"], "choice");

    let (status, _) = send(
        &s.app,
        Method::GET,
        &format!("/api/teachers/{}/surveys/{}/analytics", s.student, s.survey),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, participation) = send(
        &s.app,
        Method::GET,
        &format!("/api/teachers/{}/surveys/{}/participation", s.teacher, s.survey),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(participation["sections"][0]["completion_rate"], 100.0);
}

#[tokio::test]
async fn adding_questions_after_a_response_conflicts() {
    let s = seeded().await;
    let mut answers = serde_json::Map::new();
    answers.insert(s.choice_q.clone(), json!("Clear"));
    answers.insert(s.scale_q.clone(), json!(3));
    send(
        &s.app,
        Method::POST,
        &format!("/api/respondents/{}/surveys/{}/responses", s.student, s.survey),
        Some(json!({ "answers": answers })),
    )
    .await;

    let (status, err) = send(
        &s.app,
        Method::POST,
        &format!("/api/teachers/{}/surveys/{}/questions", s.teacher, s.survey),
        Some(json!({ "text": "Late question", "question_type": "short_answer" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], "SURVEY_LOCKED");
}

#[tokio::test]
async fn malformed_and_unknown_ids() {
    let app = app();

    let (status, _) = send(&app, Method::GET, "/api/respondents/not-a-uuid/surveys", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let unknown = uuid::Uuid::new_v4();
    let (status, err) = send(
        &app,
        Method::GET,
        &format!("/api/respondents/{}/surveys", unknown),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], "RESPONDENT_NOT_FOUND");
}

#[tokio::test]
async fn section_with_students_cannot_be_deleted() {
    let app = app();
    let (_, section) = send(
        &app,
        Method::POST,
        "/api/sections",
        Some(json!({ "name": "Period 4", "code": "P4" })),
    )
    .await;
    let section_id = id_of(&section);
    send(
        &app,
        Method::POST,
        "/api/respondents",
        Some(json!({ "display_name": "Dev", "kind": "student", "section_id": section_id })),
    )
    .await;

    let (status, err) = send(
        &app,
        Method::DELETE,
        &format!("/api/sections/{}", section_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], "SECTION_IN_USE");
}

async fn submit_complete(s: &Seeded) {
    let mut answers = serde_json::Map::new();
    answers.insert(s.choice_q.clone(), json!("Clear"));
    answers.insert(s.scale_q.clone(), json!(2));
    let (status, _) = send(
        &s.app,
        Method::POST,
        &format!("/api/respondents/{}/surveys/{}/responses", s.student, s.survey),
        Some(json!({ "answers": answers })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn owner_lists_responses_and_opens_one() {
    let s = seeded().await;
    submit_complete(&s).await;
    let list_uri = format!("/api/teachers/{}/surveys/{}/responses", s.teacher, s.survey);

    let (status, page) = send(&s.app, Method::GET, &list_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["page"], 1);
    assert_eq!(page["per_page"], 20);
    assert_eq!(page["items"][0]["respondent_name"], "Alice");
    assert_eq!(page["items"][0]["answer_count"], 2);
    let response_id = page["items"][0]["response_id"].as_str().unwrap().to_string();

    let (status, detail) = send(
        &s.app,
        Method::GET,
        &format!("/api/respondents/{}/responses/{}", s.teacher, response_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["response_id"], response_id.as_str());
    assert_eq!(detail["answers"].as_array().map(Vec::len), Some(2));

    let (status, page) = send(
        &s.app,
        Method::GET,
        &format!("{}?search=ALI&page=3", list_uri),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["page"], 1);

    let (_, page) = send(&s.app, Method::GET, &format!("{}?search=bob", list_uri), None).await;
    assert_eq!(page["total"], 0);
    assert_eq!(page["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn response_listing_is_owner_only() {
    let s = seeded().await;
    submit_complete(&s).await;

    let (status, err) = send(
        &s.app,
        Method::GET,
        &format!("/api/teachers/{}/surveys/{}/responses", s.student, s.survey),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["code"], "FORBIDDEN");
}

#[tokio::test]
async fn dashboard_totals_and_filters() {
    let s = seeded().await;
    submit_complete(&s).await;
    let dashboard_uri = format!("/api/teachers/{}/dashboard", s.teacher);

    let (status, dashboard) = send(&s.app, Method::GET, &dashboard_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["total_surveys"], 1);
    assert_eq!(dashboard["total_responses"], 1);
    assert_eq!(dashboard["surveys"][0]["percentage"], 100.0);
    assert_eq!(dashboard["daily"].as_array().map(Vec::len), Some(30));
    assert_eq!(dashboard["has_data"]["daily"], true);

    let (status, dashboard) = send(
        &s.app,
        Method::GET,
        &format!("{}?survey_id={}&section_id=all", dashboard_uri, s.survey),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["total_surveys"], 1);

    let (status, dashboard) = send(
        &s.app,
        Method::GET,
        &format!("{}?date_from=2000-01-01&date_to=2000-01-31", dashboard_uri),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["total_responses"], 0);
    assert_eq!(dashboard["daily"].as_array().map(Vec::len), Some(31));
    assert_eq!(dashboard["has_data"]["responses"], false);
}

#[tokio::test]
async fn dashboard_rejects_bad_dates_and_students() {
    let s = seeded().await;
    let dashboard_uri = format!("/api/teachers/{}/dashboard", s.teacher);

    let (status, err) = send(
        &s.app,
        Method::GET,
        &format!("{}?date_from=05/01/2024", dashboard_uri),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "BAD_REQUEST");

    let (status, _) = send(
        &s.app,
        Method::GET,
        &format!("{}?date_from=2024-05-09&date_to=2024-05-02", dashboard_uri),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &s.app,
        Method::GET,
        &format!("/api/teachers/{}/dashboard", s.student),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn oversized_likert_scale_is_rejected() {
    let s = seeded().await;
    let (status, err) = send(
        &s.app,
        Method::POST,
        &format!("/api/teachers/{}/surveys/{}/questions", s.teacher, s.survey),
        Some(json!({
            "text": "Rate it",
            "question_type": "likert",
            "likert_min": -2147483648,
            "likert_max": 2147483647
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["details"]["field"], "likert");
}
