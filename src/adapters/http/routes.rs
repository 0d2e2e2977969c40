//! Axum router configuration.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{
    add_question, assign_sections, create_section, create_survey, delete_section,
    delete_survey, get_analytics, get_dashboard, get_participation, get_response, get_survey,
    health, list_history, list_sections, list_survey_responses, list_surveys,
    register_respondent, remove_question, reorder_questions, submit_response, update_question,
    update_survey_settings,
};
use super::state::SurveyAppState;

/// Section and respondent directory.
///
/// - `POST /sections`, `GET /sections`, `DELETE /sections/:section_id`
/// - `POST /respondents`
pub fn directory_routes() -> Router<SurveyAppState> {
    Router::new()
        .route("/sections", post(create_section).get(list_sections))
        .route("/sections/:section_id", delete(delete_section))
        .route("/respondents", post(register_respondent))
}

/// Endpoints acting as a respondent, mounted under `/respondents/:respondent_id`.
///
/// - `GET /surveys` - surveys open to the respondent
/// - `GET /surveys/:survey_id` - survey with its questions
/// - `POST /surveys/:survey_id/responses` - submit a response
/// - `GET /responses`, `GET /responses/:response_id` - history and detail
pub fn respondent_routes() -> Router<SurveyAppState> {
    Router::new()
        .route("/surveys", get(list_surveys))
        .route("/surveys/:survey_id", get(get_survey))
        .route("/surveys/:survey_id/responses", post(submit_response))
        .route("/responses", get(list_history))
        .route("/responses/:response_id", get(get_response))
}

/// Authoring and analytics, mounted under `/teachers/:teacher_id`.
///
/// - `GET /surveys/:survey_id/responses?search=&page=` - paged response list
/// - `GET /dashboard?survey_id=&section_id=&date_from=&date_to=` - totals
pub fn teacher_routes() -> Router<SurveyAppState> {
    Router::new()
        .route("/surveys", post(create_survey))
        .route(
            "/surveys/:survey_id",
            axum::routing::patch(update_survey_settings).delete(delete_survey),
        )
        .route("/surveys/:survey_id/sections", put(assign_sections))
        .route(
            "/surveys/:survey_id/questions",
            post(add_question).put(reorder_questions),
        )
        .route(
            "/surveys/:survey_id/questions/:question_id",
            put(update_question).delete(remove_question),
        )
        .route("/surveys/:survey_id/analytics", get(get_analytics))
        .route("/surveys/:survey_id/participation", get(get_participation))
        .route("/surveys/:survey_id/responses", get(list_survey_responses))
        .route("/dashboard", get(get_dashboard))
}

/// Complete API router with state applied.
pub fn api_router(state: SurveyAppState) -> Router {
    let api = Router::new()
        .merge(directory_routes())
        .nest("/respondents/:respondent_id", respondent_routes())
        .nest("/teachers/:teacher_id", teacher_routes());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
}
