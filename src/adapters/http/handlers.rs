//! HTTP handlers.
//!
//! Authentication is out of scope: the acting respondent is named in the
//! path, and handlers check ownership and eligibility against it. The clock
//! is read here, at the edge, and passed into commands.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{
    AddQuestionCommand, AssignSectionsCommand, CreateSectionCommand, CreateSurveyCommand,
    DeleteSectionCommand, DeleteSurveyCommand, GetDashboardQuery, GetParticipationQuery,
    GetResponseQuery, GetSurveyAnalyticsQuery, GetSurveyQuery, ListEligibleSurveysQuery,
    ListHistoryQuery, ListSurveyResponsesQuery,
    RegisterRespondentCommand, RemoveQuestionCommand, ReorderQuestionsCommand,
    SubmitResponseCommand, UpdateQuestionCommand, UpdateSurveySettingsCommand,
};
use crate::domain::foundation::{QuestionId, RespondentId, ResponseId, SectionId, Timestamp};

use super::dto::{
    AssignSectionsRequest, CreateSectionRequest, CreateSurveyRequest, DashboardParams,
    QuestionRequest, QuestionResponse, RegisterRespondentRequest, ReorderQuestionsRequest,
    RespondentResponse, ResponseListParams, SectionResponse, SubmissionResponse,
    SubmitResponseRequest, SurveyResponse, UpdateSurveySettingsRequest,
};
use super::error::{handle_survey_error, parse_date, parse_filter, parse_id};
use super::state::SurveyAppState;

/// Both arms are complete responses; `Err` carries the error body.
type ApiResult = Result<Response, Response>;

// ════════════════════════════════════════════════════════════════════════════
// Sections and respondents
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sections
pub async fn create_section(
    State(state): State<SurveyAppState>,
    Json(req): Json<CreateSectionRequest>,
) -> ApiResult {
    let cmd = CreateSectionCommand {
        name: req.name,
        code: req.code,
        description: req.description,
        now: state.clock.now(),
    };
    let section = state
        .create_section
        .handle(cmd)
        .await
        .map_err(handle_survey_error)?;
    Ok((StatusCode::CREATED, Json(SectionResponse::from(&section))).into_response())
}

/// GET /api/sections
pub async fn list_sections(State(state): State<SurveyAppState>) -> ApiResult {
    let sections = state
        .list_sections
        .handle()
        .await
        .map_err(handle_survey_error)?;
    let body: Vec<SectionResponse> = sections.iter().map(SectionResponse::from).collect();
    Ok(Json(body).into_response())
}

/// DELETE /api/sections/:section_id
pub async fn delete_section(
    State(state): State<SurveyAppState>,
    Path(section_id): Path<String>,
) -> ApiResult {
    let section_id: SectionId = parse_id(&section_id, "section")?;
    state
        .delete_section
        .handle(DeleteSectionCommand { section_id })
        .await
        .map_err(handle_survey_error)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// POST /api/respondents
pub async fn register_respondent(
    State(state): State<SurveyAppState>,
    Json(req): Json<RegisterRespondentRequest>,
) -> ApiResult {
    let cmd = RegisterRespondentCommand {
        display_name: req.display_name,
        kind: req.kind,
        section_id: req.section_id,
    };
    let respondent = state
        .register_respondent
        .handle(cmd)
        .await
        .map_err(handle_survey_error)?;
    Ok((StatusCode::CREATED, Json(RespondentResponse::from(&respondent))).into_response())
}

// ════════════════════════════════════════════════════════════════════════════
// Respondent-facing endpoints
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/respondents/:respondent_id/surveys
///
/// Students see the surveys they can answer now; teachers see their own.
pub async fn list_surveys(
    State(state): State<SurveyAppState>,
    Path(respondent_id): Path<String>,
) -> ApiResult {
    let query = ListEligibleSurveysQuery {
        respondent_id: parse_id(&respondent_id, "respondent")?,
        now: state.clock.now(),
    };
    let surveys = state
        .list_eligible
        .handle(query)
        .await
        .map_err(handle_survey_error)?;
    Ok(Json(surveys).into_response())
}

/// GET /api/respondents/:respondent_id/surveys/:survey_id
pub async fn get_survey(
    State(state): State<SurveyAppState>,
    Path((respondent_id, survey_id)): Path<(String, String)>,
) -> ApiResult {
    let query = GetSurveyQuery {
        viewer_id: parse_id(&respondent_id, "respondent")?,
        survey_id: parse_id(&survey_id, "survey")?,
    };
    let survey = state
        .get_survey
        .handle(query)
        .await
        .map_err(handle_survey_error)?;
    Ok(Json(SurveyResponse::from(&survey)).into_response())
}

/// POST /api/respondents/:respondent_id/surveys/:survey_id/responses
pub async fn submit_response(
    State(state): State<SurveyAppState>,
    Path((respondent_id, survey_id)): Path<(String, String)>,
    Json(req): Json<SubmitResponseRequest>,
) -> ApiResult {
    let cmd = SubmitResponseCommand {
        respondent_id: parse_id(&respondent_id, "respondent")?,
        survey_id: parse_id(&survey_id, "survey")?,
        answers: req.into_raw_answers(),
        now: state.clock.now(),
    };
    let result = state
        .submit_response
        .handle(cmd)
        .await
        .map_err(handle_survey_error)?;
    Ok((StatusCode::CREATED, Json(SubmissionResponse::from(&result))).into_response())
}

/// GET /api/respondents/:respondent_id/responses
pub async fn list_history(
    State(state): State<SurveyAppState>,
    Path(respondent_id): Path<String>,
) -> ApiResult {
    let query = ListHistoryQuery {
        respondent_id: parse_id(&respondent_id, "respondent")?,
    };
    let history = state
        .list_history
        .handle(query)
        .await
        .map_err(handle_survey_error)?;
    Ok(Json(history).into_response())
}

/// GET /api/respondents/:respondent_id/responses/:response_id
pub async fn get_response(
    State(state): State<SurveyAppState>,
    Path((respondent_id, response_id)): Path<(String, String)>,
) -> ApiResult {
    let viewer_id: RespondentId = parse_id(&respondent_id, "respondent")?;
    let response_id: ResponseId = parse_id(&response_id, "response")?;
    let detail = state
        .get_response
        .handle(GetResponseQuery {
            viewer_id,
            response_id,
        })
        .await
        .map_err(handle_survey_error)?;
    Ok(Json(detail).into_response())
}

// ════════════════════════════════════════════════════════════════════════════
// Teacher endpoints
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/teachers/:teacher_id/surveys
pub async fn create_survey(
    State(state): State<SurveyAppState>,
    Path(teacher_id): Path<String>,
    Json(req): Json<CreateSurveyRequest>,
) -> ApiResult {
    let cmd = CreateSurveyCommand {
        creator_id: parse_id(&teacher_id, "teacher")?,
        title: req.title,
        description: req.description,
        is_active: req.is_active,
        due_date: req.due_date.map(Timestamp::from_datetime),
        section_ids: req.section_ids,
        questions: req.questions.into_iter().map(QuestionRequest::into_draft).collect(),
        now: state.clock.now(),
    };
    let survey = state
        .create_survey
        .handle(cmd)
        .await
        .map_err(handle_survey_error)?;
    Ok((StatusCode::CREATED, Json(SurveyResponse::from(&survey))).into_response())
}

/// PATCH /api/teachers/:teacher_id/surveys/:survey_id
pub async fn update_survey_settings(
    State(state): State<SurveyAppState>,
    Path((teacher_id, survey_id)): Path<(String, String)>,
    Json(req): Json<UpdateSurveySettingsRequest>,
) -> ApiResult {
    let cmd = UpdateSurveySettingsCommand {
        teacher_id: parse_id(&teacher_id, "teacher")?,
        survey_id: parse_id(&survey_id, "survey")?,
        settings: req.into(),
        now: state.clock.now(),
    };
    let survey = state
        .update_settings
        .handle(cmd)
        .await
        .map_err(handle_survey_error)?;
    Ok(Json(SurveyResponse::from(&survey)).into_response())
}

/// PUT /api/teachers/:teacher_id/surveys/:survey_id/sections
pub async fn assign_sections(
    State(state): State<SurveyAppState>,
    Path((teacher_id, survey_id)): Path<(String, String)>,
    Json(req): Json<AssignSectionsRequest>,
) -> ApiResult {
    let cmd = AssignSectionsCommand {
        teacher_id: parse_id(&teacher_id, "teacher")?,
        survey_id: parse_id(&survey_id, "survey")?,
        section_ids: req.section_ids,
        now: state.clock.now(),
    };
    let survey = state
        .assign_sections
        .handle(cmd)
        .await
        .map_err(handle_survey_error)?;
    Ok(Json(SurveyResponse::from(&survey)).into_response())
}

/// DELETE /api/teachers/:teacher_id/surveys/:survey_id
pub async fn delete_survey(
    State(state): State<SurveyAppState>,
    Path((teacher_id, survey_id)): Path<(String, String)>,
) -> ApiResult {
    let cmd = DeleteSurveyCommand {
        teacher_id: parse_id(&teacher_id, "teacher")?,
        survey_id: parse_id(&survey_id, "survey")?,
    };
    state
        .delete_survey
        .handle(cmd)
        .await
        .map_err(handle_survey_error)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// POST /api/teachers/:teacher_id/surveys/:survey_id/questions
pub async fn add_question(
    State(state): State<SurveyAppState>,
    Path((teacher_id, survey_id)): Path<(String, String)>,
    Json(req): Json<QuestionRequest>,
) -> ApiResult {
    let cmd = AddQuestionCommand {
        teacher_id: parse_id(&teacher_id, "teacher")?,
        survey_id: parse_id(&survey_id, "survey")?,
        draft: req.into_draft(),
        now: state.clock.now(),
    };
    let question = state
        .add_question
        .handle(cmd)
        .await
        .map_err(handle_survey_error)?;
    Ok((StatusCode::CREATED, Json(QuestionResponse::from(&question))).into_response())
}

/// PUT /api/teachers/:teacher_id/surveys/:survey_id/questions
///
/// Reorders the questions; the body lists every question id once.
pub async fn reorder_questions(
    State(state): State<SurveyAppState>,
    Path((teacher_id, survey_id)): Path<(String, String)>,
    Json(req): Json<ReorderQuestionsRequest>,
) -> ApiResult {
    let cmd = ReorderQuestionsCommand {
        teacher_id: parse_id(&teacher_id, "teacher")?,
        survey_id: parse_id(&survey_id, "survey")?,
        question_ids: req.question_ids,
        now: state.clock.now(),
    };
    let questions = state
        .reorder_questions
        .handle(cmd)
        .await
        .map_err(handle_survey_error)?;
    let body: Vec<QuestionResponse> = questions.iter().map(QuestionResponse::from).collect();
    Ok(Json(body).into_response())
}

/// PUT /api/teachers/:teacher_id/surveys/:survey_id/questions/:question_id
pub async fn update_question(
    State(state): State<SurveyAppState>,
    Path((teacher_id, survey_id, question_id)): Path<(String, String, String)>,
    Json(req): Json<QuestionRequest>,
) -> ApiResult {
    let question_id: QuestionId = parse_id(&question_id, "question")?;
    let cmd = UpdateQuestionCommand {
        teacher_id: parse_id(&teacher_id, "teacher")?,
        survey_id: parse_id(&survey_id, "survey")?,
        question_id,
        draft: req.into_draft(),
        now: state.clock.now(),
    };
    let question = state
        .update_question
        .handle(cmd)
        .await
        .map_err(handle_survey_error)?;
    Ok(Json(QuestionResponse::from(&question)).into_response())
}

/// DELETE /api/teachers/:teacher_id/surveys/:survey_id/questions/:question_id
pub async fn remove_question(
    State(state): State<SurveyAppState>,
    Path((teacher_id, survey_id, question_id)): Path<(String, String, String)>,
) -> ApiResult {
    let cmd = RemoveQuestionCommand {
        teacher_id: parse_id(&teacher_id, "teacher")?,
        survey_id: parse_id(&survey_id, "survey")?,
        question_id: parse_id(&question_id, "question")?,
        now: state.clock.now(),
    };
    state
        .remove_question
        .handle(cmd)
        .await
        .map_err(handle_survey_error)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// GET /api/teachers/:teacher_id/surveys/:survey_id/analytics
pub async fn get_analytics(
    State(state): State<SurveyAppState>,
    Path((teacher_id, survey_id)): Path<(String, String)>,
) -> ApiResult {
    let query = GetSurveyAnalyticsQuery {
        teacher_id: parse_id(&teacher_id, "teacher")?,
        survey_id: parse_id(&survey_id, "survey")?,
    };
    let analytics = state
        .analytics
        .handle(query)
        .await
        .map_err(handle_survey_error)?;
    Ok(Json(analytics).into_response())
}

/// GET /api/teachers/:teacher_id/surveys/:survey_id/participation
pub async fn get_participation(
    State(state): State<SurveyAppState>,
    Path((teacher_id, survey_id)): Path<(String, String)>,
) -> ApiResult {
    let query = GetParticipationQuery {
        teacher_id: parse_id(&teacher_id, "teacher")?,
        survey_id: parse_id(&survey_id, "survey")?,
    };
    let participation = state
        .participation
        .handle(query)
        .await
        .map_err(handle_survey_error)?;
    Ok(Json(participation).into_response())
}

/// GET /api/teachers/:teacher_id/surveys/:survey_id/responses
pub async fn list_survey_responses(
    State(state): State<SurveyAppState>,
    Path((teacher_id, survey_id)): Path<(String, String)>,
    Query(params): Query<ResponseListParams>,
) -> ApiResult {
    let query = ListSurveyResponsesQuery {
        teacher_id: parse_id(&teacher_id, "teacher")?,
        survey_id: parse_id(&survey_id, "survey")?,
        search: params.search,
        page: params.page,
    };
    let page = state
        .survey_responses
        .handle(query)
        .await
        .map_err(handle_survey_error)?;
    Ok(Json(page).into_response())
}

/// GET /api/teachers/:teacher_id/dashboard
pub async fn get_dashboard(
    State(state): State<SurveyAppState>,
    Path(teacher_id): Path<String>,
    Query(params): Query<DashboardParams>,
) -> ApiResult {
    let query = GetDashboardQuery {
        teacher_id: parse_id(&teacher_id, "teacher")?,
        survey_id: parse_filter(params.survey_id.as_deref(), "survey")?,
        section_id: parse_filter(params.section_id.as_deref(), "section")?,
        date_from: parse_date(params.date_from.as_deref(), "date_from")?,
        date_to: parse_date(params.date_to.as_deref(), "date_to")?,
        now: state.clock.now(),
    };
    let dashboard = state
        .dashboard
        .handle(query)
        .await
        .map_err(handle_survey_error)?;
    Ok(Json(dashboard).into_response())
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
