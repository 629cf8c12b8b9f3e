use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::interview_dto::{
    AnalyzeAnswerRequest, AnalyzeAnswerResponse, StartSessionRequest, StartSessionResponse,
    SubmitAnswerRequest,
};
use crate::error::Error;
use crate::services::scoring;
use crate::AppState;

#[axum::debug_handler]
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let level = req.difficulty().map_err(Error::BadRequest)?;
    let session = state
        .interview_service
        .start_session(req.user_id.clone(), level)?;
    Ok((
        StatusCode::CREATED,
        Json(StartSessionResponse::from(&session)),
    )
        .into_response())
}

#[axum::debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let session = state.interview_service.get_session(id)?;
    Ok(Json(session).into_response())
}

#[axum::debug_handler]
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitAnswerRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    match state.interview_service.submit_answer(id, &req.answer).await {
        Ok(outcome) => Ok(Json(outcome).into_response()),
        Err(e) => {
            tracing::error!(session_id = %id, error = %e, "Interview turn failed");
            Err(e)
        }
    }
}

#[axum::debug_handler]
pub async fn abort_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let session = state.interview_service.abort_session(id)?;
    Ok(Json(session).into_response())
}

#[axum::debug_handler]
pub async fn analyze_answer(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeAnswerRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let category = req.category().map_err(Error::BadRequest)?;
    let analysis = state
        .interview_service
        .analyze_answer(category, &req.question, &req.answer)
        .await?;
    let percentage = scoring::score_to_percentage(analysis.total_score(), analysis.criteria_count());
    Ok(Json(AnalyzeAnswerResponse {
        analysis,
        percentage,
    })
    .into_response())
}
