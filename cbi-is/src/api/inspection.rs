//! Inspection workflow API handlers
//!
//! One endpoint per operator action: start, submit flight, trigger capture,
//! confirm preview, submit qualitative, restart, exit, plus a status poll.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::{FlightForm, InspectionSession, QualitativeAssessment, SessionView, StepData};
use crate::presenter::{result_view, ResultView};
use crate::workflow::{CaptureStatus, RegistrationStatus};
use crate::AppState;

/// POST /inspection/start request
#[derive(Debug, Deserialize)]
pub struct StartInspectionRequest {
    /// Airline name selected by the operator
    pub airline: String,
}

/// POST /inspection/{id}/scan request
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// Camera frame: a base64 JPEG data URI or a bare base64 payload
    pub image: String,
}

/// Session state as returned by every inspection endpoint
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub session: SessionView,
    /// Terminal result rendering, present only in the `done` step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultView>,
}

impl SessionResponse {
    fn from_session(session: &InspectionSession) -> Self {
        let result = match &session.step {
            StepData::Done { result, .. } => Some(result_view(result)),
            _ => None,
        };
        Self {
            session: SessionView::from_session(session),
            result,
        }
    }
}

/// POST /inspection/{id}/scan response
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub outcome: CaptureStatus,
    #[serde(flatten)]
    pub session: SessionResponse,
}

/// POST /inspection/{id}/qualitative response
#[derive(Debug, Serialize)]
pub struct QualitativeResponse {
    pub outcome: RegistrationStatus,
    #[serde(flatten)]
    pub session: SessionResponse,
}

/// POST /inspection/start
///
/// Create an inspection session for the selected airline. The carrier-code
/// lookup starts in the background; its outcome shows up in the session view.
pub async fn start_inspection(
    State(state): State<AppState>,
    Json(request): Json<StartInspectionRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state.controller.start(request.airline).await?;
    Ok(Json(SessionResponse::from_session(&session)))
}

/// GET /inspection/{session_id}
///
/// Poll the current session state.
pub async fn get_inspection(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state.controller.view(session_id).await?;
    Ok(Json(SessionResponse::from_session(&session)))
}

/// POST /inspection/{session_id}/flight
///
/// Submit the flight form; advances the workflow to `scan`.
pub async fn submit_flight(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(form): Json<FlightForm>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state.controller.submit_flight(session_id, form).await?;
    Ok(Json(SessionResponse::from_session(&session)))
}

/// POST /inspection/{session_id}/scan
///
/// Trigger one capture attempt with a camera frame. Refused with 409 while a
/// prior attempt is still in flight.
pub async fn scan_bottle(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ScanRequest>,
) -> ApiResult<Json<ScanResponse>> {
    let capture = state
        .controller
        .trigger_capture(session_id, &request.image)
        .await?;
    Ok(Json(ScanResponse {
        outcome: capture.status,
        session: SessionResponse::from_session(&capture.session),
    }))
}

/// POST /inspection/{session_id}/preview/continue
///
/// Confirm the recognized product; advances the workflow to `qualitative`.
pub async fn continue_preview(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state.controller.continue_preview(session_id).await?;
    Ok(Json(SessionResponse::from_session(&session)))
}

/// POST /inspection/{session_id}/qualitative
///
/// Submit the qualitative assessment. Resolves into `done` whether the
/// registration call succeeds or fails; missing prior-step data answers with
/// a corrective routing instead.
pub async fn submit_qualitative(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(assessment): Json<QualitativeAssessment>,
) -> ApiResult<Json<QualitativeResponse>> {
    let outcome = state
        .controller
        .submit_qualitative(session_id, assessment)
        .await?;
    Ok(Json(QualitativeResponse {
        outcome: outcome.status,
        session: SessionResponse::from_session(&outcome.session),
    }))
}

/// POST /inspection/{session_id}/restart
///
/// From `done` only: clears all inspection entities and returns to `flight`.
pub async fn restart_inspection(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state.controller.restart(session_id).await?;
    Ok(Json(SessionResponse::from_session(&session)))
}

/// POST /inspection/{session_id}/exit response
#[derive(Debug, Serialize)]
pub struct ExitResponse {
    pub session_id: Uuid,
    pub closed: bool,
}

/// POST /inspection/{session_id}/exit
///
/// From `done` only: destroys the session and hands control back to the
/// caller, which owns clearing the airline selection.
pub async fn exit_inspection(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<ExitResponse>> {
    state.controller.exit(session_id).await?;
    Ok(Json(ExitResponse {
        session_id,
        closed: true,
    }))
}

/// Build inspection workflow routes
pub fn inspection_routes() -> Router<AppState> {
    Router::new()
        .route("/inspection/start", post(start_inspection))
        .route("/inspection/:session_id", get(get_inspection))
        .route("/inspection/:session_id/flight", post(submit_flight))
        .route("/inspection/:session_id/scan", post(scan_bottle))
        .route(
            "/inspection/:session_id/preview/continue",
            post(continue_preview),
        )
        .route(
            "/inspection/:session_id/qualitative",
            post(submit_qualitative),
        )
        .route("/inspection/:session_id/restart", post(restart_inspection))
        .route("/inspection/:session_id/exit", post(exit_inspection))
}
