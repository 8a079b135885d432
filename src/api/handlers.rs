//! HTTP request handlers

use super::types::{
    AudioChunkRequest, ConfigResponse, ErrorResponse, TrackAck, TranscriptionRequest,
};
use super::AppState;
use crate::db::OutcomeRecord;
use crate::runtime::SessionError;
use crate::webhook::{
    AudioChunk, RawWebhookRequest, TranscriptionChunk, WebhookRequest, WebhookResponse,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::Engine;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Registration-time schema reference
        .route("/config", get(get_config))
        // Synchronous hooks
        .route("/webhook", post(webhook))
        // Async track
        .route("/calls/:call_id/audio", post(push_audio))
        .route("/calls/:call_id/transcription", post(push_transcription))
        // Persisted results
        .route("/calls/:call_id/outcome", get(get_outcome))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Config
// ============================================================

async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        config: state.sessions.config(),
        capabilities: state.sessions.capabilities(),
    })
}

// ============================================================
// Synchronous Hooks
// ============================================================

async fn webhook(
    State(state): State<AppState>,
    payload: Result<Json<RawWebhookRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(raw) = payload.map_err(|e| {
        tracing::warn!(error = %e, "Malformed webhook request");
        AppError::BadRequest(e.body_text())
    })?;
    let kind = raw.kind;
    let request = WebhookRequest::try_from(raw).map_err(|e| {
        tracing::warn!(kind = %kind, error = %e, "Invalid webhook request");
        AppError::BadRequest(e.to_string())
    })?;
    tracing::info!(
        call_id = request.state().call_id,
        kind = %request.kind(),
        "Webhook request"
    );

    match request {
        WebhookRequest::Setup { state: call } => {
            let response: WebhookResponse = state.sessions.setup(call).await?;
            Ok(Json(response).into_response())
        }
        WebhookRequest::Option {
            state: call,
            option,
        } => {
            let response = state.sessions.handle_option(&call, &option).await;
            Ok(Json(response).into_response())
        }
        WebhookRequest::Teardown { state: call } => {
            state.sessions.teardown(&call).await;
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

// ============================================================
// Async Track
// ============================================================

async fn push_audio(
    State(state): State<AppState>,
    Path(call_id): Path<i64>,
    Json(req): Json<AudioChunkRequest>,
) -> Result<Json<TrackAck>, AppError> {
    let audio = base64::engine::general_purpose::STANDARD
        .decode(req.audio.as_bytes())
        .map_err(|e| AppError::BadRequest(format!("Invalid audio encoding: {e}")))?;

    let chunk = AudioChunk {
        call_id,
        ivr_id: req.ivr_id,
        chunk_id: req.chunk_id,
        audio,
    };

    match state.sessions.push_audio(call_id, chunk).await {
        Ok(()) => Ok(Json(TrackAck::accepted())),
        Err(SessionError::Unsupported(_)) => Ok(Json(TrackAck::unsupported())),
        Err(e) => Err(e.into()),
    }
}

async fn push_transcription(
    State(state): State<AppState>,
    Path(call_id): Path<i64>,
    Json(req): Json<TranscriptionRequest>,
) -> Result<Json<TrackAck>, AppError> {
    let chunk = TranscriptionChunk {
        call_id,
        ivr_id: req.ivr_id,
        chunk_id: req.chunk_id,
        duration: req.duration,
        transcription: req.transcription,
    };

    match state.sessions.push_transcription(call_id, chunk).await {
        Ok(reply) => Ok(Json(TrackAck::accepted().with_response(reply))),
        Err(SessionError::Unsupported(_)) => Ok(Json(TrackAck::unsupported())),
        Err(e) => Err(e.into()),
    }
}

// ============================================================
// Outcomes
// ============================================================

async fn get_outcome(
    State(state): State<AppState>,
    Path(call_id): Path<i64>,
) -> Result<Json<OutcomeRecord>, AppError> {
    state
        .sessions
        .outcome(call_id)
        .await
        .map_err(AppError::Internal)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No outcome for call {call_id}")))
}

async fn get_version() -> &'static str {
    concat!("ivr-webhook ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Gone(String),
    Internal(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::AlreadyStarted(call_id) => {
                tracing::warn!(call_id, "Duplicate setup");
                AppError::Conflict(e.to_string())
            }
            SessionError::TrackClosed(_) => AppError::Gone(e.to_string()),
            SessionError::Unsupported(_) => AppError::BadRequest(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Gone(msg) => (StatusCode::GONE, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
