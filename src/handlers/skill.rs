use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::errors::AppError;
use crate::models::{AssistantRequest, ResponseEnvelope};
use crate::services::skill;
use crate::state::AppState;

/// Assistant webhook. The body is validated here rather than by the `Json`
/// extractor so that malformed requests still get a spoken answer.
pub async fn alexa_webhook(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let request = AssistantRequest::from_slice(&body)?;

    Ok(match skill::handle_request(&state, request).await {
        Some(answer) => Json(ResponseEnvelope::from(answer)).into_response(),
        None => StatusCode::OK.into_response(),
    })
}
