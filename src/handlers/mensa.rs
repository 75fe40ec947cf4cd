use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::models::ResponseEnvelope;
use crate::services::dates::DateReference;
use crate::services::skill;
use crate::state::AppState;

/// Today's menu without going through the assistant platform.
pub async fn today(State(state): State<Arc<AppState>>) -> Json<ResponseEnvelope> {
    let answer = skill::menu_response(&state, &DateReference::Today).await;
    Json(ResponseEnvelope::from(answer))
}
