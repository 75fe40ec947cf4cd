use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::{AssistantResponse, ResponseEnvelope};

pub const FALLBACK_FETCH: &str =
    "Ein Fehler ist aufgetreten. Der Speiseplan konnte nicht geladen werden.";
pub const FALLBACK_DATE: &str =
    "Ein Fehler ist aufgetreten. Das Datum konnte nicht bestimmt werden.";
pub const FALLBACK_DAY: &str = "Diesen Tag habe ich leider nicht verstanden.";
pub const FALLBACK_ONLY_MENU: &str = "Ich kann leider nur Fragen zum Mensaplan beantworten.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to fetch menu: {0}")]
    Fetch(String),

    #[error("unrecognized weekday: {0}")]
    UnrecognizedWeekday(String),

    #[error("no date found for weekday: {0}")]
    DateNotResolvable(String),

    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

impl AppError {
    /// What the assistant says instead of an answer.
    pub fn utterance(&self) -> &'static str {
        match self {
            AppError::Fetch(_) => FALLBACK_FETCH,
            AppError::UnrecognizedWeekday(_) => FALLBACK_DAY,
            AppError::DateNotResolvable(_) => FALLBACK_DATE,
            AppError::MalformedRequest(_) => FALLBACK_ONLY_MENU,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "answering with fallback utterance");

        // The platform treats non-2xx as a skill crash, so errors stay 200.
        let body = ResponseEnvelope::from(AssistantResponse::end(self.utterance()));
        (StatusCode::OK, axum::Json(body)).into_response()
    }
}
