use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Inbound assistant request, validated at the HTTP boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantRequest {
    Launch,
    Intent {
        name: String,
        /// Slot name to spoken value. Slots the platform left unfilled are absent.
        slots: HashMap<String, String>,
    },
    SessionEnded,
    Unknown,
}

#[derive(Deserialize)]
struct RequestEnvelope {
    request: RawRequest,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum RawRequest {
    LaunchRequest,
    IntentRequest { intent: RawIntent },
    SessionEndedRequest,
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize)]
struct RawIntent {
    name: String,
    #[serde(default)]
    slots: Option<HashMap<String, RawSlot>>,
}

#[derive(Deserialize)]
struct RawSlot {
    #[serde(default)]
    value: Option<String>,
}

impl AssistantRequest {
    pub fn from_slice(body: &[u8]) -> Result<Self, AppError> {
        let envelope: RequestEnvelope = serde_json::from_slice(body)
            .map_err(|e| AppError::MalformedRequest(e.to_string()))?;

        Ok(match envelope.request {
            RawRequest::LaunchRequest => AssistantRequest::Launch,
            RawRequest::IntentRequest { intent } => {
                let slots = intent
                    .slots
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|(name, slot)| slot.value.map(|value| (name, value)))
                    .collect();
                AssistantRequest::Intent {
                    name: intent.name,
                    slots,
                }
            }
            RawRequest::SessionEndedRequest => AssistantRequest::SessionEnded,
            RawRequest::Unknown => AssistantRequest::Unknown,
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AssistantRequest::Launch => "launch",
            AssistantRequest::Intent { .. } => "intent",
            AssistantRequest::SessionEnded => "session_ended",
            AssistantRequest::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssistantResponse {
    pub speech_text: String,
    pub should_end_session: bool,
}

impl AssistantResponse {
    /// Answer and close the session.
    pub fn end(text: impl Into<String>) -> Self {
        Self {
            speech_text: text.into(),
            should_end_session: true,
        }
    }

    /// Speak and keep the session open for a follow-up intent.
    pub fn ask(text: impl Into<String>) -> Self {
        Self {
            speech_text: text.into(),
            should_end_session: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    pub session_attributes: serde_json::Map<String, serde_json::Value>,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub output_speech: OutputSpeech,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl From<AssistantResponse> for ResponseEnvelope {
    fn from(res: AssistantResponse) -> Self {
        Self {
            version: "1.0".to_string(),
            session_attributes: serde_json::Map::new(),
            response: ResponseBody {
                output_speech: OutputSpeech {
                    kind: "PlainText".to_string(),
                    text: res.speech_text,
                },
                should_end_session: res.should_end_session,
            },
        }
    }
}
