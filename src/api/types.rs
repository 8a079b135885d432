//! API request and response types

use crate::webhook::{Capabilities, ConfigRef, WebhookResponse};
use serde::{Deserialize, Serialize};

/// Raw caller audio pushed on the async track
#[derive(Debug, Deserialize)]
pub struct AudioChunkRequest {
    #[serde(default)]
    pub ivr_id: i64,
    pub chunk_id: u64,
    /// Base64-encoded audio bytes
    pub audio: String,
}

/// Transcribed caller speech pushed on the async track
#[derive(Debug, Deserialize)]
pub struct TranscriptionRequest {
    #[serde(default)]
    pub ivr_id: i64,
    pub chunk_id: u64,
    /// Seconds of speech covered by this transcription
    pub duration: f64,
    pub transcription: String,
}

/// Acknowledgement for an async-track event
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TrackAck {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Reply to speak to the caller (conversational mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<WebhookResponse>,
}

impl TrackAck {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            reason: None,
            response: None,
        }
    }

    pub fn unsupported() -> Self {
        Self {
            accepted: false,
            reason: Some("unsupported".to_string()),
            response: None,
        }
    }

    #[must_use]
    pub fn with_response(mut self, response: Option<WebhookResponse>) -> Self {
        self.response = response;
        self
    }
}

/// Response for the registration-time config request
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config: ConfigRef,
    pub capabilities: Capabilities,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
