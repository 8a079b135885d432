//! Request and response types exchanged with the telephony platform

use super::error::RequestError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

// ============================================================================
// Call State
// ============================================================================

/// Call details owned by the platform and round-tripped on every invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallState {
    pub call_id: i64,
    pub from_number: String,
    pub to_number: String,
}

impl CallState {
    pub fn new(call_id: i64, from_number: impl Into<String>, to_number: impl Into<String>) -> Self {
        Self {
            call_id,
            from_number: from_number.into(),
            to_number: to_number.into(),
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Invocation kind on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Setup,
    Option,
    Teardown,
}

impl RequestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::Setup => "setup",
            RequestKind::Option => "option",
            RequestKind::Teardown => "teardown",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body exactly as the platform sends it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawWebhookRequest {
    pub kind: RequestKind,
    #[serde(default)]
    pub state: Option<CallState>,
    #[serde(default)]
    pub option: Option<String>,
}

/// A validated webhook invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookRequest {
    /// Call answered or placed; first hook of every call
    Setup { state: CallState },
    /// Caller supplied input characters
    Option { state: CallState, option: String },
    /// Call ended; last hook of every call
    Teardown { state: CallState },
}

impl WebhookRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            WebhookRequest::Setup { .. } => RequestKind::Setup,
            WebhookRequest::Option { .. } => RequestKind::Option,
            WebhookRequest::Teardown { .. } => RequestKind::Teardown,
        }
    }

    pub fn state(&self) -> &CallState {
        match self {
            WebhookRequest::Setup { state }
            | WebhookRequest::Option { state, .. }
            | WebhookRequest::Teardown { state } => state,
        }
    }
}

impl TryFrom<RawWebhookRequest> for WebhookRequest {
    type Error = RequestError;

    fn try_from(raw: RawWebhookRequest) -> Result<Self, Self::Error> {
        let state = raw.state.ok_or(RequestError::MissingState(raw.kind))?;
        match raw.kind {
            RequestKind::Setup => Ok(WebhookRequest::Setup { state }),
            RequestKind::Option => {
                let option = raw.option.ok_or(RequestError::MissingOption)?;
                Ok(WebhookRequest::Option { state, option })
            }
            RequestKind::Teardown => Ok(WebhookRequest::Teardown { state }),
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Opaque reference to a streaming configuration, interpreted by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamRef(pub Value);

/// What the platform should play next and how much input to collect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// Text segments rendered to audio, in order
    pub prompt: Vec<String>,
    /// Characters to collect before the next option request; 0 ends the call
    pub num_characters: u32,
    #[serde(default)]
    pub stream: Option<StreamRef>,
}

impl WebhookResponse {
    /// Play `prompt` then collect `num_characters` of input
    pub fn collect<I, S>(prompt: I, num_characters: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prompt: prompt.into_iter().map(Into::into).collect(),
            num_characters,
            stream: None,
        }
    }

    /// Play `prompt` then end the call
    pub fn hangup<I, S>(prompt: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::collect(prompt, 0)
    }

    /// Generic reply for failures that must not leave the caller in silence
    pub fn apology() -> Self {
        Self::hangup([
            "Sorry, we are unable to process your request right now.",
            "Please try again later.",
            "Bye.",
        ])
    }

    pub fn ends_call(&self) -> bool {
        self.num_characters == 0
    }
}

// ============================================================================
// Config Reference and Outcome
// ============================================================================

/// Static menu schema handed to the platform at registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConfigRef {
    /// Schema file resolved by the host
    Path { path: PathBuf },
    /// Schema supplied inline
    #[allow(dead_code)] // Used in tests
    Inline { schema: Value },
}

/// Durable result of a finished call, produced by teardown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOutcome {
    pub state: CallState,
    pub confirmed: bool,
}
