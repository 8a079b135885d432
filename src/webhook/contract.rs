//! The call-flow trait and its opt-in extension hooks

use super::error::FlowError;
use super::types::{CallOutcome, CallState, ConfigRef, WebhookResponse};
use async_trait::async_trait;
use serde::Serialize;

/// Extension capabilities a flow declares when it is constructed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Raw caller audio is delivered to the flow
    pub stream: bool,
    /// Transcribed caller speech is delivered to the flow
    pub transcribe: bool,
    /// Transcription replies are spoken back to the caller
    pub conversational: bool,
}

impl Capabilities {
    /// Whether calls need a per-call asynchronous track
    pub fn uses_async_track(&self) -> bool {
        self.stream || self.transcribe
    }
}

/// A navigable voice menu driven by the platform's webhook invocations.
///
/// Synchronous hooks run one at a time per call. All per-call memory lives in
/// [`CallFlow::Context`], created by `setup`, threaded through every
/// `handle_option` and consumed by `teardown`; the flow itself holds no
/// per-call fields.
pub trait CallFlow: Send + Sync + 'static {
    /// Per-call state owned by the call's session
    type Context: Send + 'static;

    /// Menu schema for the platform to validate against. Called once.
    fn config(&self) -> ConfigRef;

    fn capabilities(&self) -> Capabilities;

    /// First hook of a call. Binds the per-call context and returns the
    /// opening prompt.
    fn setup(&self, state: &CallState) -> Result<(Self::Context, WebhookResponse), FlowError>;

    /// One caller input event. Every option string resolves to a defined
    /// branch; errors are reserved for input that arrives after the call ended.
    fn handle_option(
        &self,
        ctx: &mut Self::Context,
        option: &str,
    ) -> Result<WebhookResponse, FlowError>;

    /// Last hook of a call, however it ended. Returns the outcome to persist.
    fn teardown(&self, ctx: Self::Context, state: &CallState) -> Option<CallOutcome>;

    /// Fresh raw-audio hooks for one call. Only consulted when
    /// `capabilities().stream` is set.
    fn audio_hooks(&self) -> Option<Box<dyn AudioStreamHooks>> {
        None
    }

    /// Fresh transcription hooks for one call. Only consulted when
    /// `capabilities().transcribe` is set.
    fn transcription_hooks(&self) -> Option<Box<dyn TranscriptionHooks>> {
        None
    }
}

/// One chunk of raw caller audio
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub call_id: i64,
    pub ivr_id: i64,
    pub chunk_id: u64,
    pub audio: Vec<u8>,
}

/// One transcribed span of caller speech
#[derive(Debug, Clone)]
pub struct TranscriptionChunk {
    pub call_id: i64,
    pub ivr_id: i64,
    pub chunk_id: u64,
    /// Seconds of audio covered by the transcription
    pub duration: f64,
    pub transcription: String,
}

/// Raw audio hooks. One instance serves exactly one call; it never sees the
/// synchronous per-call context.
#[async_trait]
pub trait AudioStreamHooks: Send {
    async fn on_init(&mut self, _state: &CallState) {}

    async fn handle_raw_audio(&mut self, chunk: AudioChunk);
}

/// Transcription hooks. One instance serves exactly one call.
#[async_trait]
pub trait TranscriptionHooks: Send {
    async fn on_init(&mut self, _state: &CallState) {}

    /// Optionally reply with something to speak. Replies are only forwarded
    /// in conversational mode.
    async fn on_transcription(&mut self, chunk: TranscriptionChunk) -> Option<WebhookResponse>;
}
