//! Asynchronous-track hooks for the confirmation flow

use crate::webhook::{
    AudioChunk, AudioStreamHooks, CallState, TranscriptionChunk, TranscriptionHooks,
    WebhookResponse,
};
use async_trait::async_trait;

/// Logs raw caller audio and keeps running totals for the call
#[derive(Debug, Default)]
pub struct AudioMeter {
    call: Option<CallState>,
    chunks: u64,
    bytes: usize,
}

#[async_trait]
impl AudioStreamHooks for AudioMeter {
    async fn on_init(&mut self, state: &CallState) {
        tracing::info!(call_id = state.call_id, "Raw audio stream opened");
        self.call = Some(state.clone());
    }

    async fn handle_raw_audio(&mut self, chunk: AudioChunk) {
        self.chunks += 1;
        self.bytes += chunk.audio.len();
        tracing::debug!(
            call_id = chunk.call_id,
            ivr_id = chunk.ivr_id,
            chunk_id = chunk.chunk_id,
            bytes = chunk.audio.len(),
            total_chunks = self.chunks,
            total_bytes = self.bytes,
            to_number = self.call.as_ref().map_or("", |c| c.to_number.as_str()),
            "Received raw audio"
        );
    }
}

/// Logs transcriptions. In conversational mode it echoes each one back and
/// keeps the call open for more input.
#[derive(Debug)]
pub struct TranscriptEcho {
    conversational: bool,
    call: Option<CallState>,
}

impl TranscriptEcho {
    pub fn new(conversational: bool) -> Self {
        Self {
            conversational,
            call: None,
        }
    }
}

#[async_trait]
impl TranscriptionHooks for TranscriptEcho {
    async fn on_init(&mut self, state: &CallState) {
        tracing::info!(
            call_id = state.call_id,
            conversational = self.conversational,
            "Transcription stream opened"
        );
        self.call = Some(state.clone());
    }

    async fn on_transcription(&mut self, chunk: TranscriptionChunk) -> Option<WebhookResponse> {
        tracing::info!(
            call_id = chunk.call_id,
            ivr_id = chunk.ivr_id,
            chunk_id = chunk.chunk_id,
            duration = chunk.duration,
            transcription = %chunk.transcription,
            "Received transcription"
        );
        // Outside conversational mode a reply would talk over the menu
        self.conversational
            .then(|| WebhookResponse::collect([chunk.transcription], 1))
    }
}
