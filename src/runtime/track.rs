//! Per-call asynchronous track
//!
//! Raw audio and transcription events for one call are funnelled through a
//! channel into a single task, so the hooks see them one at a time and in
//! arrival order. Teardown cancels the task.

use crate::webhook::{
    AudioChunk, AudioStreamHooks, CallState, TranscriptionChunk, TranscriptionHooks,
    WebhookResponse,
};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// Pending async-track events per call before senders wait
pub(super) const TRACK_BUFFER: usize = 64;

pub(super) enum TrackEvent {
    Audio(AudioChunk),
    Transcription {
        chunk: TranscriptionChunk,
        reply_tx: oneshot::Sender<Option<WebhookResponse>>,
    },
}

/// Handle to a running track
#[derive(Clone)]
pub(super) struct TrackHandle {
    pub event_tx: mpsc::Sender<TrackEvent>,
    pub cancel: CancellationToken,
    pub audio: bool,
    pub transcription: bool,
}

pub(super) struct CallTrack {
    state: CallState,
    audio: Option<Box<dyn AudioStreamHooks>>,
    transcription: Option<Box<dyn TranscriptionHooks>>,
    conversational: bool,
    event_rx: mpsc::Receiver<TrackEvent>,
    cancel: CancellationToken,
}

impl CallTrack {
    /// Build a track and the handle used to feed it
    pub fn new(
        state: CallState,
        audio: Option<Box<dyn AudioStreamHooks>>,
        transcription: Option<Box<dyn TranscriptionHooks>>,
        conversational: bool,
    ) -> (Self, TrackHandle) {
        let (event_tx, event_rx) = mpsc::channel(TRACK_BUFFER);
        let cancel = CancellationToken::new();
        let handle = TrackHandle {
            event_tx,
            cancel: cancel.clone(),
            audio: audio.is_some(),
            transcription: transcription.is_some(),
        };
        let track = Self {
            state,
            audio,
            transcription,
            conversational,
            event_rx,
            cancel,
        };
        (track, handle)
    }

    pub async fn run(mut self) {
        let call_id = self.state.call_id;
        tracing::info!(call_id, "Starting async track");

        if let Some(hooks) = self.audio.as_mut() {
            hooks.on_init(&self.state).await;
        }
        if let Some(hooks) = self.transcription.as_mut() {
            hooks.on_init(&self.state).await;
        }

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                event = self.event_rx.recv() => match event {
                    Some(event) => self.process_event(event).await,
                    None => break,
                },
            }
        }

        tracing::info!(call_id, "Async track stopped");
    }

    async fn process_event(&mut self, event: TrackEvent) {
        match event {
            TrackEvent::Audio(chunk) => {
                if let Some(hooks) = self.audio.as_mut() {
                    hooks.handle_raw_audio(chunk).await;
                }
            }
            TrackEvent::Transcription { chunk, reply_tx } => {
                let reply = match self.transcription.as_mut() {
                    Some(hooks) => hooks.on_transcription(chunk).await,
                    None => None,
                };
                // Receiver may have given up; nothing else to do then
                let _ = reply_tx.send(self.screen_reply(reply));
            }
        }
    }

    /// Outside conversational mode a reply would overlap system speech
    fn screen_reply(&self, reply: Option<WebhookResponse>) -> Option<WebhookResponse> {
        match (reply, self.conversational) {
            (Some(_), false) => {
                tracing::warn!(
                    call_id = self.state.call_id,
                    "Dropping transcription reply outside conversational mode"
                );
                None
            }
            (None, true) => {
                tracing::warn!(
                    call_id = self.state.call_id,
                    "Conversational flow returned no reply to a transcription"
                );
                None
            }
            (reply, _) => reply,
        }
    }
}
