//! Runtime for live calls
//!
//! The session manager owns one session per active call, keyed by call id.
//! Synchronous hooks for a call are serialized on that call's session lock,
//! while different calls proceed independently. Flows that opt into audio
//! or transcription get a per-call track task fed over a channel.

mod track;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use traits::*;

use crate::db::OutcomeRecord;
use crate::webhook::{
    AudioChunk, CallFlow, CallState, Capabilities, ConfigRef, TranscriptionChunk, WebhookResponse,
};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{oneshot, Mutex, RwLock};
use track::{CallTrack, TrackEvent, TrackHandle};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Call {0} already has an active session")]
    AlreadyStarted(i64),
    #[error("Async track for call {0} is closed")]
    TrackClosed(i64),
    #[error("Flow does not support {0}")]
    Unsupported(&'static str),
}

/// State held for one active call
struct CallSession<C> {
    state: CallState,
    context: C,
    /// Set once a response has ended the call
    ended: bool,
}

type SessionSlot<C> = Arc<Mutex<Option<CallSession<C>>>>;

/// Manager for all active call sessions
pub struct SessionManager<F: CallFlow> {
    flow: Arc<F>,
    store: Arc<dyn OutcomeStore>,
    sessions: RwLock<HashMap<i64, SessionSlot<F::Context>>>,
    tracks: RwLock<HashMap<i64, TrackHandle>>,
}

impl<F: CallFlow> SessionManager<F> {
    pub fn new(flow: F, store: Arc<dyn OutcomeStore>) -> Self {
        Self {
            flow: Arc::new(flow),
            store,
            sessions: RwLock::new(HashMap::new()),
            tracks: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> ConfigRef {
        self.flow.config()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.flow.capabilities()
    }

    /// Number of calls with a live session
    #[allow(dead_code)] // Used in tests
    pub async fn active_calls(&self) -> usize {
        self.sessions.read().await.len()
    }

    // ==================== Synchronous Hooks ====================

    /// Start a call. A flow failure is answered with an apology and leaves no
    /// session behind.
    pub async fn setup(&self, state: CallState) -> Result<WebhookResponse, SessionError> {
        let call_id = state.call_id;
        if self.sessions.read().await.contains_key(&call_id) {
            return Err(SessionError::AlreadyStarted(call_id));
        }

        let (context, response) = match self.flow.setup(&state) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(call_id, error = %e, "Setup failed");
                return Ok(WebhookResponse::apology());
            }
        };

        // Track opens under the sessions lock so a racing teardown finds both
        let mut sessions = self.sessions.write().await;
        match sessions.entry(call_id) {
            Entry::Occupied(_) => return Err(SessionError::AlreadyStarted(call_id)),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Mutex::new(Some(CallSession {
                    state: state.clone(),
                    context,
                    ended: response.ends_call(),
                }))));
            }
        }

        tracing::info!(
            call_id,
            from = %state.from_number,
            to = %state.to_number,
            "Call started"
        );

        if self.flow.capabilities().uses_async_track() {
            self.open_track(state).await;
        }

        Ok(response)
    }

    /// Feed one caller input to the call's flow
    pub async fn handle_option(&self, state: &CallState, option: &str) -> WebhookResponse {
        let call_id = state.call_id;
        let Some(slot) = self.sessions.read().await.get(&call_id).cloned() else {
            tracing::warn!(call_id, "Option for unknown call");
            return WebhookResponse::apology();
        };

        let mut guard = slot.lock().await;
        let Some(session) = guard.as_mut() else {
            tracing::warn!(call_id, "Option raced with teardown");
            return WebhookResponse::apology();
        };

        if session.ended {
            tracing::warn!(call_id, option, "Option after call ended");
            return WebhookResponse::apology();
        }

        match self.flow.handle_option(&mut session.context, option) {
            Ok(response) => {
                session.ended = response.ends_call();
                response
            }
            Err(e) => {
                tracing::error!(call_id, option, error = %e, "Option handling failed");
                session.ended = true;
                WebhookResponse::apology()
            }
        }
    }

    /// Finish a call: stop its track, run the flow's teardown and persist the
    /// outcome. Persistence failures are logged and never surface to the
    /// platform.
    pub async fn teardown(&self, state: &CallState) {
        let call_id = state.call_id;
        let slot = self.sessions.write().await.remove(&call_id);
        self.close_track(call_id).await;

        let Some(slot) = slot else {
            tracing::warn!(call_id, "Teardown for unknown call");
            return;
        };
        let Some(session) = slot.lock().await.take() else {
            return;
        };

        let Some(outcome) = self.flow.teardown(session.context, &session.state) else {
            tracing::info!(call_id, "Call finished without outcome");
            return;
        };

        match self.store.record(&outcome).await {
            Ok(record) => tracing::info!(
                call_id,
                confirmed = record.confirmed,
                "Call outcome recorded"
            ),
            Err(e) => tracing::error!(
                call_id,
                confirmed = outcome.confirmed,
                error = %e,
                "Failed to record call outcome"
            ),
        }
    }

    pub async fn outcome(&self, call_id: i64) -> Result<Option<OutcomeRecord>, String> {
        self.store.get(call_id).await
    }

    // ==================== Async Track ====================

    async fn open_track(&self, state: CallState) {
        let capabilities = self.flow.capabilities();
        let audio = if capabilities.stream {
            self.flow.audio_hooks()
        } else {
            None
        };
        let transcription = if capabilities.transcribe {
            self.flow.transcription_hooks()
        } else {
            None
        };
        if audio.is_none() && transcription.is_none() {
            return;
        }

        let call_id = state.call_id;
        let (track, handle) =
            CallTrack::new(state, audio, transcription, capabilities.conversational);
        self.tracks.write().await.insert(call_id, handle);
        tokio::spawn(track.run());
    }

    async fn close_track(&self, call_id: i64) {
        if let Some(handle) = self.tracks.write().await.remove(&call_id) {
            handle.cancel.cancel();
        }
    }

    async fn track(&self, call_id: i64) -> Result<TrackHandle, SessionError> {
        self.tracks
            .read()
            .await
            .get(&call_id)
            .cloned()
            .ok_or(SessionError::TrackClosed(call_id))
    }

    /// Deliver a chunk of raw caller audio to the call's track
    pub async fn push_audio(&self, call_id: i64, chunk: AudioChunk) -> Result<(), SessionError> {
        if !self.flow.capabilities().stream {
            return Err(SessionError::Unsupported("stream"));
        }
        let handle = self.track(call_id).await?;
        if !handle.audio {
            return Err(SessionError::Unsupported("stream"));
        }
        handle
            .event_tx
            .send(TrackEvent::Audio(chunk))
            .await
            .map_err(|_| SessionError::TrackClosed(call_id))
    }

    /// Deliver a transcription to the call's track and wait for the flow's
    /// reply, if it has one to speak
    pub async fn push_transcription(
        &self,
        call_id: i64,
        chunk: TranscriptionChunk,
    ) -> Result<Option<WebhookResponse>, SessionError> {
        if !self.flow.capabilities().transcribe {
            return Err(SessionError::Unsupported("transcribe"));
        }
        let handle = self.track(call_id).await?;
        if !handle.transcription {
            return Err(SessionError::Unsupported("transcribe"));
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        handle
            .event_tx
            .send(TrackEvent::Transcription { chunk, reply_tx })
            .await
            .map_err(|_| SessionError::TrackClosed(call_id))?;

        reply_rx.await.map_err(|_| SessionError::TrackClosed(call_id))
    }
}
