//! Mock implementations for testing
//!
//! These mocks enable exercising sessions without real I/O.

use super::traits::*;
use crate::db::OutcomeRecord;
use crate::directory::{CustomerContext, CustomerDirectory, LookupError};
use crate::webhook::{
    AudioChunk, AudioStreamHooks, CallFlow, CallOutcome, CallState, Capabilities, ConfigRef,
    FlowError, TranscriptionChunk, TranscriptionHooks, WebhookResponse,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ============================================================================
// Outcome Stores
// ============================================================================

/// In-memory outcome store
#[derive(Default)]
pub struct InMemoryOutcomeStore {
    outcomes: Mutex<HashMap<i64, OutcomeRecord>>,
}

impl InMemoryOutcomeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcome recorded for a call, if any
    pub fn outcome(&self, call_id: i64) -> Option<OutcomeRecord> {
        self.outcomes.lock().unwrap().get(&call_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.outcomes.lock().unwrap().len()
    }
}

#[async_trait]
impl OutcomeStore for InMemoryOutcomeStore {
    async fn record(&self, outcome: &CallOutcome) -> Result<OutcomeRecord, String> {
        let record = OutcomeRecord {
            id: uuid::Uuid::new_v4().to_string(),
            call_id: outcome.state.call_id,
            from_number: outcome.state.from_number.clone(),
            to_number: outcome.state.to_number.clone(),
            confirmed: outcome.confirmed,
            recorded_at: chrono::Utc::now(),
        };
        self.outcomes
            .lock()
            .unwrap()
            .insert(record.call_id, record.clone());
        Ok(record)
    }

    async fn get(&self, call_id: i64) -> Result<Option<OutcomeRecord>, String> {
        Ok(self.outcome(call_id))
    }
}

/// Outcome store whose backend is always down
pub struct FailingOutcomeStore;

#[async_trait]
impl OutcomeStore for FailingOutcomeStore {
    async fn record(&self, _outcome: &CallOutcome) -> Result<OutcomeRecord, String> {
        Err("outcome store unavailable".to_string())
    }

    async fn get(&self, _call_id: i64) -> Result<Option<OutcomeRecord>, String> {
        Err("outcome store unavailable".to_string())
    }
}

// ============================================================================
// Directory
// ============================================================================

/// Customer directory whose backend is always down
pub struct FailingDirectory;

impl CustomerDirectory for FailingDirectory {
    fn lookup(&self, _phone_number: &str) -> Result<Option<CustomerContext>, LookupError> {
        Err(LookupError::Unavailable("connection refused".to_string()))
    }
}

// ============================================================================
// Flows
// ============================================================================

/// Flow that records every hook invocation into a shared log.
///
/// Option "0" ends the call; anything else keeps collecting. Transcriptions
/// are always answered, so screening by the track is observable.
pub struct RecordingFlow {
    log: Arc<Mutex<Vec<String>>>,
    capabilities: Capabilities,
}

impl RecordingFlow {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            capabilities,
        }
    }

    pub fn log(&self) -> Arc<Mutex<Vec<String>>> {
        self.log.clone()
    }

    fn push(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

impl CallFlow for RecordingFlow {
    type Context = Vec<String>;

    fn config(&self) -> ConfigRef {
        ConfigRef::Inline {
            schema: serde_json::json!({ "states": ["menu"] }),
        }
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn setup(&self, state: &CallState) -> Result<(Self::Context, WebhookResponse), FlowError> {
        self.push(format!("setup:{}", state.call_id));
        Ok((Vec::new(), WebhookResponse::collect(["menu"], 1)))
    }

    fn handle_option(
        &self,
        ctx: &mut Self::Context,
        option: &str,
    ) -> Result<WebhookResponse, FlowError> {
        self.push(format!("option:{option}"));
        ctx.push(option.to_string());
        if option == "0" {
            Ok(WebhookResponse::hangup(["bye"]))
        } else {
            Ok(WebhookResponse::collect(["menu"], 1))
        }
    }

    fn teardown(&self, ctx: Self::Context, state: &CallState) -> Option<CallOutcome> {
        self.push(format!("teardown:{}", ctx.join(",")));
        Some(CallOutcome {
            state: state.clone(),
            confirmed: ctx.iter().any(|o| o == "0"),
        })
    }

    fn audio_hooks(&self) -> Option<Box<dyn AudioStreamHooks>> {
        Some(Box::new(RecordingHooks {
            log: self.log.clone(),
        }))
    }

    fn transcription_hooks(&self) -> Option<Box<dyn TranscriptionHooks>> {
        Some(Box::new(RecordingHooks {
            log: self.log.clone(),
        }))
    }
}

struct RecordingHooks {
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl AudioStreamHooks for RecordingHooks {
    async fn on_init(&mut self, state: &CallState) {
        self.log
            .lock()
            .unwrap()
            .push(format!("audio_init:{}", state.call_id));
    }

    async fn handle_raw_audio(&mut self, chunk: AudioChunk) {
        self.log
            .lock()
            .unwrap()
            .push(format!("audio:{}:{}", chunk.chunk_id, chunk.audio.len()));
    }
}

#[async_trait]
impl TranscriptionHooks for RecordingHooks {
    async fn on_transcription(&mut self, chunk: TranscriptionChunk) -> Option<WebhookResponse> {
        self.log
            .lock()
            .unwrap()
            .push(format!("transcription:{}", chunk.transcription));
        Some(WebhookResponse::collect([chunk.transcription], 1))
    }
}

/// Flow whose hooks always fail
pub struct BrokenFlow;

impl CallFlow for BrokenFlow {
    type Context = ();

    fn config(&self) -> ConfigRef {
        ConfigRef::Inline {
            schema: serde_json::Value::Null,
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    fn setup(&self, _state: &CallState) -> Result<((), WebhookResponse), FlowError> {
        Err(FlowError::Internal("setup exploded".to_string()))
    }

    fn handle_option(&self, _ctx: &mut (), _option: &str) -> Result<WebhookResponse, FlowError> {
        Err(FlowError::Internal("option exploded".to_string()))
    }

    fn teardown(&self, _ctx: (), _state: &CallState) -> Option<CallOutcome> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryOutcomeStore::new();
        let outcome = CallOutcome {
            state: CallState::new(3, "+1", "+2"),
            confirmed: true,
        };

        let record = store.record(&outcome).await.unwrap();
        assert_eq!(record.call_id, 3);
        assert_eq!(store.get(3).await.unwrap(), Some(record));
        assert_eq!(store.get(4).await.unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_failing_store() {
        let outcome = CallOutcome {
            state: CallState::new(3, "+1", "+2"),
            confirmed: false,
        };
        assert!(FailingOutcomeStore.record(&outcome).await.is_err());
        assert!(FailingOutcomeStore.get(3).await.is_err());
    }
}
