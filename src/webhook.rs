//! Webhook lifecycle contract
//!
//! The fixed protocol every call flow honours: `config` once at registration,
//! then per call `setup`, zero or more `handle_option`, and finally
//! `teardown`. Raw audio and transcription hooks are separate, opt-in
//! capabilities served on their own per-call track.

mod contract;
mod error;
mod types;

pub use contract::{
    AudioChunk, AudioStreamHooks, CallFlow, Capabilities, TranscriptionChunk, TranscriptionHooks,
};
pub use error::{FlowError, RequestError};
pub use types::*;
