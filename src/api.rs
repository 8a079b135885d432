//! HTTP API for the webhook service

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::flow::ConfirmationFlow;
use crate::runtime::{OutcomeStore, SessionManager};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager<ConfirmationFlow>>,
}

impl AppState {
    pub fn new(flow: ConfirmationFlow, store: Arc<dyn OutcomeStore>) -> Self {
        Self {
            sessions: Arc::new(SessionManager::new(flow, store)),
        }
    }
}
