//! Order confirmation call flow
//!
//! Binds the confirmation menu state machine to the webhook contract: setup
//! resolves the customer and plays the greeting, options drive the menu,
//! teardown reports whether the order was confirmed.

mod listeners;

pub use listeners::{AudioMeter, TranscriptEcho};

use crate::config::AppConfig;
use crate::directory::{CustomerContext, CustomerDirectory};
use crate::prompts::DEFAULT_BRAND_NAME;
use crate::state_machine::{transition, CallContext, Event, TransitionError};
use crate::webhook::{
    AudioStreamHooks, CallFlow, CallOutcome, CallState, Capabilities, ConfigRef, FlowError,
    TranscriptionHooks, WebhookResponse,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Which side of the call is the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallDirection {
    /// We placed the call; the customer is the callee
    #[default]
    Outgoing,
    /// The customer called us
    Incoming,
}

impl CallDirection {
    pub fn customer_number(self, state: &CallState) -> &str {
        match self {
            CallDirection::Outgoing => &state.to_number,
            CallDirection::Incoming => &state.from_number,
        }
    }
}

pub struct ConfirmationFlow {
    directory: Arc<dyn CustomerDirectory>,
    brand_name: String,
    schema: ConfigRef,
    direction: CallDirection,
    capabilities: Capabilities,
}

impl ConfirmationFlow {
    pub fn new(directory: Arc<dyn CustomerDirectory>) -> Self {
        Self {
            directory,
            brand_name: DEFAULT_BRAND_NAME.to_string(),
            schema: ConfigRef::Path {
                path: PathBuf::from(crate::config::DEFAULT_SCHEMA_PATH),
            },
            direction: CallDirection::default(),
            capabilities: Capabilities::default(),
        }
    }

    pub fn from_config(config: &AppConfig, directory: Arc<dyn CustomerDirectory>) -> Self {
        Self::new(directory)
            .with_brand_name(config.brand_name.clone())
            .with_schema(ConfigRef::Path {
                path: config.schema_path.clone(),
            })
            .with_direction(config.direction)
            .with_capabilities(config.capabilities)
    }

    #[must_use]
    pub fn with_brand_name(mut self, brand_name: impl Into<String>) -> Self {
        self.brand_name = brand_name.into();
        self
    }

    #[must_use]
    pub fn with_schema(mut self, schema: ConfigRef) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: CallDirection) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Directory misses and failures fall back to a generic greeting
    fn resolve_customer(&self, state: &CallState) -> Option<CustomerContext> {
        let number = self.direction.customer_number(state);
        match self.directory.lookup(number) {
            Ok(Some(customer)) => Some(customer),
            Ok(None) => {
                tracing::warn!(
                    call_id = state.call_id,
                    number = %number,
                    "Customer not found, using generic greeting"
                );
                None
            }
            Err(e) => {
                tracing::error!(
                    call_id = state.call_id,
                    number = %number,
                    error = %e,
                    "Customer lookup failed, using generic greeting"
                );
                None
            }
        }
    }
}

impl CallFlow for ConfirmationFlow {
    type Context = CallContext;

    fn config(&self) -> ConfigRef {
        self.schema.clone()
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn setup(&self, state: &CallState) -> Result<(CallContext, WebhookResponse), FlowError> {
        let customer = self.resolve_customer(state);
        let mut ctx = CallContext::new(state.clone(), self.brand_name.as_str(), customer);
        let result = transition(ctx.menu, &ctx, Event::CallStarted)?;
        let response = ctx.commit(result);
        Ok((ctx, response))
    }

    fn handle_option(
        &self,
        ctx: &mut CallContext,
        option: &str,
    ) -> Result<WebhookResponse, FlowError> {
        let result = transition(ctx.menu, ctx, Event::input(option))?;
        let response = ctx.commit(result);
        tracing::info!(
            call_id = ctx.call.call_id,
            option = %option,
            state = ctx.menu.as_str(),
            "Menu option handled"
        );
        Ok(response)
    }

    fn teardown(&self, ctx: CallContext, state: &CallState) -> Option<CallOutcome> {
        tracing::info!(
            call_id = state.call_id,
            state = ctx.menu.as_str(),
            confirmed = ctx.confirmed(),
            "Confirmation call finished"
        );
        Some(CallOutcome {
            state: state.clone(),
            confirmed: ctx.confirmed(),
        })
    }

    fn audio_hooks(&self) -> Option<Box<dyn AudioStreamHooks>> {
        self.capabilities
            .stream
            .then(|| Box::new(AudioMeter::default()) as Box<dyn AudioStreamHooks>)
    }

    fn transcription_hooks(&self) -> Option<Box<dyn TranscriptionHooks>> {
        self.capabilities.transcribe.then(|| {
            Box::new(TranscriptEcho::new(self.capabilities.conversational))
                as Box<dyn TranscriptionHooks>
        })
    }
}

impl From<TransitionError> for FlowError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::CallEnded(_) => FlowError::CallEnded,
            TransitionError::InvalidTransition(msg) => FlowError::Internal(msg),
        }
    }
}
