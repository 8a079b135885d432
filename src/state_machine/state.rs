//! Menu state and per-call context

use super::effect::Effect;
use super::transition::TransitionResult;
use crate::directory::CustomerContext;
use crate::webhook::{CallState, WebhookResponse};
use serde::{Deserialize, Serialize};

/// Position in the confirmation menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MenuState {
    /// Opening menu, replayed on "1"
    #[default]
    Greeting,
    /// Caller confirmed the order
    Confirmed,
    /// Caller pressed anything else
    Declined,
}

impl MenuState {
    /// Terminal states end the call; no further input is accepted
    pub fn is_terminal(self) -> bool {
        matches!(self, MenuState::Confirmed | MenuState::Declined)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MenuState::Greeting => "greeting",
            MenuState::Confirmed => "confirmed",
            MenuState::Declined => "declined",
        }
    }
}

/// Everything the menu remembers about one call.
///
/// Created by setup and owned by the call's session until teardown consumes
/// it. The confirmation flag is private: only committing a transition that
/// carries [`Effect::RecordConfirmation`] can set it.
#[derive(Debug, Clone)]
pub struct CallContext {
    pub call: CallState,
    pub brand_name: String,
    /// `None` when the directory could not resolve the customer
    pub customer: Option<CustomerContext>,
    pub menu: MenuState,
    confirmed: bool,
}

impl CallContext {
    pub fn new(
        call: CallState,
        brand_name: impl Into<String>,
        customer: Option<CustomerContext>,
    ) -> Self {
        Self {
            call,
            brand_name: brand_name.into(),
            customer,
            menu: MenuState::Greeting,
            confirmed: false,
        }
    }

    pub fn confirmed(&self) -> bool {
        self.confirmed
    }

    /// Apply a transition and hand back the response to play. Effects land
    /// before the response is returned, so a teardown that follows a
    /// zero-character response always sees them.
    pub fn commit(&mut self, result: TransitionResult) -> WebhookResponse {
        self.menu = result.new_state;
        for effect in result.effects {
            match effect {
                Effect::RecordConfirmation => self.confirmed = true,
                Effect::AuditOrder { option } => {
                    tracing::warn!(
                        call_id = self.call.call_id,
                        from_number = %self.call.from_number,
                        to_number = %self.call.to_number,
                        option = %option,
                        "Order flagged for audit"
                    );
                }
            }
        }
        result.response
    }
}
