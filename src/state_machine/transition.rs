//! Pure state transition function
//!
//! | State    | Input      | Next      | Collect |
//! |----------|------------|-----------|---------|
//! | Greeting | (started)  | Greeting  | 1       |
//! | Greeting | "1"        | Greeting  | 1       |
//! | Greeting | "9"        | Confirmed | 0       |
//! | Greeting | other      | Declined  | 0       |

use super::{CallContext, Effect, Event, MenuState};
use crate::prompts;
use crate::webhook::WebhookResponse;
use thiserror::Error;

/// Characters collected at the menu
pub const OPTION_LENGTH: u32 = 1;
pub const REPEAT_OPTION: &str = "1";
pub const CONFIRM_OPTION: &str = "9";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: MenuState,
    pub response: WebhookResponse,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: MenuState, response: WebhookResponse) -> Self {
        Self {
            new_state: state,
            response,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Call already ended in {} state", .0.as_str())]
    CallEnded(MenuState),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same state, context and event it always yields the same result
/// and performs no I/O. From `Greeting` every input string lands on a defined
/// branch.
pub fn transition(
    state: MenuState,
    ctx: &CallContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        (MenuState::Greeting, Event::CallStarted) => {
            Ok(TransitionResult::new(MenuState::Greeting, greeting(ctx)))
        }

        (MenuState::Greeting, Event::Input { option }) if option == REPEAT_OPTION => {
            Ok(TransitionResult::new(MenuState::Greeting, greeting(ctx)))
        }

        (MenuState::Greeting, Event::Input { option }) if option == CONFIRM_OPTION => Ok(
            TransitionResult::new(
                MenuState::Confirmed,
                WebhookResponse::hangup(prompts::confirmed()),
            )
            .with_effect(Effect::RecordConfirmation),
        ),

        // Fallback branch: anything else declines the order
        (MenuState::Greeting, Event::Input { option }) => Ok(TransitionResult::new(
            MenuState::Declined,
            WebhookResponse::hangup(prompts::declined()),
        )
        .with_effect(Effect::AuditOrder { option })),

        (state @ (MenuState::Confirmed | MenuState::Declined), Event::Input { .. }) => {
            Err(TransitionError::CallEnded(state))
        }

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {state:?} with event {event:?}"
        ))),
    }
}

fn greeting(ctx: &CallContext) -> WebhookResponse {
    WebhookResponse::collect(
        prompts::greeting(&ctx.brand_name, ctx.customer.as_ref()),
        OPTION_LENGTH,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::CustomerContext;
    use crate::prompts::DEFAULT_BRAND_NAME;
    use crate::webhook::CallState;

    fn test_context() -> CallContext {
        CallContext::new(
            CallState::new(42, "+15550001111", "+15552223333"),
            DEFAULT_BRAND_NAME,
            Some(CustomerContext::new("Abhinav", "1234", "Jaxl Business Phone")),
        )
    }

    #[test]
    fn test_call_started_plays_greeting() {
        let result = transition(MenuState::Greeting, &test_context(), Event::CallStarted).unwrap();

        assert_eq!(result.new_state, MenuState::Greeting);
        assert_eq!(result.response.num_characters, 1);
        assert!(result.response.prompt[0].starts_with("Hello Abhinav"));
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_repeat_returns_greeting() {
        let ctx = test_context();
        let started = transition(MenuState::Greeting, &ctx, Event::CallStarted).unwrap();
        let repeated = transition(MenuState::Greeting, &ctx, Event::input("1")).unwrap();

        assert_eq!(repeated.new_state, MenuState::Greeting);
        assert_eq!(repeated.response, started.response);
    }

    #[test]
    fn test_confirm_records_confirmation() {
        let result = transition(MenuState::Greeting, &test_context(), Event::input("9")).unwrap();

        assert_eq!(result.new_state, MenuState::Confirmed);
        assert_eq!(
            result.response.prompt,
            vec!["Thank you for your confirmation.", "Bye."]
        );
        assert_eq!(result.response.num_characters, 0);
        assert_eq!(result.effects, vec![Effect::RecordConfirmation]);
    }

    #[test]
    fn test_other_input_declines() {
        let result = transition(MenuState::Greeting, &test_context(), Event::input("5")).unwrap();

        assert_eq!(result.new_state, MenuState::Declined);
        assert_eq!(result.response.prompt.len(), 4);
        assert_eq!(result.response.num_characters, 0);
        assert_eq!(
            result.effects,
            vec![Effect::AuditOrder {
                option: "5".to_string()
            }]
        );
    }

    #[test]
    fn test_multi_character_input_is_not_a_match() {
        let result = transition(MenuState::Greeting, &test_context(), Event::input("91")).unwrap();
        assert_eq!(result.new_state, MenuState::Declined);
    }

    #[test]
    fn test_input_after_terminal_state_rejected() {
        let ctx = test_context();
        for state in [MenuState::Confirmed, MenuState::Declined] {
            let result = transition(state, &ctx, Event::input("9"));
            assert_eq!(result.unwrap_err(), TransitionError::CallEnded(state));
        }
    }

    #[test]
    fn test_restart_after_terminal_state_invalid() {
        let result = transition(MenuState::Confirmed, &test_context(), Event::CallStarted);
        assert!(matches!(result, Err(TransitionError::InvalidTransition(_))));
    }

    #[test]
    fn test_commit_applies_effects_before_response() {
        let mut ctx = test_context();
        let result = transition(ctx.menu, &ctx, Event::input("9")).unwrap();
        let response = ctx.commit(result);

        assert!(ctx.confirmed());
        assert_eq!(ctx.menu, MenuState::Confirmed);
        assert!(response.ends_call());
    }
}
