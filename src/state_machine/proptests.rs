//! Property-based tests for the confirmation menu
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::directory::CustomerContext;
use crate::webhook::CallState;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context(customer: Option<CustomerContext>) -> CallContext {
    CallContext::new(
        CallState::new(1, "+15550001111", "+15552223333"),
        "My Company",
        customer,
    )
}

/// Feed inputs through the menu the way a call would, stopping at the first
/// rejected input. Returns the context and the inputs that were accepted.
fn run_call(inputs: &[String]) -> (CallContext, Vec<String>) {
    let mut ctx = test_context(Some(CustomerContext::new("Abhinav", "1234", "Phone")));
    let started = transition(ctx.menu, &ctx, Event::CallStarted).unwrap();
    ctx.commit(started);

    let mut accepted = Vec::new();
    for input in inputs {
        match transition(ctx.menu, &ctx, Event::input(input.clone())) {
            Ok(result) => {
                ctx.commit(result);
                accepted.push(input.clone());
            }
            Err(TransitionError::CallEnded(_)) => break,
            Err(e) => panic!("unexpected transition error: {e}"),
        }
    }
    (ctx, accepted)
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_customer() -> impl Strategy<Value = Option<CustomerContext>> {
    proptest::option::of(
        ("[A-Z][a-z]{2,10}", "[0-9]{1,6}", "[A-Za-z ]{1,20}")
            .prop_map(|(name, id, order)| CustomerContext::new(name, id, order)),
    )
}

/// Keypad-ish input, weighted towards the menu's own options
fn arb_option() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => Just("1".to_string()),
        1 => Just("9".to_string()),
        2 => "[0-9*#]{1,3}",
        1 => ".{0,4}",
    ]
}

fn arb_unlisted_option() -> impl Strategy<Value = String> {
    ".{0,6}".prop_filter("menu options", |s| s != "1" && s != "9")
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Every input outside the menu's options resolves to the declined branch
    #[test]
    fn prop_unlisted_input_declines(option in arb_unlisted_option(), customer in arb_customer()) {
        let ctx = test_context(customer);
        let result = transition(MenuState::Greeting, &ctx, Event::input(option.clone())).unwrap();

        prop_assert_eq!(result.new_state, MenuState::Declined);
        prop_assert_eq!(result.response.num_characters, 0);
        prop_assert_eq!(result.effects, vec![Effect::AuditOrder { option }]);
    }

    /// Repeating the menu never changes the prompt or the input length
    #[test]
    fn prop_repeat_is_idempotent(repeats in 1usize..20, customer in arb_customer()) {
        let mut ctx = test_context(customer);
        let first = ctx.commit(transition(ctx.menu, &ctx, Event::CallStarted).unwrap());

        for _ in 0..repeats {
            let again = ctx.commit(transition(ctx.menu, &ctx, Event::input("1")).unwrap());
            prop_assert_eq!(&again, &first);
            prop_assert_eq!(again.num_characters, 1);
            prop_assert_eq!(ctx.menu, MenuState::Greeting);
        }
    }

    /// Confirmed after the call iff an accepted input was "9"
    #[test]
    fn prop_confirmed_iff_nine(inputs in proptest::collection::vec(arb_option(), 0..12)) {
        let (ctx, accepted) = run_call(&inputs);
        prop_assert_eq!(ctx.confirmed(), accepted.iter().any(|i| i == "9"));
    }

    /// Every non-repeat input ends the call
    #[test]
    fn prop_non_repeat_input_is_terminal(inputs in proptest::collection::vec(arb_option(), 1..12)) {
        let (ctx, accepted) = run_call(&inputs);
        match accepted.iter().position(|i| i != "1") {
            Some(pos) => {
                prop_assert!(ctx.menu.is_terminal());
                prop_assert_eq!(pos, accepted.len() - 1);
            }
            None => {
                prop_assert_eq!(ctx.menu, MenuState::Greeting);
            }
        }
    }

    /// A terminal response always asks for zero characters
    #[test]
    fn prop_terminal_responses_collect_nothing(option in arb_option()) {
        let ctx = test_context(None);
        let result = transition(MenuState::Greeting, &ctx, Event::input(option)).unwrap();
        prop_assert_eq!(result.new_state.is_terminal(), result.response.ends_call());
    }
}
