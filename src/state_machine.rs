//! Order confirmation menu state machine
//!
//! Pure transitions in the Elm style: `transition` maps the current menu
//! state and an event to the next state, the response to play, and the
//! effects the call context must apply before that response leaves.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{CallContext, MenuState};
pub use transition::{transition, TransitionError, TransitionResult};
