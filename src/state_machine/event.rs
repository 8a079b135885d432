//! Events that drive the confirmation menu

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Call set up; play the opening menu
    CallStarted,
    /// Caller supplied input characters
    Input { option: String },
}

impl Event {
    pub fn input(option: impl Into<String>) -> Self {
        Event::Input {
            option: option.into(),
        }
    }
}
