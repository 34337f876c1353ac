#![forbid(unsafe_code)]

//! Caller-facing presentation toggle.

use wbind_core::PresentationState;

use super::observable::{Observable, Subscription};

/// The expanded/collapsed toggle a caller reads and sets.
///
/// Bindings subscribe to it via
/// [`StableBinding::watch`](crate::StableBinding::watch); only value changes
/// reach them.
#[derive(Clone, Debug)]
pub struct PresentationSignal {
    state: Observable<PresentationState>,
}

impl PresentationSignal {
    /// Create a signal with an initial state.
    #[must_use]
    pub fn new(initial: PresentationState) -> Self {
        Self {
            state: Observable::new(initial),
        }
    }

    /// Current state.
    #[must_use]
    pub fn get(&self) -> PresentationState {
        self.state.get()
    }

    /// Whether the toggle is expanded.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.state.with(|s| s.is_expanded())
    }

    /// Set the state. Returns `true` if it changed.
    pub fn set(&self, state: PresentationState) -> bool {
        self.state.set(state)
    }

    /// Set the expanded flag. Returns `true` if it changed.
    pub fn set_expanded(&self, expanded: bool) -> bool {
        self.state.set(PresentationState::new(expanded))
    }

    /// Flip the expanded flag.
    pub fn toggle(&self) {
        self.state.update(|s| *s = s.toggle());
    }

    /// Number of value changes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.version()
    }

    /// Observe changes.
    pub fn subscribe(&self, callback: impl Fn(&PresentationState) + 'static) -> Subscription {
        self.state.subscribe(callback)
    }
}

impl Default for PresentationSignal {
    fn default() -> Self {
        Self::new(PresentationState::default())
    }
}
