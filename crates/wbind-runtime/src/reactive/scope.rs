#![forbid(unsafe_code)]

//! Listener ownership for one binding.
//!
//! A [`ListenerScope`] collects every [`Subscription`] a binding creates.
//! Destroying the binding clears the scope, which disconnects all of its
//! reactive listeners at once.
//!
//! # Invariants
//!
//! 1. Subscriptions are released in reverse registration order.
//! 2. After `clear()` or drop, no callback held by the scope fires.
//! 3. A cleared scope is reusable.

use super::observable::{Observable, Subscription};

/// Owns the subscriptions of one logical listener set.
#[derive(Default)]
pub struct ListenerScope {
    subscriptions: Vec<Subscription>,
}

impl ListenerScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `sub` alive until the scope is cleared or dropped.
    pub fn hold(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    /// Subscribe to `source` and hold the guard.
    pub fn subscribe<T: Clone + PartialEq + 'static>(
        &mut self,
        source: &Observable<T>,
        callback: impl Fn(&T) + 'static,
    ) -> &mut Self {
        let sub = source.subscribe(callback);
        self.subscriptions.push(sub);
        self
    }

    /// Number of held subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release everything now.
    pub fn clear(&mut self) {
        while self.subscriptions.pop().is_some() {}
    }
}

impl Drop for ListenerScope {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for ListenerScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerScope")
            .field("listeners", &self.subscriptions.len())
            .finish()
    }
}
