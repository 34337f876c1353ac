#![forbid(unsafe_code)]

//! Version-tracked observable value.
//!
//! # Failure Modes
//!
//! - **Re-entrant set**: calling `set()` from inside a subscriber callback
//!   panics (RefCell borrow rules). Binding callbacks only record the new
//!   value and apply it later in the effect phase, so they never re-enter.
//! - **Subscriber leak**: dead weak references linger until the next
//!   notification or subscription prunes them.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;
type WeakCallback<T> = Weak<dyn Fn(&T)>;

struct Shared<T> {
    value: T,
    version: u64,
    subscribers: Vec<WeakCallback<T>>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning an `Observable` yields another handle to the same state.
pub struct Observable<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("Observable")
            .field("value", &shared.value)
            .field("version", &shared.version)
            .field("subscriber_count", &shared.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create an observable at version 0 with no subscribers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.shared.borrow().value.clone()
    }

    /// Borrow the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.borrow().value)
    }

    /// Replace the value. Returns `true` if it changed (and subscribers ran).
    pub fn set(&self, value: T) -> bool {
        {
            let mut shared = self.shared.borrow_mut();
            if shared.value == value {
                return false;
            }
            shared.value = value;
            shared.version += 1;
        }
        self.notify();
        true
    }

    /// Mutate in place. Returns `true` if the value changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let changed = {
            let mut shared = self.shared.borrow_mut();
            let before = shared.value.clone();
            f(&mut shared.value);
            let changed = shared.value != before;
            if changed {
                shared.version += 1;
            }
            changed
        };
        if changed {
            self.notify();
        }
        changed
    }

    /// Register a change callback. Dropping the returned guard unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Callback<T> = Rc::new(callback);
        let mut shared = self.shared.borrow_mut();
        shared.subscribers.retain(|w| w.strong_count() > 0);
        shared.subscribers.push(Rc::downgrade(&strong));
        drop(shared);
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of value-changing mutations so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.borrow().version
    }

    /// Registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.borrow().subscribers.len()
    }

    fn notify(&self) {
        let (callbacks, value): (Vec<Callback<T>>, T) = {
            let mut shared = self.shared.borrow_mut();
            shared.subscribers.retain(|w| w.strong_count() > 0);
            let live = shared.subscribers.iter().filter_map(Weak::upgrade).collect();
            (live, shared.value.clone())
        };
        for cb in &callbacks {
            cb(&value);
        }
    }
}

/// RAII guard for a subscriber callback.
///
/// Holds the only strong reference to the callback; once dropped, the weak
/// entry in the observable can no longer be upgraded.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
