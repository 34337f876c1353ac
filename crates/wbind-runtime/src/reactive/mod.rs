#![forbid(unsafe_code)]

//! Reactive primitives used to observe presentation toggles.
//!
//! - [`Observable`]: shared, version-tracked value with change notification.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`ListenerScope`]: owns every subscription of one binding and releases
//!   them together on destroy.
//! - [`PresentationSignal`]: the caller-facing expanded/collapsed toggle.
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Subscribers are stored as `Weak` callbacks and pruned lazily during
//! notification, so a dropped [`Subscription`] can never fire again.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op.
//! 4. After a [`ListenerScope`] is cleared or dropped, none of its callbacks
//!    fire.

pub mod observable;
pub mod scope;
pub mod signal;

pub use observable::{Observable, Subscription};
pub use scope::ListenerScope;
pub use signal::PresentationSignal;
