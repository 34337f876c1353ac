#![forbid(unsafe_code)]

//! Binding lifecycle runtime for WidgetBind.
//!
//! - [`StableBinding`]: one identity, one memoized configuration, at most
//!   one live widget.
//! - [`BindingRegistry`]: identity-keyed bindings reconciled against the
//!   caller's collection each render pass.
//! - [`SurfaceComposer`]: one surface per identity per pass.
//! - [`SettleQueue`]: settle-delayed auto-size after surface transitions.
//! - [`reactive`]: observable toggles and listener scopes.
//!
//! Everything here is single-threaded and driven by host lifecycle events;
//! nothing blocks and nothing spawns.

pub mod binding;
pub mod deferred;
pub mod host;
pub mod reactive;
pub mod registry;
pub mod surface;

#[cfg(test)]
mod test_support;

pub use binding::{
    BindingPhase, BindingStats, MountOutcome, StableBinding, TickOutcome, UpdateOutcome,
};
pub use deferred::{DueAutoSize, SettleQueue};
pub use host::{HandleToken, ImperativeWidget, WidgetHost};
pub use reactive::{ListenerScope, Observable, PresentationSignal, Subscription};
pub use registry::{BindingRegistry, ReconcileReport};
pub use surface::{BASE_OVERLAY_Z, SurfaceComposer, SurfaceDescriptor};
