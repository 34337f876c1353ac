#![forbid(unsafe_code)]

//! Core types for WidgetBind.
//!
//! This crate provides:
//! - [`BindingId`] for caller-owned, stable binding identities
//! - [`BindError`] for the binding error taxonomy
//! - [`PresentationState`], [`Surface`], and [`PresentationUpdate`] for the
//!   small trigger set that drives imperative widget updates
//! - [`BindingOptions`] and [`GridConfig`] for the configuration derived once
//!   per identity
//! - [`BindingPolicy`] for tunable timing and logging behavior

pub mod error;
pub mod grid;
pub mod identity;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod options;
pub mod policy;
pub mod presentation;

pub use error::{BindError, BindResult};
pub use grid::{ColumnDef, ColumnSource, ConfigSource, GridConfig, TableSnapshot};
pub use identity::{BindingId, ElementKey};
pub use options::{BindingOptions, DerivedColumn, HeightHints};
pub use policy::BindingPolicy;
pub use presentation::{LayoutMode, PresentationState, PresentationUpdate, PushFields, Surface};
