#![forbid(unsafe_code)]

//! Error taxonomy for widget bindings.
//!
//! # Failure Modes
//!
//! | Variant | Cause | Handling |
//! |---------|-------|----------|
//! | `InvalidInput` | Empty/absent identity | Rejected at construction |
//! | `WidgetNotReady` | Update before mount | Dropped with a log |
//! | `DualSurface` | Two surfaces for one identity in a pass | Returned to caller |
//! | `StaleHandle` | Deferred callback or update after destroy | No-op |
//! | `ForbiddenRecreate` | Forced destroy-and-rebuild requested | Returned to caller |
//! | `DuplicateIdentity` | Same identity twice in one collection | Returned to caller |
//! | `UnknownIdentity` | Registry lookup of an absent identity | Returned to caller |
//! | `Policy` | Malformed policy source | Returned to caller |
//!
//! Lifecycle races (`WidgetNotReady`, `StaleHandle`) are absorbed where they
//! occur and never abort a render pass. Everything else is a caller-contract
//! violation and surfaces immediately.

use core::fmt;

use crate::identity::BindingId;
use crate::presentation::Surface;

/// Result alias for binding operations.
pub type BindResult<T> = Result<T, BindError>;

/// Errors from binding operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The identity was empty or otherwise unusable.
    InvalidInput { reason: String },
    /// A presentation update arrived before the widget handle was resolved.
    WidgetNotReady { id: BindingId },
    /// One identity was described in two surfaces during the same pass.
    DualSurface {
        id: BindingId,
        first: Surface,
        second: Surface,
    },
    /// A callback or update outlived the handle it was meant for. `token` is
    /// 0 when the binding was destroyed before any widget resolved.
    StaleHandle { id: BindingId, token: u64 },
    /// Someone asked to destroy and rebuild a live widget.
    ForbiddenRecreate { id: BindingId },
    /// The caller's collection contained the same identity twice.
    DuplicateIdentity { id: BindingId },
    /// No binding is registered under this identity.
    UnknownIdentity { id: BindingId },
    /// A policy source could not be read or parsed.
    Policy(String),
}

impl BindError {
    /// Whether this is a lifecycle race that is absorbed locally.
    ///
    /// Recoverable errors are logged and dropped; the rest are
    /// caller-contract violations.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::WidgetNotReady { .. } | Self::StaleHandle { .. })
    }

    /// The identity involved, when there is one.
    #[must_use]
    pub fn identity(&self) -> Option<&BindingId> {
        match self {
            Self::WidgetNotReady { id }
            | Self::DualSurface { id, .. }
            | Self::StaleHandle { id, .. }
            | Self::ForbiddenRecreate { id }
            | Self::DuplicateIdentity { id }
            | Self::UnknownIdentity { id } => Some(id),
            Self::InvalidInput { .. } | Self::Policy(_) => None,
        }
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { reason } => write!(f, "invalid input: {reason}"),
            Self::WidgetNotReady { id } => {
                write!(f, "widget for '{id}' is not mounted yet; update dropped")
            }
            Self::DualSurface { id, first, second } => write!(
                f,
                "'{id}' described in two surfaces at once ({first} and {second})"
            ),
            Self::StaleHandle { id, token } => {
                write!(f, "handle {token} for '{id}' was released before callback ran")
            }
            Self::ForbiddenRecreate { id } => write!(
                f,
                "forced recreation of '{id}' is forbidden; replace the identity instead"
            ),
            Self::DuplicateIdentity { id } => {
                write!(f, "identity '{id}' appears more than once in one pass")
            }
            Self::UnknownIdentity { id } => write!(f, "no binding registered for '{id}'"),
            Self::Policy(msg) => write!(f, "policy error: {msg}"),
        }
    }
}

impl std::error::Error for BindError {}
