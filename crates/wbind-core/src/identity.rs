#![forbid(unsafe_code)]

//! Binding identities and host element keys.
//!
//! A [`BindingId`] is the caller-assigned key that scopes one widget
//! instance's lifetime (for example a chat message id). It is the only
//! recreation trigger and the de-duplication key across simultaneous
//! bindings, so it is validated once at construction and never regenerated.
//!
//! # Invariants
//!
//! 1. A `BindingId` is never empty and never whitespace-only.
//! 2. The key is stored verbatim; no trimming or normalization happens, so
//!    `"m1"` and `" m1"` are distinct identities.
//! 3. Equality and hashing use the key string only.

use core::fmt;

use crate::error::BindError;

/// Caller-supplied stable identity for one binding.
///
/// ```
/// # use wbind_core::BindingId;
/// let id = BindingId::new("msg-42").unwrap();
/// assert_eq!(id.as_str(), "msg-42");
/// assert!(BindingId::new("").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(String);

impl BindingId {
    /// Validate and wrap a caller key.
    ///
    /// Returns [`BindError::InvalidInput`] for an empty or whitespace-only key.
    pub fn new(key: impl Into<String>) -> Result<Self, BindError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(BindError::InvalidInput {
                reason: if key.is_empty() {
                    "binding identity is empty".to_owned()
                } else {
                    "binding identity is whitespace-only".to_owned()
                },
            });
        }
        Ok(Self(key))
    }

    /// The raw key.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for BindingId {
    type Error = BindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for BindingId {
    type Error = BindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for BindingId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Opaque key of an element registered with the hosting framework.
///
/// Minted by the host; the binding only stores and hands it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey(u64);

impl ElementKey {
    /// Wrap a host-assigned raw key.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw key value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_key() {
        let id = BindingId::new("m1").unwrap();
        assert_eq!(id.as_str(), "m1");
        assert_eq!(id.to_string(), "m1");
    }

    #[test]
    fn rejects_empty_key() {
        let err = BindingId::new("").unwrap_err();
        assert!(matches!(err, BindError::InvalidInput { .. }));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn rejects_whitespace_key() {
        let err = BindingId::new("  \t").unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn key_is_not_normalized() {
        let a = BindingId::new("m1").unwrap();
        let b = BindingId::new(" m1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn try_from_variants() {
        let a: BindingId = "x".try_into().unwrap();
        let b: BindingId = String::from("x").try_into().unwrap();
        assert_eq!(a, b);
        assert!(BindingId::try_from("").is_err());
    }

    #[test]
    fn element_key_round_trips_raw() {
        assert_eq!(ElementKey::new(7).raw(), 7);
    }
}
