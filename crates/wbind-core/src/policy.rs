#![forbid(unsafe_code)]

//! Tunable binding policy.
//!
//! The settle delay before auto-sizing after a surface transition is not a
//! correctness value; hosts with slower layout settling raise it.
//!
//! # Sources
//!
//! - Builder methods on [`BindingPolicy`].
//! - `WBIND_SETTLE_DELAY_MS` via [`BindingPolicy::with_env_overrides`].
//! - TOML or JSON policy files with the `policy-config` feature:
//!
//! ```toml
//! settle_delay_ms = 150
//! auto_size_on_transition = true
//! log_dropped_updates = false
//! ```
//!
//! Absent keys keep their defaults. Unknown keys are rejected.

use web_time::Duration;

use crate::error::BindError;

/// Environment variable overriding the settle delay in milliseconds.
pub const ENV_SETTLE_DELAY_MS: &str = "WBIND_SETTLE_DELAY_MS";

/// Default settle delay before auto-sizing after a transition.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Timing and logging policy shared by a set of bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingPolicy {
    /// Delay between a surface transition and the deferred auto-size.
    pub settle_delay: Duration,
    /// Whether surface transitions schedule an auto-size at all.
    pub auto_size_on_transition: bool,
    /// Whether dropped (not-ready) updates log at `warn` (otherwise `debug`).
    pub log_dropped_updates: bool,
}

impl Default for BindingPolicy {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            auto_size_on_transition: true,
            log_dropped_updates: true,
        }
    }
}

impl BindingPolicy {
    /// Default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the settle delay.
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Enable or disable the deferred auto-size.
    #[must_use]
    pub fn with_auto_size(mut self, enabled: bool) -> Self {
        self.auto_size_on_transition = enabled;
        self
    }

    /// Choose the log level for dropped updates.
    #[must_use]
    pub fn with_dropped_update_logging(mut self, warn: bool) -> Self {
        self.log_dropped_updates = warn;
        self
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, BindError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, BindError> {
        if let Some(raw) = lookup(ENV_SETTLE_DELAY_MS) {
            let ms: u64 = raw.trim().parse().map_err(|_| {
                BindError::Policy(format!(
                    "{ENV_SETTLE_DELAY_MS}={raw:?} is not a millisecond count"
                ))
            })?;
            #[cfg(feature = "tracing")]
            tracing::debug!(settle_delay_ms = ms, "settle delay overridden from environment");
            self.settle_delay = Duration::from_millis(ms);
        }
        Ok(self)
    }
}

#[cfg(feature = "policy-config")]
mod file {
    use std::path::Path;

    use serde::Deserialize;
    use web_time::Duration;

    use super::BindingPolicy;
    use crate::error::BindError;

    #[derive(Debug, Default, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct PolicyFile {
        settle_delay_ms: Option<u64>,
        auto_size_on_transition: Option<bool>,
        log_dropped_updates: Option<bool>,
    }

    impl PolicyFile {
        fn apply(self, mut policy: BindingPolicy) -> BindingPolicy {
            if let Some(ms) = self.settle_delay_ms {
                policy.settle_delay = Duration::from_millis(ms);
            }
            if let Some(v) = self.auto_size_on_transition {
                policy.auto_size_on_transition = v;
            }
            if let Some(v) = self.log_dropped_updates {
                policy.log_dropped_updates = v;
            }
            policy
        }
    }

    impl BindingPolicy {
        /// Parse a TOML policy on top of the defaults.
        pub fn from_toml_str(src: &str) -> Result<Self, BindError> {
            let file: PolicyFile =
                toml::from_str(src).map_err(|e| BindError::Policy(e.to_string()))?;
            Ok(file.apply(Self::default()))
        }

        /// Parse a JSON policy on top of the defaults.
        pub fn from_json_str(src: &str) -> Result<Self, BindError> {
            let file: PolicyFile =
                serde_json::from_str(src).map_err(|e| BindError::Policy(e.to_string()))?;
            Ok(file.apply(Self::default()))
        }

        /// Load a policy file, choosing the format by extension
        /// (`.toml` or `.json`).
        pub fn load(path: impl AsRef<Path>) -> Result<Self, BindError> {
            let path = path.as_ref();
            let src = std::fs::read_to_string(path)
                .map_err(|e| BindError::Policy(format!("{}: {e}", path.display())))?;
            match path.extension().and_then(|e| e.to_str()) {
                Some("toml") => Self::from_toml_str(&src),
                Some("json") => Self::from_json_str(&src),
                other => Err(BindError::Policy(format!(
                    "{}: unsupported policy format {other:?}",
                    path.display()
                ))),
            }
        }
    }

}
