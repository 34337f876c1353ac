#![forbid(unsafe_code)]

//! Stable binding between a re-rendering tree and one imperative widget.
//!
//! A [`StableBinding`] separates *what* to show (a [`GridConfig`] derived
//! once per identity) from *how* to show it right now (a
//! [`PresentationState`] pushed imperatively when it changes). Parent
//! re-renders never touch the binding, so the widget is created at most once
//! per identity.
//!
//! # Lifecycle
//!
//! ```text
//! Unmounted ──register──▶ PendingMount ──on_mount──▶ Mounted ─┐
//!                              │                       ▲      │ apply_presentation_update
//!                              │                       └──────┘
//!                              └───────────destroy───────────▶ Destroyed
//! ```
//!
//! `Destroyed` is the terminal unmounted state: the identity never resolves
//! a widget again. A caller that wants a fresh widget supplies a new
//! identity; the old binding is destroyed independently.
//!
//! # Invariants
//!
//! 1. The configuration is derived exactly once, in [`StableBinding::new`].
//! 2. At most one widget is resolved per binding.
//! 3. An update is pushed only when the presentation value differs from the
//!    last one presented, and exactly once per such change.
//! 4. Deferred work validates its [`HandleToken`] and is a no-op after
//!    destroy.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Empty identity | Caller bug | `create`/`new` return `InvalidInput`, nothing registered |
//! | Update before mount | Host effect ordering race | Dropped, logged, `UpdateOutcome::Dropped` |
//! | Update after destroy | Stale caller state | Dropped, `StaleHandle` |
//! | Auto-size after destroy | Pending settle callback | No-op, `TickOutcome::Stale` |
//! | Forced recreation | Caller bug | `ForbiddenRecreate` |

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, debug_span, error, warn};
use web_time::{Duration, Instant};
use wbind_core::{
    BindError, BindingId, BindingOptions, BindingPolicy, ConfigSource, ElementKey, GridConfig,
    PresentationState, PresentationUpdate, PushFields,
};

use crate::deferred::SettleQueue;
use crate::host::{HandleToken, WidgetHandle, WidgetHost};
use crate::reactive::{ListenerScope, PresentationSignal};
use crate::surface::SurfaceDescriptor;

/// Lifecycle phase of one binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingPhase {
    /// Configuration derived, no element registered.
    Unmounted,
    /// Element registered, waiting for the host to commit it.
    PendingMount,
    /// Widget resolved and owned by the binding.
    Mounted,
    /// Released; terminal for this identity.
    Destroyed,
}

impl BindingPhase {
    /// Stable lowercase name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unmounted => "unmounted",
            Self::PendingMount => "pending_mount",
            Self::Mounted => "mounted",
            Self::Destroyed => "destroyed",
        }
    }
}

/// Result of [`StableBinding::on_mount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    /// The widget was resolved now.
    Resolved(HandleToken),
    /// A widget was already resolved; nothing happened.
    AlreadyMounted,
    /// The host has not committed the element yet.
    NotCommitted,
    /// The binding has no registered element (never registered or destroyed).
    Unavailable,
}

/// Result of [`StableBinding::apply_presentation_update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// An update was pushed; the set names the parameters that changed.
    Applied(PushFields),
    /// Same state as currently presented; nothing pushed.
    Unchanged,
    /// The update could not be delivered and was dropped.
    Dropped(BindError),
}

/// Result of [`StableBinding::tick_at`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing queued.
    Idle,
    /// Auto-size queued; due after this long.
    Waiting(Duration),
    /// The widget was auto-sized.
    AutoSized,
    /// The callback outlived its handle and did nothing.
    Stale(BindError),
}

/// Counters for one binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindingStats {
    /// Widgets resolved (0 or 1).
    pub widget_creations: u32,
    /// Imperative updates pushed.
    pub updates_applied: u32,
    /// Updates skipped because the state was already presented.
    pub updates_unchanged: u32,
    /// Updates dropped because no live handle existed.
    pub updates_dropped: u32,
    /// Deferred auto-sizes that ran.
    pub auto_sizes: u32,
    /// Deferred callbacks that found a released handle.
    pub stale_callbacks: u32,
}

/// Memoized, identity-scoped binding to one imperative widget.
pub struct StableBinding {
    id: BindingId,
    config: Rc<GridConfig>,
    policy: BindingPolicy,
    phase: BindingPhase,
    element: Option<ElementKey>,
    widget: Option<WidgetHandle>,
    released: Option<HandleToken>,
    presented: PresentationState,
    last_push: Option<PresentationUpdate>,
    settle: SettleQueue,
    listeners: ListenerScope,
    queued: Rc<Cell<Option<PresentationState>>>,
    stats: BindingStats,
}

impl StableBinding {
    /// Validate the identity and derive the configuration, without touching
    /// the host. The binding starts [`BindingPhase::Unmounted`].
    pub fn new<D: ConfigSource + ?Sized>(
        id: &str,
        data: &D,
        options: &BindingOptions,
        policy: BindingPolicy,
    ) -> Result<Self, BindError> {
        let id = BindingId::new(id).inspect_err(|err| {
            error!(error = %err, "rejected binding construction");
        })?;
        let config = Rc::new(data.derive_config(options));
        debug!(
            id = %id,
            columns = config.columns().len(),
            rows = config.row_count(),
            "derived binding configuration"
        );
        Ok(Self {
            id,
            config,
            settle: SettleQueue::new(policy.settle_delay),
            policy,
            phase: BindingPhase::Unmounted,
            element: None,
            widget: None,
            released: None,
            presented: PresentationState::default(),
            last_push: None,
            listeners: ListenerScope::new(),
            queued: Rc::new(Cell::new(None)),
            stats: BindingStats::default(),
        })
    }

    /// Construct and register in one step.
    ///
    /// On an invalid identity nothing is registered with `host`.
    pub fn create<D: ConfigSource + ?Sized, H: WidgetHost + ?Sized>(
        id: &str,
        data: &D,
        options: &BindingOptions,
        policy: BindingPolicy,
        host: &mut H,
    ) -> Result<Self, BindError> {
        let mut binding = Self::new(id, data, options, policy)?;
        binding.register(host);
        Ok(binding)
    }

    /// Start in `state` instead of collapsed. Only meaningful before mount.
    #[must_use]
    pub fn with_initial_state(mut self, state: PresentationState) -> Self {
        if self.widget.is_none() && self.phase != BindingPhase::Destroyed {
            self.presented = state;
        }
        self
    }

    /// Register the binding's single element with the host.
    ///
    /// Returns `false` (and does nothing) unless the binding is `Unmounted`.
    pub fn register<H: WidgetHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.phase != BindingPhase::Unmounted {
            return false;
        }
        let element = host.register_element(&self.id);
        self.element = Some(element);
        self.phase = BindingPhase::PendingMount;
        debug!(id = %self.id, element = element.raw(), "element registered");
        true
    }

    /// Resolve and cache the widget once the host committed the element.
    ///
    /// Idempotent: framework churn may call this repeatedly.
    pub fn on_mount<H: WidgetHost + ?Sized>(&mut self, host: &mut H) -> MountOutcome {
        let _span = debug_span!("binding_mount", id = %self.id).entered();
        match self.phase {
            BindingPhase::Mounted => return MountOutcome::AlreadyMounted,
            BindingPhase::Unmounted | BindingPhase::Destroyed => return MountOutcome::Unavailable,
            BindingPhase::PendingMount => {}
        }
        let Some(element) = self.element else {
            return MountOutcome::Unavailable;
        };
        let initial = self.config.update_for(self.presented);
        let Some(widget) = host.resolve_widget(element, &self.config, &initial) else {
            debug!("element not committed yet");
            return MountOutcome::NotCommitted;
        };
        let handle = WidgetHandle::new(widget);
        let token = handle.token;
        self.widget = Some(handle);
        self.last_push = Some(initial);
        self.phase = BindingPhase::Mounted;
        self.stats.widget_creations += 1;
        debug!(token = token.raw(), surface = %initial.surface, "widget resolved");
        MountOutcome::Resolved(token)
    }

    /// Push `state` to the widget if it differs from what is presented.
    ///
    /// Never fails: without a live handle every update is dropped with a
    /// log, and the state is not recorded as presented so a later re-fire
    /// applies it. Drops before mount report `WidgetNotReady`; drops after
    /// destroy report `StaleHandle`.
    pub fn apply_presentation_update(
        &mut self,
        state: PresentationState,
        now: Instant,
    ) -> UpdateOutcome {
        let Some(handle) = self.widget.as_mut() else {
            let err = self.drop_reason();
            self.stats.updates_dropped += 1;
            if self.policy.log_dropped_updates {
                warn!(
                    id = %self.id,
                    phase = self.phase.as_str(),
                    error = %err,
                    "presentation update dropped"
                );
            } else {
                debug!(
                    id = %self.id,
                    phase = self.phase.as_str(),
                    error = %err,
                    "presentation update dropped"
                );
            }
            return UpdateOutcome::Dropped(err);
        };
        if state == self.presented {
            self.stats.updates_unchanged += 1;
            return UpdateOutcome::Unchanged;
        }

        let update = self
            .config
            .update_for(state)
            .relative_to(self.last_push.as_ref());
        handle.widget.push(&update);
        let token = handle.token;
        self.presented = state;
        self.last_push = Some(update);
        self.stats.updates_applied += 1;
        debug!(
            id = %self.id,
            surface = %update.surface,
            height = update.height,
            fields = ?update.fields,
            "presentation update applied"
        );

        if update.is_transition() && self.policy.auto_size_on_transition {
            self.settle.schedule_at(token, now);
            debug!(
                id = %self.id,
                delay_ms = self.settle.delay().as_millis() as u64,
                "auto-size scheduled"
            );
        }
        UpdateOutcome::Applied(update.fields)
    }

    /// Describe where the widget lives for `state`: exactly one surface.
    #[must_use]
    pub fn render_surface(&self, state: PresentationState) -> SurfaceDescriptor {
        let update = self.config.update_for(state);
        SurfaceDescriptor {
            id: self.id.clone(),
            element: self.element,
            surface: update.surface,
            height: update.height,
            z_index: 0,
        }
    }

    /// Release the widget, the element, and every listener.
    ///
    /// Returns `false` if the binding was already destroyed. A pending
    /// auto-size stays queued and turns into a no-op when it comes due.
    pub fn destroy<H: WidgetHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.phase == BindingPhase::Destroyed {
            return false;
        }
        let _span = debug_span!("binding_destroy", id = %self.id).entered();
        if let Some(mut handle) = self.widget.take() {
            handle.widget.release();
            self.released = Some(handle.token);
        }
        if let Some(element) = self.element.take() {
            host.unregister_element(element);
        }
        self.listeners.clear();
        self.queued.set(None);
        self.phase = BindingPhase::Destroyed;
        debug!("binding destroyed");
        true
    }

    /// The forbidden destroy-and-rebuild primitive. Always refused.
    ///
    /// Forced recreation would discard the widget's internal view state and
    /// flicker; replace the identity instead.
    pub fn force_recreate(&self) -> Result<(), BindError> {
        error!(id = %self.id, "forced recreation requested");
        Err(BindError::ForbiddenRecreate {
            id: self.id.clone(),
        })
    }

    /// Follow a caller-owned toggle, replacing any toggle watched before.
    ///
    /// Changes are recorded and applied in [`flush_effects`](Self::flush_effects).
    /// If the signal already differs from the presented state, that value is
    /// queued immediately.
    pub fn watch(&mut self, signal: &PresentationSignal) {
        if self.phase == BindingPhase::Destroyed {
            return;
        }
        self.listeners.clear();
        let queued = Rc::clone(&self.queued);
        self.listeners
            .hold(signal.subscribe(move |state| queued.set(Some(*state))));
        let current = signal.get();
        if current != self.presented {
            self.queued.set(Some(current));
        }
    }

    /// Post-render effect phase: apply the latest queued toggle value.
    ///
    /// A value dropped because the widget is not mounted yet stays queued
    /// (unless a newer one arrived) and is applied by the first flush after
    /// mount.
    pub fn flush_effects(&mut self, now: Instant) -> Option<UpdateOutcome> {
        let state = self.queued.take()?;
        let outcome = self.apply_presentation_update(state, now);
        if matches!(outcome, UpdateOutcome::Dropped(BindError::WidgetNotReady { .. })) {
            let newer = self.queued.take();
            self.queued.set(Some(newer.unwrap_or(state)));
        }
        Some(outcome)
    }

    fn drop_reason(&self) -> BindError {
        if self.phase == BindingPhase::Destroyed {
            BindError::StaleHandle {
                id: self.id.clone(),
                token: self.released.map_or(0, HandleToken::raw),
            }
        } else {
            BindError::WidgetNotReady {
                id: self.id.clone(),
            }
        }
    }

    /// Run the deferred auto-size if it is due.
    pub fn tick_at(&mut self, now: Instant) -> TickOutcome {
        let Some(due) = self.settle.tick_at(now) else {
            return match self.settle.time_until_due(now) {
                Some(wait) => TickOutcome::Waiting(wait),
                None => TickOutcome::Idle,
            };
        };
        match self.widget.as_mut() {
            Some(handle) if handle.token == due.token => {
                handle.widget.auto_size();
                self.stats.auto_sizes += 1;
                debug!(
                    id = %self.id,
                    elapsed_ms = due.elapsed.as_millis() as u64,
                    "auto-size applied"
                );
                TickOutcome::AutoSized
            }
            _ => {
                self.stats.stale_callbacks += 1;
                let err = BindError::StaleHandle {
                    id: self.id.clone(),
                    token: due.token.raw(),
                };
                debug!(id = %self.id, error = %err, "deferred auto-size skipped");
                TickOutcome::Stale(err)
            }
        }
    }

    /// The caller-assigned identity.
    #[must_use]
    pub fn identity(&self) -> &BindingId {
        &self.id
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> BindingPhase {
        self.phase
    }

    /// The memoized configuration.
    #[must_use]
    pub fn config(&self) -> &Rc<GridConfig> {
        &self.config
    }

    /// The state currently presented by the widget (or to be presented on
    /// mount).
    #[must_use]
    pub fn presented(&self) -> PresentationState {
        self.presented
    }

    /// Token of the live handle, if mounted.
    #[must_use]
    pub fn handle_token(&self) -> Option<HandleToken> {
        self.widget.as_ref().map(|h| h.token)
    }

    /// Registered host element, if any.
    #[must_use]
    pub fn element(&self) -> Option<ElementKey> {
        self.element
    }

    /// Whether a deferred auto-size is queued.
    #[must_use]
    pub fn has_pending_auto_size(&self) -> bool {
        self.settle.is_pending()
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Lifecycle counters.
    #[must_use]
    pub fn stats(&self) -> BindingStats {
        self.stats
    }
}

impl std::fmt::Debug for StableBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StableBinding")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("element", &self.element)
            .field("widget", &self.widget)
            .field("presented", &self.presented)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
