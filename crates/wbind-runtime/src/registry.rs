#![forbid(unsafe_code)]

//! Many bindings keyed by identity.
//!
//! The registry is what a parent component holds: each render pass it
//! reconciles the caller's collection (e.g. the message list) against the
//! live bindings.
//!
//! # Invariants
//!
//! - Identity is the only key. Surviving identities are never re-derived or
//!   recreated, whatever their data looks like in the new pass.
//! - Validation happens before mutation: an invalid or duplicated identity
//!   fails the whole pass and leaves every binding untouched.
//! - Bindings share no mutable state; destroying one never affects another.
//! - Iteration follows the order of the most recent collection.
//!
//! # Failure Modes
//!
//! - Unknown identity in `set_presentation()` / `destroy()`: `UnknownIdentity`.
//! - Duplicate identity in `reconcile()`: `DuplicateIdentity`.
//! - Dual placement in `compose()`: `DualSurface` (only reachable through a
//!   host that injects its own descriptors into the same composer).

use ahash::{AHashMap, AHashSet};
use tracing::{debug, debug_span};
use web_time::Instant;
use wbind_core::{
    BindError, BindingId, BindingOptions, BindingPolicy, ConfigSource, PresentationState,
};

use crate::binding::{MountOutcome, StableBinding, TickOutcome, UpdateOutcome};
use crate::host::WidgetHost;
use crate::reactive::PresentationSignal;
use crate::surface::{SurfaceComposer, SurfaceDescriptor};

/// What one reconcile pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Identities created this pass.
    pub created: Vec<BindingId>,
    /// Identities destroyed this pass.
    pub destroyed: Vec<BindingId>,
    /// Identities kept as-is.
    pub retained: usize,
}

impl ReconcileReport {
    /// Whether the pass changed nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.destroyed.is_empty()
    }
}

/// Identity-keyed set of [`StableBinding`]s.
#[derive(Debug)]
pub struct BindingRegistry {
    policy: BindingPolicy,
    options: BindingOptions,
    bindings: AHashMap<BindingId, StableBinding>,
    order: Vec<BindingId>,
}

impl Default for BindingRegistry {
    fn default() -> Self {
        Self::new(BindingPolicy::default())
    }
}

impl BindingRegistry {
    /// Empty registry with default options.
    #[must_use]
    pub fn new(policy: BindingPolicy) -> Self {
        Self {
            policy,
            options: BindingOptions::default(),
            bindings: AHashMap::new(),
            order: Vec::new(),
        }
    }

    /// Options used for every binding created from now on.
    #[must_use]
    pub fn with_options(mut self, options: BindingOptions) -> Self {
        self.options = options;
        self
    }

    /// Reconcile against the caller's collection for one render pass.
    ///
    /// New identities are created and registered, missing ones destroyed,
    /// surviving ones left alone (their data in `items` is ignored).
    pub fn reconcile<'a, K, D, I, H>(
        &mut self,
        items: I,
        host: &mut H,
    ) -> Result<ReconcileReport, BindError>
    where
        K: AsRef<str> + 'a,
        D: ConfigSource + ?Sized + 'a,
        I: IntoIterator<Item = (K, &'a D)>,
        H: WidgetHost + ?Sized,
    {
        let _span = debug_span!("registry_reconcile").entered();

        let mut next: Vec<(BindingId, &'a D)> = Vec::new();
        let mut seen: AHashSet<BindingId> = AHashSet::new();
        for (key, data) in items {
            let id = BindingId::new(key.as_ref())?;
            if !seen.insert(id.clone()) {
                return Err(BindError::DuplicateIdentity { id });
            }
            next.push((id, data));
        }

        let mut report = ReconcileReport::default();
        for id in &self.order {
            if seen.contains(id) {
                continue;
            }
            if let Some(mut binding) = self.bindings.remove(id) {
                binding.destroy(host);
                report.destroyed.push(id.clone());
            }
        }

        let mut order = Vec::with_capacity(next.len());
        for (id, data) in next {
            if self.bindings.contains_key(&id) {
                report.retained += 1;
            } else {
                let binding =
                    StableBinding::create(id.as_str(), data, &self.options, self.policy, host)?;
                self.bindings.insert(id.clone(), binding);
                report.created.push(id.clone());
            }
            order.push(id);
        }
        self.order = order;

        debug!(
            created = report.created.len(),
            destroyed = report.destroyed.len(),
            retained = report.retained,
            "reconcile pass done"
        );
        Ok(report)
    }

    /// Post-commit mount phase. Returns how many widgets resolved now.
    pub fn mount_pending<H: WidgetHost + ?Sized>(&mut self, host: &mut H) -> usize {
        let mut resolved = 0;
        for id in &self.order {
            if let Some(binding) = self.bindings.get_mut(id)
                && matches!(binding.on_mount(host), MountOutcome::Resolved(_))
            {
                resolved += 1;
            }
        }
        resolved
    }

    /// Forward a presentation change to one binding.
    pub fn set_presentation(
        &mut self,
        id: &str,
        state: PresentationState,
        now: Instant,
    ) -> Result<UpdateOutcome, BindError> {
        let binding = self.lookup_mut(id)?;
        Ok(binding.apply_presentation_update(state, now))
    }

    /// Attach a caller toggle to one binding.
    pub fn watch(&mut self, id: &str, signal: &PresentationSignal) -> Result<(), BindError> {
        self.lookup_mut(id)?.watch(signal);
        Ok(())
    }

    /// Effect phase for every binding with a queued toggle change.
    pub fn flush_effects(&mut self, now: Instant) -> Vec<(BindingId, UpdateOutcome)> {
        let mut out = Vec::new();
        for id in &self.order {
            if let Some(binding) = self.bindings.get_mut(id)
                && let Some(outcome) = binding.flush_effects(now)
            {
                out.push((id.clone(), outcome));
            }
        }
        out
    }

    /// Explicitly remove one identity.
    pub fn destroy<H: WidgetHost + ?Sized>(
        &mut self,
        id: &str,
        host: &mut H,
    ) -> Result<(), BindError> {
        let key = self.lookup_mut(id)?.identity().clone();
        if let Some(mut binding) = self.bindings.remove(&key) {
            binding.destroy(host);
        }
        self.order.retain(|k| k != &key);
        Ok(())
    }

    /// Describe every binding's surface in one composition pass.
    pub fn compose(
        &self,
        state_of: impl Fn(&BindingId) -> PresentationState,
    ) -> Result<Vec<SurfaceDescriptor>, BindError> {
        let mut composer = SurfaceComposer::new();
        self.compose_into(&mut composer, state_of)?;
        Ok(composer.finish())
    }

    /// Place every binding's surface into an existing composer.
    pub fn compose_into(
        &self,
        composer: &mut SurfaceComposer,
        state_of: impl Fn(&BindingId) -> PresentationState,
    ) -> Result<(), BindError> {
        for id in &self.order {
            if let Some(binding) = self.bindings.get(id) {
                composer.place(binding.render_surface(state_of(id)))?;
            }
        }
        Ok(())
    }

    /// Run due deferred work. Idle and waiting bindings are omitted.
    pub fn tick_at(&mut self, now: Instant) -> Vec<(BindingId, TickOutcome)> {
        let mut out = Vec::new();
        for id in &self.order {
            if let Some(binding) = self.bindings.get_mut(id) {
                match binding.tick_at(now) {
                    TickOutcome::Idle | TickOutcome::Waiting(_) => {}
                    outcome => out.push((id.clone(), outcome)),
                }
            }
        }
        out
    }

    /// Binding for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&StableBinding> {
        let id = BindingId::new(id).ok()?;
        self.bindings.get(&id)
    }

    /// Identities in collection order.
    pub fn ids(&self) -> impl Iterator<Item = &BindingId> {
        self.order.iter()
    }

    /// Number of live bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no bindings are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn lookup_mut(&mut self, id: &str) -> Result<&mut StableBinding, BindError> {
        let id = BindingId::new(id)?;
        match self.bindings.get_mut(&id) {
            Some(binding) => Ok(binding),
            None => Err(BindError::UnknownIdentity { id }),
        }
    }
}
