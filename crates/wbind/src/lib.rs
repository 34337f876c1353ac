#![forbid(unsafe_code)]

//! WidgetBind public facade.
//!
//! Binds a long-lived imperative widget to a declarative render loop. The
//! widget is created once per caller-assigned identity and afterwards only
//! receives explicit presentation changes; unrelated re-renders never touch
//! it.
//!
//! ```
//! use wbind::prelude::*;
//!
//! struct Grid;
//! impl ImperativeWidget for Grid {
//!     fn push(&mut self, _update: &PresentationUpdate) {}
//!     fn auto_size(&mut self) {}
//! }
//!
//! struct Host(u64);
//! impl WidgetHost for Host {
//!     fn register_element(&mut self, _id: &BindingId) -> ElementKey {
//!         self.0 += 1;
//!         ElementKey::new(self.0)
//!     }
//!     fn resolve_widget(
//!         &mut self,
//!         _element: ElementKey,
//!         _config: &GridConfig,
//!         _initial: &PresentationUpdate,
//!     ) -> Option<Box<dyn ImperativeWidget>> {
//!         Some(Box::new(Grid))
//!     }
//!     fn unregister_element(&mut self, _element: ElementKey) {}
//! }
//!
//! let mut host = Host(0);
//! let table = TableSnapshot::new(["symbol", "price"], 3);
//! let mut binding = StableBinding::create(
//!     "quotes",
//!     &table,
//!     &BindingOptions::new(),
//!     BindingPolicy::default(),
//!     &mut host,
//! )?;
//! binding.on_mount(&mut host);
//!
//! let now = web_time::Instant::now();
//! assert!(matches!(
//!     binding.apply_presentation_update(PresentationState::EXPANDED, now),
//!     UpdateOutcome::Applied(_)
//! ));
//! assert_eq!(
//!     binding.apply_presentation_update(PresentationState::EXPANDED, now),
//!     UpdateOutcome::Unchanged
//! );
//! # Ok::<(), BindError>(())
//! ```

pub use wbind_core as core;
#[cfg(feature = "runtime")]
pub use wbind_runtime as runtime;

pub use wbind_core::{
    BindError, BindResult, BindingId, BindingOptions, BindingPolicy, ConfigSource, DerivedColumn,
    ElementKey, GridConfig, HeightHints, LayoutMode, PresentationState, PresentationUpdate,
    PushFields, Surface, TableSnapshot,
};

#[cfg(feature = "runtime")]
pub use wbind_runtime::{
    BindingPhase, BindingRegistry, ImperativeWidget, MountOutcome, PresentationSignal,
    ReconcileReport, StableBinding, SurfaceComposer, SurfaceDescriptor, TickOutcome,
    UpdateOutcome, WidgetHost,
};

/// Everything needed to declare and drive bindings.
pub mod prelude {
    pub use wbind_core::{
        BindError, BindingId, BindingOptions, BindingPolicy, ConfigSource, DerivedColumn,
        ElementKey, GridConfig, HeightHints, PresentationState, PresentationUpdate, Surface,
        TableSnapshot,
    };

    #[cfg(feature = "runtime")]
    pub use wbind_runtime::{
        BindingRegistry, ImperativeWidget, MountOutcome, PresentationSignal, StableBinding,
        TickOutcome, UpdateOutcome, WidgetHost,
    };
}
