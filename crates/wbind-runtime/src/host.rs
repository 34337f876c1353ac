#![forbid(unsafe_code)]

//! Seams between a binding, its hosting framework, and the real widget.
//!
//! The binding never constructs widgets itself. It registers one element per
//! identity with the [`WidgetHost`] and asks the host to resolve the live
//! widget once that element has been committed to a surface.

use std::sync::atomic::{AtomicU64, Ordering};

use wbind_core::{BindingId, ElementKey, GridConfig, PresentationUpdate};

/// Imperatively-mutated visual control (e.g. a data grid).
///
/// The widget's internal view state (column widths, scroll offset, sort) is
/// owned by the widget and survives exactly as long as the handle does. The
/// binding never mirrors or restores it.
pub trait ImperativeWidget {
    /// Push size/layout parameters.
    fn push(&mut self, update: &PresentationUpdate);

    /// Fit columns to the current surface. Runs after layout settles.
    fn auto_size(&mut self);

    /// Release listeners and resources. Called once, on destroy.
    fn release(&mut self) {}
}

/// The hosting framework as seen by a binding.
pub trait WidgetHost {
    /// Register the single element for `id` in the render tree.
    fn register_element(&mut self, id: &BindingId) -> ElementKey;

    /// Resolve the live widget for a committed element.
    ///
    /// Returns `None` while the element is not yet committed. `initial` is
    /// the presentation the widget is created with.
    fn resolve_widget(
        &mut self,
        element: ElementKey,
        config: &GridConfig,
        initial: &PresentationUpdate,
    ) -> Option<Box<dyn ImperativeWidget>>;

    /// Remove the element from the render tree.
    fn unregister_element(&mut self, element: ElementKey);
}

/// Global counter for handle tokens.
static HANDLE_TOKEN_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Process-unique token identifying one resolved widget handle.
///
/// Deferred callbacks carry the token they were scheduled for and compare it
/// against the binding's live handle before acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleToken(u64);

impl HandleToken {
    pub(crate) fn next() -> Self {
        Self(HANDLE_TOKEN_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw token value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Opaque, binding-owned handle to a live widget.
pub(crate) struct WidgetHandle {
    pub(crate) token: HandleToken,
    pub(crate) widget: Box<dyn ImperativeWidget>,
}

impl WidgetHandle {
    pub(crate) fn new(widget: Box<dyn ImperativeWidget>) -> Self {
        Self {
            token: HandleToken::next(),
            widget,
        }
    }
}

impl std::fmt::Debug for WidgetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetHandle")
            .field("token", &self.token.0)
            .finish_non_exhaustive()
    }
}
