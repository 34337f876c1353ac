#![forbid(unsafe_code)]

//! Presentation state and the imperative update it produces.
//!
//! [`PresentationState`] is the closed trigger set: the only state allowed to
//! cause an imperative push to a live widget. It is compared by value, so the
//! trigger check is O(1) regardless of how large the bound data is.
//!
//! A state maps to exactly one [`Surface`]: collapsed widgets live inline in
//! the message flow, expanded widgets live in an overlay dialog.

use core::fmt;

use bitflags::bitflags;

/// Where a widget is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Surface {
    /// Inline region inside the host's normal flow.
    #[default]
    Inline,
    /// Overlay/dialog region above the host's normal flow.
    Overlay,
}

impl Surface {
    /// Stable lowercase name, used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Overlay => "overlay",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Small, explicit, externally observable presentation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PresentationState {
    expanded: bool,
}

impl PresentationState {
    /// Collapsed (inline) state.
    pub const COLLAPSED: Self = Self { expanded: false };
    /// Expanded (overlay) state.
    pub const EXPANDED: Self = Self { expanded: true };

    /// Build a state from the expanded flag.
    #[inline]
    #[must_use]
    pub const fn new(expanded: bool) -> Self {
        Self { expanded }
    }

    /// Whether the widget is expanded.
    #[inline]
    #[must_use]
    pub const fn is_expanded(self) -> bool {
        self.expanded
    }

    /// Transition to the expanded state.
    #[must_use]
    pub const fn expand(self) -> Self {
        Self { expanded: true }
    }

    /// Transition to the collapsed state.
    #[must_use]
    pub const fn collapse(self) -> Self {
        Self { expanded: false }
    }

    /// Flip the expanded flag.
    #[must_use]
    pub const fn toggle(self) -> Self {
        Self {
            expanded: !self.expanded,
        }
    }

    /// The single surface this state is displayed in.
    #[must_use]
    pub const fn surface(self) -> Surface {
        if self.expanded {
            Surface::Overlay
        } else {
            Surface::Inline
        }
    }
}

impl From<bool> for PresentationState {
    fn from(expanded: bool) -> Self {
        Self::new(expanded)
    }
}

/// How the widget sizes itself inside its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutMode {
    /// Fixed pixel height pushed by the binding.
    #[default]
    Fixed,
    /// Fill the parent region (dialog body).
    FillParent,
}

bitflags! {
    /// Which parameters of a [`PresentationUpdate`] changed since the last push.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PushFields: u8 {
        const HEIGHT  = 0b0000_0001;
        const LAYOUT  = 0b0000_0010;
        const SURFACE = 0b0000_0100;
    }
}

/// Parameters pushed imperatively to a live widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationUpdate {
    /// Surface the widget now lives in.
    pub surface: Surface,
    /// Height in pixels.
    pub height: u32,
    /// Layout behavior.
    pub layout: LayoutMode,
    /// Parameters that differ from the previous push.
    pub fields: PushFields,
}

impl PresentationUpdate {
    /// A full update with every field marked changed.
    #[must_use]
    pub fn full(surface: Surface, height: u32, layout: LayoutMode) -> Self {
        Self {
            surface,
            height,
            layout,
            fields: PushFields::all(),
        }
    }

    /// Recompute `fields` relative to the previously pushed update.
    #[must_use]
    pub fn relative_to(mut self, prev: Option<&Self>) -> Self {
        self.fields = match prev {
            None => PushFields::all(),
            Some(prev) => {
                let mut fields = PushFields::empty();
                fields.set(PushFields::HEIGHT, prev.height != self.height);
                fields.set(PushFields::LAYOUT, prev.layout != self.layout);
                fields.set(PushFields::SURFACE, prev.surface != self.surface);
                fields
            }
        };
        self
    }

    /// Whether this update moves the widget to another surface.
    #[inline]
    #[must_use]
    pub fn is_transition(&self) -> bool {
        self.fields.contains(PushFields::SURFACE)
    }
}
