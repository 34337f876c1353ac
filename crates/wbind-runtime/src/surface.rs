#![forbid(unsafe_code)]

//! Surface descriptors and per-pass composition.
//!
//! A binding describes its widget in exactly one surface per render pass.
//! The [`SurfaceComposer`] enforces that across a whole pass: placing the
//! same identity twice is a caller bug and is reported, never resolved.
//!
//! Overlays stack in placement order. Each overlay gets a z-index above the
//! previous one, starting at [`BASE_OVERLAY_Z`]; inline descriptors sit at 0.

use ahash::AHashMap;
use wbind_core::{BindError, BindingId, ElementKey, Surface};

/// Base z-index for the overlay layer.
pub const BASE_OVERLAY_Z: u32 = 1000;

/// Z-index increment between stacked overlays.
const Z_INCREMENT: u32 = 10;

/// Where (and how tall) a widget should be displayed right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceDescriptor {
    /// Identity being described.
    pub id: BindingId,
    /// Host element backing the widget, if registered.
    pub element: Option<ElementKey>,
    /// The single surface the widget lives in.
    pub surface: Surface,
    /// Height in pixels.
    pub height: u32,
    /// Stacking order, assigned by the composer.
    pub z_index: u32,
}

/// Collects descriptors for one render pass.
#[derive(Debug, Default)]
pub struct SurfaceComposer {
    placed: Vec<SurfaceDescriptor>,
    index: AHashMap<BindingId, usize>,
    overlays: u32,
}

impl SurfaceComposer {
    /// Start an empty pass.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a descriptor.
    ///
    /// Fails with [`BindError::DualSurface`] if the identity was already
    /// placed in this pass.
    pub fn place(&mut self, mut desc: SurfaceDescriptor) -> Result<(), BindError> {
        if let Some(&idx) = self.index.get(&desc.id) {
            let first = self.placed[idx].surface;
            tracing::error!(
                id = %desc.id,
                first = %first,
                second = %desc.surface,
                "identity described in two surfaces"
            );
            return Err(BindError::DualSurface {
                id: desc.id,
                first,
                second: desc.surface,
            });
        }
        desc.z_index = match desc.surface {
            Surface::Inline => 0,
            Surface::Overlay => {
                let z = BASE_OVERLAY_Z + self.overlays * Z_INCREMENT;
                self.overlays += 1;
                z
            }
        };
        self.index.insert(desc.id.clone(), self.placed.len());
        self.placed.push(desc);
        Ok(())
    }

    /// Descriptor placed for `id`, if any.
    #[must_use]
    pub fn get(&self, id: &BindingId) -> Option<&SurfaceDescriptor> {
        self.index.get(id).map(|&idx| &self.placed[idx])
    }

    /// Number of placed descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placed.len()
    }

    /// Whether nothing was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Topmost overlay, if any.
    #[must_use]
    pub fn top_overlay(&self) -> Option<&SurfaceDescriptor> {
        self.placed
            .iter()
            .filter(|d| d.surface == Surface::Overlay)
            .max_by_key(|d| d.z_index)
    }

    /// Finish the pass, returning descriptors in placement order.
    #[must_use]
    pub fn finish(self) -> Vec<SurfaceDescriptor> {
        self.placed
    }
}
