#![forbid(unsafe_code)]

//! Recording host and widget.
//!
//! Every element registration, widget creation, push, auto-size, and
//! release is appended to a shared [`OpLog`] with a sequence number. Tests
//! assert on counts per identity; failing runs can dump the log as JSONL.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use serde::Serialize;
use wbind_core::{
    BindingId, ElementKey, GridConfig, LayoutMode, PresentationUpdate, PushFields,
};
use wbind_runtime::{ImperativeWidget, WidgetHost};

/// One recorded operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Op {
    pub seq: u64,
    pub id: String,
    #[serde(flatten)]
    pub kind: OpKind,
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OpKind {
    Register {
        element: u64,
    },
    Unregister {
        element: u64,
    },
    Create {
        element: u64,
        surface: &'static str,
        height: u32,
        columns: usize,
    },
    Push {
        surface: &'static str,
        height: u32,
        layout: &'static str,
        fields: Vec<&'static str>,
    },
    AutoSize,
    Release,
}

fn layout_name(layout: LayoutMode) -> &'static str {
    match layout {
        LayoutMode::Fixed => "fixed",
        LayoutMode::FillParent => "fill_parent",
    }
}

fn field_names(fields: PushFields) -> Vec<&'static str> {
    fields
        .iter_names()
        .map(|(name, _)| match name {
            "HEIGHT" => "height",
            "LAYOUT" => "layout",
            "SURFACE" => "surface",
            _ => "unknown",
        })
        .collect()
}

/// Shared, append-only operation log.
#[derive(Debug, Clone, Default)]
pub struct OpLog {
    ops: Rc<RefCell<Vec<Op>>>,
}

impl OpLog {
    /// Empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, id: &BindingId, kind: OpKind) {
        let mut ops = self.ops.borrow_mut();
        let seq = ops.len() as u64;
        ops.push(Op {
            seq,
            id: id.as_str().to_owned(),
            kind,
        });
    }

    /// Snapshot of all operations.
    #[must_use]
    pub fn ops(&self) -> Vec<Op> {
        self.ops.borrow().clone()
    }

    /// Operations for one identity.
    #[must_use]
    pub fn ops_for(&self, id: &str) -> Vec<Op> {
        self.ops
            .borrow()
            .iter()
            .filter(|op| op.id == id)
            .cloned()
            .collect()
    }

    /// Count operations for `id` matching `pred`.
    pub fn count(&self, id: &str, pred: impl Fn(&OpKind) -> bool) -> usize {
        self.ops
            .borrow()
            .iter()
            .filter(|op| op.id == id && pred(&op.kind))
            .count()
    }

    /// Widgets created for `id`.
    #[must_use]
    pub fn creations(&self, id: &str) -> usize {
        self.count(id, |k| matches!(k, OpKind::Create { .. }))
    }

    /// Imperative pushes to `id`'s widget.
    #[must_use]
    pub fn pushes(&self, id: &str) -> usize {
        self.count(id, |k| matches!(k, OpKind::Push { .. }))
    }

    /// Auto-sizes run on `id`'s widget.
    #[must_use]
    pub fn auto_sizes(&self, id: &str) -> usize {
        self.count(id, |k| matches!(k, OpKind::AutoSize))
    }

    /// Releases of `id`'s widget.
    #[must_use]
    pub fn releases(&self, id: &str) -> usize {
        self.count(id, |k| matches!(k, OpKind::Release))
    }

    /// Total operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.borrow().len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.borrow().is_empty()
    }

    /// One JSON object per line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for op in self.ops.borrow().iter() {
            out.push_str(&serde_json::to_string(op)?);
            out.push('\n');
        }
        Ok(out)
    }
}

struct RecordingWidget {
    id: BindingId,
    log: OpLog,
}

impl ImperativeWidget for RecordingWidget {
    fn push(&mut self, update: &PresentationUpdate) {
        self.log.record(
            &self.id,
            OpKind::Push {
                surface: update.surface.as_str(),
                height: update.height,
                layout: layout_name(update.layout),
                fields: field_names(update.fields),
            },
        );
    }

    fn auto_size(&mut self) {
        self.log.record(&self.id, OpKind::AutoSize);
    }

    fn release(&mut self) {
        self.log.record(&self.id, OpKind::Release);
    }
}

/// When registered elements become committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitMode {
    /// Committed as soon as they are registered.
    #[default]
    Immediate,
    /// Committed only via [`RecordingHost::commit`] / [`RecordingHost::commit_all`].
    Manual,
}

/// Host fake that records everything it is asked to do.
#[derive(Debug, Default)]
pub struct RecordingHost {
    mode: CommitMode,
    next_key: u64,
    elements: BTreeMap<ElementKey, BindingId>,
    committed: BTreeSet<ElementKey>,
    log: OpLog,
}

impl RecordingHost {
    /// Create a host with the given commit behavior.
    #[must_use]
    pub fn new(mode: CommitMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Shared handle to the log.
    #[must_use]
    pub fn log(&self) -> OpLog {
        self.log.clone()
    }

    /// Commit one element. Returns `false` if it is not registered.
    pub fn commit(&mut self, element: ElementKey) -> bool {
        if !self.elements.contains_key(&element) {
            return false;
        }
        self.committed.insert(element);
        true
    }

    /// Commit every registered element.
    pub fn commit_all(&mut self) {
        self.committed.extend(self.elements.keys().copied());
    }

    /// Registered elements.
    #[must_use]
    pub fn live_elements(&self) -> usize {
        self.elements.len()
    }

    /// Element registered for `id`, if any.
    #[must_use]
    pub fn element_for(&self, id: &str) -> Option<ElementKey> {
        self.elements
            .iter()
            .find(|(_, bound)| bound.as_str() == id)
            .map(|(key, _)| *key)
    }
}

impl WidgetHost for RecordingHost {
    fn register_element(&mut self, id: &BindingId) -> ElementKey {
        self.next_key += 1;
        let key = ElementKey::new(self.next_key);
        self.elements.insert(key, id.clone());
        if self.mode == CommitMode::Immediate {
            self.committed.insert(key);
        }
        self.log.record(id, OpKind::Register { element: key.raw() });
        key
    }

    fn resolve_widget(
        &mut self,
        element: ElementKey,
        config: &GridConfig,
        initial: &PresentationUpdate,
    ) -> Option<Box<dyn ImperativeWidget>> {
        if !self.committed.contains(&element) {
            return None;
        }
        let id = self.elements.get(&element)?.clone();
        self.log.record(
            &id,
            OpKind::Create {
                element: element.raw(),
                surface: initial.surface.as_str(),
                height: initial.height,
                columns: config.columns().len(),
            },
        );
        tracing::debug!(id = %id, element = element.raw(), "recording widget created");
        Some(Box::new(RecordingWidget {
            id,
            log: self.log.clone(),
        }))
    }

    fn unregister_element(&mut self, element: ElementKey) {
        self.committed.remove(&element);
        if let Some(id) = self.elements.remove(&element) {
            self.log.record(&id, OpKind::Unregister { element: element.raw() });
        }
    }
}
