//! Minimal in-crate host fake for unit tests.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use wbind_core::{BindingId, ElementKey, GridConfig, PresentationUpdate, Surface};

use crate::host::{ImperativeWidget, WidgetHost};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WidgetEvent {
    Push(Surface, u32),
    AutoSize,
    Release,
}

struct FakeWidget {
    log: Rc<RefCell<Vec<WidgetEvent>>>,
}

impl ImperativeWidget for FakeWidget {
    fn push(&mut self, update: &PresentationUpdate) {
        self.log
            .borrow_mut()
            .push(WidgetEvent::Push(update.surface, update.height));
    }

    fn auto_size(&mut self) {
        self.log.borrow_mut().push(WidgetEvent::AutoSize);
    }

    fn release(&mut self) {
        self.log.borrow_mut().push(WidgetEvent::Release);
    }
}

#[derive(Default)]
pub(crate) struct FakeHost {
    next_key: u64,
    live: BTreeSet<ElementKey>,
    committed: BTreeSet<ElementKey>,
    created: Vec<Surface>,
    log: Rc<RefCell<Vec<WidgetEvent>>>,
}

impl FakeHost {
    pub(crate) fn commit_all(&mut self) {
        self.committed = self.live.clone();
    }

    pub(crate) fn registered(&self) -> usize {
        self.live.len()
    }

    pub(crate) fn created(&self) -> usize {
        self.created.len()
    }

    pub(crate) fn created_surfaces(&self) -> Vec<Surface> {
        self.created.clone()
    }

    pub(crate) fn pushes(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|e| matches!(e, WidgetEvent::Push(..)))
            .count()
    }

    pub(crate) fn events(&self) -> Vec<WidgetEvent> {
        self.log.borrow().clone()
    }
}

impl WidgetHost for FakeHost {
    fn register_element(&mut self, _id: &BindingId) -> ElementKey {
        self.next_key += 1;
        let key = ElementKey::new(self.next_key);
        self.live.insert(key);
        key
    }

    fn resolve_widget(
        &mut self,
        element: ElementKey,
        _config: &GridConfig,
        initial: &PresentationUpdate,
    ) -> Option<Box<dyn ImperativeWidget>> {
        if !self.committed.contains(&element) {
            return None;
        }
        self.created.push(initial.surface);
        Some(Box::new(FakeWidget {
            log: Rc::clone(&self.log),
        }))
    }

    fn unregister_element(&mut self, element: ElementKey) {
        self.live.remove(&element);
        self.committed.remove(&element);
    }
}
