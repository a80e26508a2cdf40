use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};

use crate::event::{EditorEvent, EventHandler};

/// Writes every event to the log.
#[derive(Debug, Default)]
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn handle_event(&mut self, event: &EditorEvent) {
        match event {
            EditorEvent::LayerInvalidated { .. } => debug!("{event:?}"),
            _ => info!("{event:?}"),
        }
    }
}

/// Collects events into a shared list. Handy for hosts that poll instead of
/// reacting inline, and for tests.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<EditorEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.borrow().clone()
    }

    pub fn take(&self) -> Vec<EditorEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl EventHandler for EventLog {
    fn handle_event(&mut self, event: &EditorEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
