use log::{debug, info, warn};

use super::Command;
use crate::document::Document;
use crate::error::{EditorError, Result};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// The state before and after one completed gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub previous: Command,
    pub next: Command,
}

/// Undo/redo stacks of state snapshots.
#[derive(Debug)]
pub struct CommandHistory {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_entries: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn set_limit(&mut self, max_entries: usize) {
        self.max_entries = max_entries.max(1);
        self.trim();
    }

    fn trim(&mut self) {
        while self.undo_stack.len() > self.max_entries {
            self.undo_stack.remove(0);
        }
    }

    /// Records a completed gesture. Clears anything that could be redone.
    pub fn snapshot(&mut self, previous: Command, next: Command) {
        debug!("history snapshot: {}", next.name());
        self.undo_stack.push(HistoryEntry { previous, next });
        self.redo_stack.clear();
        self.trim();
    }

    pub fn undo(&mut self, doc: &mut Document) -> Result<()> {
        let Some(entry) = self.undo_stack.pop() else {
            warn!("undo requested with an empty history");
            return Err(EditorError::UndoStackEmpty);
        };
        if let Err(err) = entry.previous.apply(doc) {
            self.undo_stack.push(entry);
            return Err(err);
        }
        info!("undo {}", entry.previous.name());
        self.redo_stack.push(entry);
        Ok(())
    }

    pub fn redo(&mut self, doc: &mut Document) -> Result<()> {
        let Some(entry) = self.redo_stack.pop() else {
            warn!("redo requested with nothing undone");
            return Err(EditorError::RedoStackEmpty);
        };
        if let Err(err) = entry.next.apply(doc) {
            self.redo_stack.push(entry);
            return Err(err);
        }
        info!("redo {}", entry.next.name());
        self.undo_stack.push(entry);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
