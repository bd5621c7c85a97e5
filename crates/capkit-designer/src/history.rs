//! Snapshot-based undo/redo.
//!
//! Every recorded entry is a full copy of the state before a mutation. The
//! undo stack is bounded; the oldest entry is dropped once it overflows.

/// Default number of undo steps kept.
pub const DEFAULT_HISTORY_DEPTH: usize = 30;

/// Undo/redo stacks of whole-state snapshots.
#[derive(Debug, Clone)]
pub struct History<T: Clone> {
    undo_stack: Vec<T>,
    redo_stack: Vec<T>,
    max_depth: usize,
}

impl<T: Clone> History<T> {
    /// Create a history with the default depth.
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_HISTORY_DEPTH)
    }

    /// Create with custom maximum undo depth (at least 1).
    pub fn with_depth(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Record the state as it was before a mutation.
    ///
    /// A new record invalidates everything that could be redone.
    pub fn record(&mut self, before: T) {
        self.redo_stack.clear();
        self.undo_stack.push(before);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Step back; `current` becomes redoable and the previous state is returned.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward; `current` becomes undoable and the next state is returned.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}
