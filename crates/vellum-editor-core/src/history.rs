//! Host-native undo/redo for the reference surface.
//!
//! The engine itself has no versioning concept (a non-goal); undo and redo
//! are capabilities of the host surface. For the reference surface they are
//! provided by `Snapshots<T>`, a bounded snapshot history over the surface
//! state. Snapshots are cheap because both the rope and the media registry
//! are cheap to clone.

/// Undo/redo capability.
pub trait EditHistory {
    fn can_undo(&self) -> bool;
    fn can_redo(&self) -> bool;
    /// Drop all recorded history (external reset discards it).
    fn clear(&mut self);
}

/// Bounded snapshot history.
///
/// `record` is called with the state as it was *before* a mutation; `undo`
/// swaps the current state for the most recent snapshot, `redo` walks back
/// forward. A new mutation after undo discards the redo trail.
#[derive(Clone)]
pub struct Snapshots<T: Clone> {
    past: Vec<T>,
    future: Vec<T>,
    max_depth: usize,
}

impl<T: Clone> Snapshots<T> {
    pub fn new(max_depth: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_depth,
        }
    }

    /// Record the pre-mutation state.
    pub fn record(&mut self, state: T) {
        self.future.clear();
        self.past.push(state);
        if self.past.len() > self.max_depth {
            self.past.remove(0);
        }
    }

    /// Swap `current` for the most recent snapshot. Returns false when there
    /// is nothing to undo.
    pub fn undo(&mut self, current: &mut T) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        self.future.push(std::mem::replace(current, previous));
        true
    }

    /// Swap `current` forward again. Returns false when there is nothing to
    /// redo.
    pub fn redo(&mut self, current: &mut T) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        self.past.push(std::mem::replace(current, next));
        true
    }
}

impl<T: Clone> EditHistory for Snapshots<T> {
    fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}
