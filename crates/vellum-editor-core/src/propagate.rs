//! Change propagation between the surface and the owning collaborator.
//!
//! The owning collaborator holds the authoritative value: local edits are
//! serialized and pushed up through a callback, and the collaborator pushes
//! values back down. Without care this loops: an emitted value comes back as
//! an assignment, rehydration mutates the surface, the mutation emits again.
//! `ChangeController` breaks the loop twice over: assignments matching the
//! last known value are echoes and skip rehydration entirely, and mutations
//! observed while an external value is being applied are not re-emitted.

use tracing::{debug, trace};

use crate::surface::EditingSurface;
use crate::types::EditMode;

pub type ChangeCallback = Box<dyn FnMut(&str)>;

/// Mediates value flow between the surface and its owner.
pub struct ChangeController {
    /// Last value the owner is known to hold, whether we emitted it or
    /// adopted it from an assignment.
    pending: Option<String>,
    mode: EditMode,
    on_change: Option<ChangeCallback>,
}

impl Default for ChangeController {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeController {
    pub fn new() -> Self {
        Self {
            pending: None,
            mode: EditMode::UserEditing,
            on_change: None,
        }
    }

    pub fn set_on_change(&mut self, callback: ChangeCallback) {
        self.on_change = Some(callback);
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Whether an incoming assignment is our own emission coming back.
    pub fn is_echo(&self, value: &str) -> bool {
        self.pending.as_deref() == Some(value)
    }

    /// Apply an externally assigned value to the surface.
    ///
    /// Echoes are skipped without touching the surface, preserving caret and
    /// selection. Otherwise the surface is rehydrated under
    /// `ExternalRehydration`, `normalize` runs while still suppressed (its
    /// mutations must not re-emit), and the surface's own serialization of
    /// the result is recorded as the new known value. Returns whether the
    /// surface changed.
    pub fn assign_value<S, F>(&mut self, surface: &mut S, value: &str, normalize: F) -> bool
    where
        S: EditingSurface,
        F: FnOnce(&mut S),
    {
        if self.is_echo(value) {
            trace!("assigned value is an echo, skipping rehydration");
            return false;
        }

        debug!(len = value.len(), "applying external value");
        self.mode = EditMode::ExternalRehydration;
        surface.rehydrate(value);
        normalize(surface);
        self.mode = EditMode::UserEditing;

        // Record without emitting: the owner already holds this value.
        self.pending = Some(surface.serialize());
        true
    }

    /// Observe a surface mutation and propagate it upward.
    ///
    /// Suppressed while an external value is being applied, and when the
    /// serialized value matches what the owner already holds.
    pub fn on_surface_mutated<S: EditingSurface>(&mut self, surface: &S) {
        if self.mode == EditMode::ExternalRehydration {
            trace!("mutation during rehydration, not emitting");
            return;
        }
        let value = surface.serialize();
        if self.pending.as_deref() == Some(value.as_str()) {
            return;
        }
        debug!(len = value.len(), "emitting changed value");
        if let Some(callback) = &mut self.on_change {
            callback(&value);
        }
        self.pending = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MarkupSurface;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn collecting_controller() -> (ChangeController, Rc<RefCell<Vec<String>>>) {
        let emitted = Rc::new(RefCell::new(Vec::new()));
        let sink = emitted.clone();
        let mut controller = ChangeController::new();
        controller.set_on_change(Box::new(move |v| sink.borrow_mut().push(v.to_string())));
        (controller, emitted)
    }

    #[test]
    fn test_mutation_emits_value() {
        let (mut controller, emitted) = collecting_controller();
        let mut surface = MarkupSurface::new();
        surface.replace_range(0..0, "hello");
        controller.on_surface_mutated(&surface);
        assert_eq!(emitted.borrow().as_slice(), ["hello"]);
    }

    #[test]
    fn test_echo_assignment_skips_rehydration() {
        let (mut controller, emitted) = collecting_controller();
        let mut surface = MarkupSurface::new();
        surface.replace_range(0..0, "hello");
        controller.on_surface_mutated(&surface);

        // The owner pushes the emitted value back down.
        let caret_before = surface.selection();
        assert!(!controller.assign_value(&mut surface, "hello", |_| {}));
        assert_eq!(surface.selection(), caret_before);
        assert_eq!(emitted.borrow().len(), 1);
    }

    #[test]
    fn test_external_assignment_rehydrates_without_emitting() {
        let (mut controller, emitted) = collecting_controller();
        let mut surface = MarkupSurface::new();
        assert!(controller.assign_value(&mut surface, "fresh text", |_| {}));
        assert_eq!(surface.serialize(), "fresh text");
        assert!(emitted.borrow().is_empty());
    }

    #[test]
    fn test_normalize_hook_runs_suppressed() {
        let (mut controller, emitted) = collecting_controller();
        let mut surface = MarkupSurface::new();
        controller.assign_value(&mut surface, "raw", |s| {
            s.replace_range(0..0, "> ");
        });
        // The hook mutated the surface, but nothing was emitted and its
        // result is the new known value.
        assert!(emitted.borrow().is_empty());
        assert!(controller.is_echo("> raw"));
    }

    #[test]
    fn test_unchanged_serialization_not_reemitted() {
        let (mut controller, emitted) = collecting_controller();
        let mut surface = MarkupSurface::new();
        surface.replace_range(0..0, "same");
        controller.on_surface_mutated(&surface);
        controller.on_surface_mutated(&surface);
        assert_eq!(emitted.borrow().len(), 1);
    }
}
