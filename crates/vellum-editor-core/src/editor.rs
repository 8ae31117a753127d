//! The editor facade.
//!
//! `Editor` owns a surface and wires the components together: commands route
//! through the dispatch point (with media alignment taking priority over
//! text alignment when a node is selected), every mutation is followed by
//! the reconciliation pass and change propagation, and toolbar state
//! refreshes are deferred until the host calls `settle`.

use web_time::Instant;

use crate::command::{self, Command};
use crate::ingest::{self, IngestError};
use crate::media::{self, ClickOutcome, MediaId};
use crate::propagate::{ChangeCallback, ChangeController};
use crate::surface::EditingSurface;
use crate::toolbar::FormattingState;
use crate::{insert, types::Selection};
use vellum_common::{MediaStore, RawFile};

pub struct Editor<S: EditingSurface> {
    surface: S,
    controller: ChangeController,
    toolbar: FormattingState,
    toolbar_stale: bool,
}

impl<S: EditingSurface> Editor<S> {
    /// Mount over a surface with an initial value and the upward change
    /// callback. The initial value is applied as an external assignment, so
    /// nothing is emitted for it.
    pub fn mount(surface: S, initial: &str, on_change: ChangeCallback) -> Self {
        let mut editor = Self {
            surface,
            controller: ChangeController::new(),
            toolbar: FormattingState::new(),
            toolbar_stale: false,
        };
        editor.controller.set_on_change(on_change);
        editor
            .controller
            .assign_value(&mut editor.surface, initial, reconcile_all);
        editor.toolbar_stale = true;
        editor
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Current serialized value.
    pub fn value(&self) -> String {
        self.surface.serialize()
    }

    /// Execute a formatting command.
    ///
    /// Alignment commands apply to the selected media node when there is
    /// one; only without a media selection do they reach the text. All other
    /// commands go straight to the surface's formatting primitive.
    pub fn execute(&mut self, command: &Command) -> bool {
        if let Some(alignment) = command.media_alignment()
            && media::align_selected(&mut self.surface, alignment)
        {
            self.after_mutation();
            return true;
        }
        let mutated = command::execute(&mut self.surface, command);
        if mutated {
            self.after_mutation();
        }
        mutated
    }

    /// Upload path: validate, store, and embed an image file.
    pub fn insert_image(
        &mut self,
        store: &dyn MediaStore,
        file: &RawFile,
    ) -> Result<MediaId, IngestError> {
        let id = ingest::ingest(&mut self.surface, store, file)?;
        self.after_mutation();
        Ok(id)
    }

    /// Drop path: embed if it is an image, skip quietly otherwise.
    pub fn drop_file(&mut self, store: &dyn MediaStore, file: &RawFile) -> Option<MediaId> {
        let id = ingest::ingest_drop(&mut self.surface, store, file)?;
        self.after_mutation();
        Some(id)
    }

    /// Paste externally produced content at the active range.
    pub fn paste(&mut self, fragment: &str) {
        self.surface.insert_fragment(fragment);
        self.after_mutation();
    }

    /// Type plain text at the active range.
    pub fn insert_text(&mut self, text: &str) {
        insert::insert_text(&mut self.surface, text);
        self.after_mutation();
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.surface.set_selection(selection);
        self.toolbar_stale = true;
    }

    /// A click landing on a media node.
    pub fn click_media(&mut self, id: MediaId, at: Instant) -> Option<ClickOutcome> {
        let outcome = media::click(&mut self.surface, id, at)?;
        // Selection flips don't serialize, resizes do; propagation filters
        // the no-ops for us.
        self.after_mutation();
        Some(outcome)
    }

    /// A click landing outside every media node.
    pub fn click_outside(&mut self) {
        media::clear_selection(&mut self.surface);
        self.toolbar_stale = true;
    }

    /// The surface lost focus.
    pub fn blur(&mut self) {
        media::clear_selection(&mut self.surface);
        self.surface.set_selection(None);
        self.toolbar_stale = true;
    }

    pub fn selected_media(&self) -> Option<MediaId> {
        media::selected_id(&self.surface)
    }

    /// The owner assigned a new value. Echoes of our own emissions are
    /// skipped without disturbing the surface.
    pub fn assign_value(&mut self, value: &str) -> bool {
        let changed = self
            .controller
            .assign_value(&mut self.surface, value, reconcile_all);
        if changed {
            self.toolbar_stale = true;
        }
        changed
    }

    /// Toolbar state as of the last `settle`.
    pub fn toolbar(&self) -> &FormattingState {
        &self.toolbar
    }

    /// Run the deferred toolbar refresh, if one is pending.
    pub fn settle(&mut self) {
        if self.toolbar_stale {
            self.toolbar.refresh(&self.surface);
            self.toolbar_stale = false;
        }
    }

    fn after_mutation(&mut self) {
        reconcile_all(&mut self.surface);
        self.controller.on_surface_mutated(&self.surface);
        self.toolbar_stale = true;
    }
}

/// Normalize every unreconciled media node on the surface.
pub fn reconcile_all<S: EditingSurface>(surface: &mut S) {
    for id in surface.media_ids() {
        if let Some(node) = surface.media_mut(id) {
            media::reconcile(node);
        }
    }
}
