//! Embedded media objects and their interaction state machine.
//!
//! Every image in the document is a `MediaNode`: independently positioned,
//! selectable, alignable, and resizable through a discrete width-class
//! cycle driven by double-click gestures. At most one node is selected at
//! any time. Nodes enter the document through ingestion, paste, or external
//! rehydration, and are normalized exactly once by `reconcile`.

use smol_str::SmolStr;
use tracing::debug;
use web_time::Instant;

use crate::surface::EditingSurface;
use crate::types::{Alignment, RESIZE_GESTURE_WINDOW, WidthClass};

/// Stable identity of a media node within one surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaId(pub u64);

/// An image embedded in the document.
///
/// `source_ref` is created at ingestion and immutable afterwards. `width`
/// and `alignment` stay `None` until the node is reconciled; consumers must
/// tolerate that brief unset window between a structural mutation and the
/// post-mutation hook running.
#[derive(Clone, Debug)]
pub struct MediaNode {
    /// Opaque embeddable reference (data URL, CDN path, ...).
    pub source_ref: SmolStr,
    /// Alt text captured at ingestion.
    pub alt: SmolStr,
    pub width: Option<WidthClass>,
    pub alignment: Option<Alignment>,
    pub selected: bool,
    /// Only used to classify a click as part of a resize gesture.
    pub last_interaction: Option<Instant>,
    /// The node's internal content must not be editable as text.
    pub text_editable: bool,
    /// The node responds to clicks.
    pub interactive: bool,
}

impl MediaNode {
    /// A freshly observed node: attributes unset, not yet normalized.
    pub fn new(source_ref: impl Into<SmolStr>, alt: impl Into<SmolStr>) -> Self {
        Self {
            source_ref: source_ref.into(),
            alt: alt.into(),
            width: None,
            alignment: None,
            selected: false,
            last_interaction: None,
            text_editable: true,
            interactive: false,
        }
    }

    pub fn is_normalized(&self) -> bool {
        self.width.is_some() && self.alignment.is_some() && !self.text_editable && self.interactive
    }
}

/// Normalize a newly observed node. Idempotent: re-running on an already
/// normalized node changes nothing and reports no change.
///
/// Applies regardless of how the node entered the document (upload, drop,
/// raw paste, rehydration).
pub fn reconcile(node: &mut MediaNode) -> bool {
    if node.is_normalized() {
        return false;
    }
    if node.width.is_none() {
        node.width = Some(WidthClass::Full);
    }
    if node.alignment.is_none() {
        node.alignment = Some(Alignment::Center);
    }
    node.text_editable = false;
    node.interactive = true;
    debug!(source_ref = %node.source_ref, "reconciled media node");
    true
}

/// Outcome of a click landing on a media node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The node became (or stayed) the selected one.
    Selected,
    /// The click completed a resize gesture; the new width class.
    Resized(WidthClass),
}

/// The currently selected node, if any.
pub fn selected_id<S: EditingSurface>(surface: &S) -> Option<MediaId> {
    surface
        .media_ids()
        .into_iter()
        .find(|&id| surface.media(id).is_some_and(|n| n.selected))
}

/// Select one node, deselecting any other.
pub fn select<S: EditingSurface>(surface: &mut S, id: MediaId) {
    for other in surface.media_ids() {
        if other != id
            && let Some(node) = surface.media_mut(other)
        {
            node.selected = false;
        }
    }
    if let Some(node) = surface.media_mut(id) {
        node.selected = true;
    }
}

/// Clear media selection entirely (click outside all nodes, focus loss).
pub fn clear_selection<S: EditingSurface>(surface: &mut S) {
    for id in surface.media_ids() {
        if let Some(node) = surface.media_mut(id) {
            node.selected = false;
        }
    }
}

/// Handle a click on a media node at time `at`.
///
/// A click on an already-selected node within `RESIZE_GESTURE_WINDOW` of its
/// last interaction advances the width cycle from whatever width the node
/// currently holds; any other click selects the node (clearing the previous
/// selection). Returns None for an unknown id.
pub fn click<S: EditingSurface>(surface: &mut S, id: MediaId, at: Instant) -> Option<ClickOutcome> {
    let node = surface.media(id)?;
    let is_resize = node.selected
        && node
            .last_interaction
            .is_some_and(|last| at.saturating_duration_since(last) <= RESIZE_GESTURE_WINDOW);

    if is_resize {
        let node = surface.media_mut(id)?;
        // Cycle continues from the current width, not from a fixed start.
        let next = node.width.unwrap_or(WidthClass::Full).next();
        node.width = Some(next);
        node.last_interaction = Some(at);
        debug!(?id, width = next.as_str(), "media resize gesture");
        Some(ClickOutcome::Resized(next))
    } else {
        select(surface, id);
        let node = surface.media_mut(id)?;
        node.last_interaction = Some(at);
        Some(ClickOutcome::Selected)
    }
}

/// Apply an alignment to the selected node, replacing any prior alignment.
/// Selection state is unchanged. Returns false when no node is selected.
pub fn align_selected<S: EditingSurface>(surface: &mut S, alignment: Alignment) -> bool {
    let Some(id) = selected_id(surface) else {
        return false;
    };
    if let Some(node) = surface.media_mut(id) {
        node.alignment = Some(alignment);
        debug!(?id, alignment = alignment.as_str(), "media aligned");
        true
    } else {
        false
    }
}
