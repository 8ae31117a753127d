//! The host editing surface as an opaque capability.
//!
//! Everything the engine needs from a concrete surface (browser
//! contenteditable, native rich-text view, the in-memory reference surface)
//! sits behind `EditingSurface`. The document tree itself stays a black box
//! except where media nodes are concerned; the engine only sees selection
//! state, a native formatting primitive, structural insertion, media-node
//! attributes, and the serialized value.

use std::ops::Range;

use crate::command::Command;
use crate::media::{MediaId, MediaNode};
use crate::types::Selection;

/// Capability contract for a host editing surface.
///
/// Mutating operations restore a valid caret themselves: after
/// `replace_range` the caret sits immediately after the inserted text, after
/// `insert_media_at` immediately after the node. `selection() == None` means
/// the surface holds no active range at all (e.g. focus went to a file
/// dialog), which is distinct from a collapsed selection.
pub trait EditingSurface {
    // === Selection ===

    fn selection(&self) -> Option<Selection>;

    fn set_selection(&mut self, selection: Option<Selection>);

    /// Collapse the selection to a caret at `offset`.
    fn set_caret(&mut self, offset: usize) {
        self.set_selection(Some(Selection::caret(offset)));
    }

    /// Document length in caret positions (chars, with each media node
    /// occupying one position).
    fn len_chars(&self) -> usize;

    // === Native formatting primitive ===

    /// Apply a named formatting command to the current selection.
    ///
    /// Returns whether the document was mutated. With no active selection
    /// this is a no-op at the caret position; it never fails.
    fn apply_format(&mut self, command: &Command) -> bool;

    /// Whether a command is "active" under the current selection. Pure read.
    fn query_format(&self, command: &Command) -> bool;

    // === Structural primitives ===

    /// Replace a range with plain text (empty range inserts, empty text
    /// deletes). Sibling content is never corrupted.
    fn replace_range(&mut self, range: Range<usize>, text: &str);

    /// Insert a media node at `offset`, returning its identity.
    fn insert_media_at(&mut self, offset: usize, node: MediaNode) -> MediaId;

    /// Insert externally produced content (a paste) at the active range the
    /// way the host surface natively would, including any image markup it
    /// carries. Newly appeared media nodes are left unnormalized; the
    /// post-mutation reconciliation hook picks them up.
    fn insert_fragment(&mut self, fragment: &str);

    // === Media access ===

    /// Identities of all media nodes, in document order.
    fn media_ids(&self) -> Vec<MediaId>;

    fn media(&self, id: MediaId) -> Option<&MediaNode>;

    fn media_mut(&mut self, id: MediaId) -> Option<&mut MediaNode>;

    // === Value exchange ===

    /// Serialize the document to the exchanged value string. Always
    /// recoverable, whatever state the surface is in.
    fn serialize(&self) -> String;

    /// Replace the whole document from a value string, discarding current
    /// content and host-native history.
    fn rehydrate(&mut self, value: &str);
}
