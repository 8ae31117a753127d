//! Selection-aware node insertion.
//!
//! Resolves the active caret/selection range and performs insertion at the
//! correct position. When the surface has lost its selection entirely (a
//! file dialog stole focus, say), content is appended at the end of the
//! document instead - a deliberate degraded-but-safe fallback, not a
//! failure.

use tracing::debug;

use crate::media::{MediaId, MediaNode};
use crate::surface::EditingSurface;

/// Insert a media node at the active range, replacing any selected content;
/// the caret ends up immediately after the node.
pub fn insert_media<S: EditingSurface>(surface: &mut S, node: MediaNode) -> MediaId {
    match surface.selection() {
        Some(sel) => {
            if !sel.is_collapsed() {
                surface.replace_range(sel.to_range(), "");
            }
            surface.insert_media_at(sel.start(), node)
        }
        None => {
            debug!("no active range, appending media at end of document");
            surface.insert_media_at(surface.len_chars(), node)
        }
    }
}

/// Insert plain text at the active range, replacing any selected content;
/// the caret ends up immediately after the text.
pub fn insert_text<S: EditingSurface>(surface: &mut S, text: &str) {
    match surface.selection() {
        Some(sel) => surface.replace_range(sel.to_range(), text),
        None => {
            debug!("no active range, appending text at end of document");
            let end = surface.len_chars();
            surface.replace_range(end..end, text);
        }
    }
}
