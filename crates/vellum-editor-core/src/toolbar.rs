//! Toolbar state derived from the surface.
//!
//! The toolbar never computes formatting itself; it queries the surface for
//! each tracked command and caches the answers. Refreshes are driven by the
//! editor after mutations and selection changes settle.

use std::collections::BTreeMap;

use smol_str::SmolStr;

use crate::command::{Command, HeadingLevel};
use crate::surface::EditingSurface;

/// Commands whose active state the toolbar reflects.
///
/// Link is absent: it has no meaningful toggle state without inspecting the
/// markup around the caret, and the portal's toolbar shows it stateless.
pub const TRACKED: &[Command] = &[
    Command::Bold,
    Command::Italic,
    Command::Underline,
    Command::UnorderedList,
    Command::OrderedList,
    Command::Blockquote,
    Command::Heading(HeadingLevel::H1),
    Command::Heading(HeadingLevel::H2),
    Command::Heading(HeadingLevel::H3),
    Command::Heading(HeadingLevel::Normal),
    Command::AlignLeft,
    Command::AlignCenter,
    Command::AlignRight,
    Command::Undo,
    Command::Redo,
];

/// Cached per-command active flags for toolbar rendering.
#[derive(Clone, Debug, Default)]
pub struct FormattingState {
    active: BTreeMap<SmolStr, bool>,
}

impl FormattingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-query every tracked command against the surface.
    pub fn refresh<S: EditingSurface>(&mut self, surface: &S) {
        for command in TRACKED {
            self.active
                .insert(SmolStr::new_static(command.name()), surface.query_format(command));
        }
    }

    /// Whether the named command is active. Unknown or never-refreshed
    /// commands read as inactive.
    pub fn is_active(&self, name: &str) -> bool {
        self.active.get(name).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MarkupSurface;
    use crate::types::Selection;

    #[test]
    fn test_refresh_reflects_surface() {
        let mut surface = MarkupSurface::from_value("**bold** text");
        surface.set_selection(Some(Selection::new(2, 6)));

        let mut state = FormattingState::new();
        state.refresh(&surface);
        assert!(state.is_active("bold"));
        assert!(!state.is_active("italic"));
        assert!(state.is_active("heading-normal"));
        assert!(state.is_active("align-left"));
        assert!(!state.is_active("undo"));
    }

    #[test]
    fn test_unrefreshed_state_is_inactive() {
        let state = FormattingState::new();
        assert!(!state.is_active("bold"));
        assert!(!state.is_active("no-such-command"));
    }

    #[test]
    fn test_refresh_tracks_undo_depth() {
        let mut surface = MarkupSurface::from_value("text");
        surface.set_selection(Some(Selection::new(0, 4)));
        surface.apply_format(&Command::Bold);

        let mut state = FormattingState::new();
        state.refresh(&surface);
        assert!(state.is_active("undo"));
        assert!(!state.is_active("redo"));
    }
}
