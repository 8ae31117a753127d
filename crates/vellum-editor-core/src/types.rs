//! Core editor types: selection, media attributes, and the edit-mode token.

use std::ops::Range;

use web_time::Duration;

/// A click on an already-selected media node within this window of its last
/// interaction counts as part of a resize gesture.
pub const RESIZE_GESTURE_WINDOW: Duration = Duration::from_millis(300);

/// Text selection with anchor and head positions, in char offsets.
///
/// The anchor is where the selection started, the head is where the caret is
/// now. They may be in any order - use `start()` and `end()` for ordered
/// bounds. A collapsed selection is a plain caret.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where selection started
    pub anchor: usize,
    /// Where the caret is now
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// A collapsed selection (caret position).
    pub fn caret(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    /// Lower bound.
    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Upper bound.
    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Ordered `Range<usize>`.
    pub fn to_range(&self) -> Range<usize> {
        self.start()..self.end()
    }
}

/// Discrete width classes for embedded media, as a fraction of the content
/// column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidthClass {
    Quarter,
    Half,
    ThreeQuarters,
    Full,
}

impl WidthClass {
    /// The next stop on the resize cycle: 25% -> 50% -> 75% -> 100% -> 25%.
    pub fn next(self) -> Self {
        match self {
            Self::Quarter => Self::Half,
            Self::Half => Self::ThreeQuarters,
            Self::ThreeQuarters => Self::Full,
            Self::Full => Self::Quarter,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quarter => "25%",
            Self::Half => "50%",
            Self::ThreeQuarters => "75%",
            Self::Full => "100%",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "25%" => Some(Self::Quarter),
            "50%" => Some(Self::Half),
            "75%" => Some(Self::ThreeQuarters),
            "100%" => Some(Self::Full),
            _ => None,
        }
    }
}

/// Horizontal placement of an embedded media node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    /// Centered block, text above and below.
    Center,
    /// Floated left, text wraps on the right.
    FloatLeft,
    /// Floated right, text wraps on the left.
    FloatRight,
}

impl Alignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::FloatLeft => "left",
            Self::FloatRight => "right",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "center" => Some(Self::Center),
            "left" => Some(Self::FloatLeft),
            "right" => Some(Self::FloatRight),
            _ => None,
        }
    }
}

/// Who is currently driving the surface.
///
/// Threaded through the propagation path instead of an ambient mutable flag:
/// while the owning collaborator's value is being applied to the surface,
/// mutation observations must not be re-emitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    UserEditing,
    ExternalRehydration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        let sel = Selection::new(5, 10);
        assert_eq!(sel.start(), 5);
        assert_eq!(sel.end(), 10);

        let sel = Selection::new(10, 5);
        assert_eq!(sel.start(), 5);
        assert_eq!(sel.end(), 10);
        assert_eq!(sel.to_range(), 5..10);
    }

    #[test]
    fn test_selection_caret() {
        let sel = Selection::caret(7);
        assert!(sel.is_collapsed());
        assert_eq!(sel.len(), 0);
    }

    #[test]
    fn test_width_cycle_closure() {
        for start in [
            WidthClass::Quarter,
            WidthClass::Half,
            WidthClass::ThreeQuarters,
            WidthClass::Full,
        ] {
            assert_eq!(start.next().next().next().next(), start);
        }
    }

    #[test]
    fn test_width_roundtrip() {
        for w in [
            WidthClass::Quarter,
            WidthClass::Half,
            WidthClass::ThreeQuarters,
            WidthClass::Full,
        ] {
            assert_eq!(WidthClass::parse(w.as_str()), Some(w));
        }
        assert_eq!(WidthClass::parse("33%"), None);
    }

    #[test]
    fn test_alignment_roundtrip() {
        for a in [Alignment::Center, Alignment::FloatLeft, Alignment::FloatRight] {
            assert_eq!(Alignment::parse(a.as_str()), Some(a));
        }
    }
}
