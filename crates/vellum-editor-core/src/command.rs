//! The formatting command vocabulary and its execution path.
//!
//! `Command` is the semantic operation, decoupled from how it is triggered
//! (toolbar button, keybinding, programmatic call). Execution delegates to
//! the host surface's native formatting primitive.

use smol_str::SmolStr;
use tracing::debug;

use crate::surface::EditingSurface;
use crate::types::Alignment;

/// Heading levels the portal's article bodies use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    /// Back to a normal paragraph.
    Normal,
}

impl HeadingLevel {
    /// Number of heading marks, 0 for `Normal`.
    pub fn depth(self) -> usize {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
            Self::Normal => 0,
        }
    }
}

/// A named formatting operation on the current selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Bold,
    Italic,
    Underline,
    UnorderedList,
    OrderedList,
    AlignLeft,
    AlignCenter,
    AlignRight,
    Blockquote,
    Heading(HeadingLevel),
    /// Wrap the selection in a link to `url`.
    Link { url: SmolStr },
    Undo,
    Redo,
}

impl Command {
    /// Stable command name, as the surrounding portal refers to it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::UnorderedList => "unordered-list",
            Self::OrderedList => "ordered-list",
            Self::AlignLeft => "align-left",
            Self::AlignCenter => "align-center",
            Self::AlignRight => "align-right",
            Self::Blockquote => "blockquote",
            Self::Heading(HeadingLevel::H1) => "heading-1",
            Self::Heading(HeadingLevel::H2) => "heading-2",
            Self::Heading(HeadingLevel::H3) => "heading-3",
            Self::Heading(HeadingLevel::Normal) => "heading-normal",
            Self::Link { .. } => "link",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }

    /// Parse a command name plus optional value (the link URL).
    pub fn parse(name: &str, value: Option<&str>) -> Option<Self> {
        Some(match name {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "underline" => Self::Underline,
            "unordered-list" => Self::UnorderedList,
            "ordered-list" => Self::OrderedList,
            "align-left" => Self::AlignLeft,
            "align-center" => Self::AlignCenter,
            "align-right" => Self::AlignRight,
            "blockquote" => Self::Blockquote,
            "heading-1" => Self::Heading(HeadingLevel::H1),
            "heading-2" => Self::Heading(HeadingLevel::H2),
            "heading-3" => Self::Heading(HeadingLevel::H3),
            "heading-normal" => Self::Heading(HeadingLevel::Normal),
            "link" => Self::Link {
                url: SmolStr::new(value?),
            },
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            _ => return None,
        })
    }

    /// The media alignment this command maps to when a media node is
    /// selected, if any.
    pub fn media_alignment(&self) -> Option<Alignment> {
        match self {
            Self::AlignLeft => Some(Alignment::FloatLeft),
            Self::AlignCenter => Some(Alignment::Center),
            Self::AlignRight => Some(Alignment::FloatRight),
            _ => None,
        }
    }
}

/// Execute a command against the surface's native formatting primitive.
///
/// The central dispatch point for all formatting operations. Returns whether
/// the document was mutated; a missing selection degrades to a no-op, never
/// an error.
pub fn execute<S: EditingSurface>(surface: &mut S, command: &Command) -> bool {
    let mutated = surface.apply_format(command);
    debug!(command = command.name(), mutated, "executed command");
    mutated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for name in [
            "bold",
            "italic",
            "underline",
            "unordered-list",
            "ordered-list",
            "align-left",
            "align-center",
            "align-right",
            "blockquote",
            "heading-1",
            "heading-2",
            "heading-3",
            "heading-normal",
            "undo",
            "redo",
        ] {
            let cmd = Command::parse(name, None).unwrap();
            assert_eq!(cmd.name(), name);
        }
    }

    #[test]
    fn test_parse_link_requires_url() {
        assert_eq!(Command::parse("link", None), None);
        assert_eq!(
            Command::parse("link", Some("https://example.com")),
            Some(Command::Link {
                url: "https://example.com".into()
            })
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Command::parse("strikethrough", None), None);
    }

    #[test]
    fn test_media_alignment_mapping() {
        assert_eq!(
            Command::AlignRight.media_alignment(),
            Some(Alignment::FloatRight)
        );
        assert_eq!(Command::Bold.media_alignment(), None);
    }
}
