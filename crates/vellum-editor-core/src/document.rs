//! The in-memory reference surface.
//!
//! `MarkupSurface` implements `EditingSurface` over a rope of
//! markdown-flavored text plus a registry of media nodes. Each media node
//! occupies one object-replacement character (U+FFFC) in the text; the
//! registry holds the nodes in anchor order. Serialization writes image
//! markup with an attribute block (`![alt](ref){width=50% align=left}`);
//! rehydration locates image spans with pulldown-cmark's offset iterator and
//! rebuilds the registry from them.
//!
//! Formatting commands edit markdown markers directly: marker pairs for
//! inline styles, line prefixes for block styles, a line-trailing attribute
//! block for text alignment.

use std::borrow::Cow;
use std::ops::Range;

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use smol_str::SmolStr;
use tracing::debug;

use crate::command::{Command, HeadingLevel};
use crate::history::{EditHistory, Snapshots};
use crate::media::{MediaId, MediaNode};
use crate::surface::EditingSurface;
use crate::text::{EditorRope, TextBuffer};
use crate::types::{Alignment, Selection, WidthClass};

/// Placeholder character anchoring a media node in the text.
pub const MEDIA_ANCHOR: char = '\u{FFFC}';

const UNDO_DEPTH: usize = 100;

/// Document state captured per undo step: the rope and the media registry
/// move together so undoing an insertion also removes its node.
type SurfaceState = (EditorRope, Vec<(MediaId, MediaNode)>);

/// A piece of an incoming fragment or value.
enum Segment {
    Text(String),
    Media(MediaNode),
}

/// Markdown-flavored in-memory editing surface.
pub struct MarkupSurface {
    text: EditorRope,
    /// Media nodes in anchor (document) order.
    media: Vec<(MediaId, MediaNode)>,
    next_id: u64,
    selection: Option<Selection>,
    history: Snapshots<SurfaceState>,
}

impl Default for MarkupSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupSurface {
    pub fn new() -> Self {
        Self {
            text: EditorRope::new(),
            media: Vec::new(),
            next_id: 0,
            selection: Some(Selection::caret(0)),
            history: Snapshots::new(UNDO_DEPTH),
        }
    }

    pub fn from_value(value: &str) -> Self {
        let mut surface = Self::new();
        surface.rehydrate(value);
        surface
    }

    /// Simulate the surface losing its selection (focus went elsewhere).
    pub fn lose_selection(&mut self) {
        self.selection = None;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // === Internals ===

    fn checkpoint(&mut self) {
        self.history.record((self.text.clone(), self.media.clone()));
    }

    fn anchors_before(&self, offset: usize) -> usize {
        self.text.count_char(0..offset, MEDIA_ANCHOR)
    }

    /// Replace a range with text, keeping the registry in step with the
    /// anchors. Does not checkpoint. Leaves the caret after the inserted
    /// text.
    fn splice(&mut self, range: Range<usize>, text: &str) {
        let len = self.text.len_chars();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);

        let removed_anchors = self.text.count_char(start..end, MEDIA_ANCHOR);
        if removed_anchors > 0 {
            let idx = self.anchors_before(start);
            self.media.drain(idx..idx + removed_anchors);
        }

        // Anchors only enter the text through insert_media_at; raw text from
        // outside must not smuggle them in.
        let clean: Cow<'_, str> = if text.contains(MEDIA_ANCHOR) {
            Cow::Owned(text.chars().filter(|&c| c != MEDIA_ANCHOR).collect())
        } else {
            Cow::Borrowed(text)
        };

        self.text.replace(start..end, &clean);
        self.selection = Some(Selection::caret(start + clean.chars().count()));
    }

    /// Insert an anchor plus its node. Does not checkpoint. Leaves the caret
    /// after the node.
    fn insert_anchor(&mut self, offset: usize, node: MediaNode) -> MediaId {
        let offset = offset.min(self.text.len_chars());
        let idx = self.anchors_before(offset);
        let id = MediaId(self.next_id);
        self.next_id += 1;
        self.text.insert(offset, "\u{FFFC}");
        self.media.insert(idx, (id, node));
        self.selection = Some(Selection::caret(offset + 1));
        id
    }

    fn do_undo(&mut self) -> bool {
        let mut current = (self.text.clone(), self.media.clone());
        if !self.history.undo(&mut current) {
            return false;
        }
        (self.text, self.media) = current;
        self.clamp_selection();
        true
    }

    fn do_redo(&mut self) -> bool {
        let mut current = (self.text.clone(), self.media.clone());
        if !self.history.redo(&mut current) {
            return false;
        }
        (self.text, self.media) = current;
        self.clamp_selection();
        true
    }

    fn clamp_selection(&mut self) {
        let len = self.text.len_chars();
        if let Some(sel) = self.selection {
            self.selection = Some(Selection::new(sel.anchor.min(len), sel.head.min(len)));
        }
    }

    /// The range a formatting command targets: the selection, or the word
    /// around the caret when the selection is collapsed. None when the
    /// surface holds no active range.
    fn format_target(&self) -> Option<(usize, usize)> {
        let sel = self.selection?;
        if sel.is_collapsed() {
            Some(self.word_bounds(sel.head))
        } else {
            Some((sel.start(), sel.end()))
        }
    }

    fn word_bounds(&self, offset: usize) -> (usize, usize) {
        let len = self.text.len_chars();
        let offset = offset.min(len);

        let mut start = 0;
        for i in (0..offset).rev() {
            match self.text.char_at(i) {
                Some(c) if c.is_whitespace() || c == MEDIA_ANCHOR => {
                    start = i + 1;
                    break;
                }
                _ => {}
            }
        }

        let mut end = len;
        for i in offset..len {
            match self.text.char_at(i) {
                Some(c) if c.is_whitespace() || c == MEDIA_ANCHOR => {
                    end = i;
                    break;
                }
                _ => {}
            }
        }

        (start, end)
    }

    fn wrapped_with(&self, start: usize, end: usize, marker: &str) -> bool {
        let m = marker.chars().count();
        start >= m
            && self.text.slice(start - m..start).as_deref() == Some(marker)
            && self.text.slice(end..end + m).as_deref() == Some(marker)
    }

    fn is_inline_active(&self, start: usize, end: usize, marker: &str) -> bool {
        if !self.wrapped_with(start, end, marker) {
            return false;
        }
        // A bare `*` probe inside `**bold**` is the bold marker, not italic.
        if marker == "*" && self.wrapped_with(start, end, "**") {
            return false;
        }
        true
    }

    fn toggle_inline(&mut self, marker: &str) -> bool {
        let Some((start, end)) = self.format_target() else {
            return false;
        };
        let m = marker.chars().count();
        self.checkpoint();
        if self.is_inline_active(start, end, marker) {
            self.splice(end..end + m, "");
            self.splice(start - m..start, "");
            // Keep the affected text selected so a follow-up query sees the
            // new state.
            self.selection = Some(Selection::new(start - m, end - m));
        } else {
            self.splice(end..end, marker);
            self.splice(start..start, marker);
            self.selection = Some(Selection::new(start + m, end + m));
        }
        true
    }

    fn wrap_link(&mut self, url: &str) -> bool {
        let Some((start, end)) = self.format_target() else {
            return false;
        };
        self.checkpoint();
        // Closing part first so `start` stays valid.
        self.splice(end..end, &format!("]({url})"));
        self.splice(start..start, "[");
        self.selection = Some(Selection::caret(end + url.chars().count() + 4));
        true
    }

    /// Block prefix of the line starting at `line_start`, with its char
    /// length.
    fn block_prefix(&self, line_start: usize) -> Option<(BlockPrefix, usize)> {
        let line = self.text.slice(line_start..self.text.line_end(line_start))?;

        let hashes = line.chars().take_while(|&c| c == '#').count();
        if (1..=6).contains(&hashes) && line.chars().nth(hashes) == Some(' ') {
            return Some((BlockPrefix::Heading(hashes), hashes + 1));
        }
        if line.starts_with("- ") {
            return Some((BlockPrefix::Bullet, 2));
        }
        if line.starts_with("> ") {
            return Some((BlockPrefix::Quote, 2));
        }
        let digits = line.chars().take_while(char::is_ascii_digit).count();
        if digits > 0 && line[digits..].starts_with(". ") {
            return Some((BlockPrefix::Ordered, digits + 2));
        }
        None
    }

    /// Toggle a block prefix on the current line, replacing any conflicting
    /// one. `prefix` is what the command inserts; `kind` identifies it.
    fn toggle_block(&mut self, kind: BlockPrefix, prefix: &str) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        let line_start = self.text.line_start(sel.start());
        let current = self.block_prefix(line_start);
        self.checkpoint();

        let mut shift: isize = 0;
        if let Some((found, len)) = current {
            self.splice(line_start..line_start + len, "");
            shift -= len as isize;
            if found == kind {
                self.restore_caret(sel.head, shift, line_start);
                return true;
            }
        }
        self.splice(line_start..line_start, prefix);
        shift += prefix.chars().count() as isize;
        self.restore_caret(sel.head, shift, line_start);
        true
    }

    /// Set or clear the heading level of the current line.
    fn set_heading(&mut self, level: HeadingLevel) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        let line_start = self.text.line_start(sel.start());
        let current = self.block_prefix(line_start);
        let depth = level.depth();

        if let Some((BlockPrefix::Heading(h), _)) = current
            && h == depth
        {
            return false;
        }
        if depth == 0 && !matches!(current, Some((BlockPrefix::Heading(_), _))) {
            return false;
        }

        self.checkpoint();
        let mut shift: isize = 0;
        if let Some((BlockPrefix::Heading(_), len)) = current {
            self.splice(line_start..line_start + len, "");
            shift -= len as isize;
        }
        if depth > 0 {
            let prefix = format!("{} ", "#".repeat(depth));
            self.splice(line_start..line_start, &prefix);
            shift += prefix.chars().count() as isize;
        }
        self.restore_caret(sel.head, shift, line_start);
        true
    }

    fn restore_caret(&mut self, old_head: usize, shift: isize, floor: usize) {
        let len = self.text.len_chars();
        let moved = (old_head as isize + shift).max(floor as isize) as usize;
        self.selection = Some(Selection::caret(moved.min(len)));
    }

    /// Current align attribute on the line, as (attr char range incl. any
    /// leading space, direction).
    fn line_align_attr(&self, line_start: usize) -> Option<(Range<usize>, Alignment)> {
        let line_end = self.text.line_end(line_start);
        let line = self.text.slice(line_start..line_end)?;
        for dir in [Alignment::Center, Alignment::FloatRight] {
            let suffix = format!("{{align={}}}", dir.as_str());
            if line.ends_with(suffix.as_str()) {
                let mut attr_start = line_end - suffix.chars().count();
                if attr_start > line_start && self.text.char_at(attr_start - 1) == Some(' ') {
                    attr_start -= 1;
                }
                return Some((attr_start..line_end, dir));
            }
        }
        None
    }

    /// Set the text alignment of the current line. None means left, the
    /// default, which is encoded by the absence of an attribute.
    fn set_text_align(&mut self, align: Option<Alignment>) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        let line_start = self.text.line_start(sel.start());
        let current = self.line_align_attr(line_start);

        match (&current, align) {
            (None, None) => return false,
            (Some((_, dir)), Some(want)) if *dir == want => return false,
            _ => {}
        }

        self.checkpoint();
        if let Some((range, _)) = current {
            self.splice(range, "");
        }
        if let Some(dir) = align {
            let line_end = self.text.line_end(line_start);
            self.splice(line_end..line_end, &format!(" {{align={}}}", dir.as_str()));
        }
        let head = sel.head.min(self.text.len_chars());
        self.selection = Some(Selection::caret(head));
        true
    }

    /// Split a serialized fragment into text runs and media nodes.
    ///
    /// Image spans are located with pulldown-cmark's offset iterator; an
    /// attribute block directly after a span is consumed into the node.
    /// Everything else passes through verbatim.
    fn parse_segments(fragment: &str) -> Vec<Segment> {
        struct PendingImage {
            span: Range<usize>,
            dest: String,
            alt: String,
        }

        let mut images: Vec<PendingImage> = Vec::new();
        let mut open: Vec<PendingImage> = Vec::new();
        for (event, span) in Parser::new(fragment).into_offset_iter() {
            match event {
                Event::Start(Tag::Image { dest_url, .. }) => open.push(PendingImage {
                    span,
                    dest: dest_url.to_string(),
                    alt: String::new(),
                }),
                Event::Text(t) | Event::Code(t) => {
                    if let Some(img) = open.last_mut() {
                        img.alt.push_str(&t);
                    }
                }
                Event::End(TagEnd::Image) => {
                    if let Some(img) = open.pop()
                        && open.is_empty()
                    {
                        images.push(img);
                    }
                }
                _ => {}
            }
        }

        let mut segments = Vec::new();
        let mut pos = 0;
        for img in images {
            if img.span.start < pos {
                continue;
            }
            if img.span.start > pos {
                segments.push(Segment::Text(fragment[pos..img.span.start].to_string()));
            }
            let mut node = MediaNode::new(SmolStr::new(&img.dest), SmolStr::new(&img.alt));
            let mut end = img.span.end;
            if let Some((consumed, width, alignment)) = parse_attr_block(&fragment[end..]) {
                node.width = width;
                node.alignment = alignment;
                end += consumed;
            }
            segments.push(Segment::Media(node));
            pos = end;
        }
        if pos < fragment.len() {
            segments.push(Segment::Text(fragment[pos..].to_string()));
        }
        segments
    }

    fn write_media(out: &mut String, node: &MediaNode) {
        out.push_str("![");
        // Keep the alt inert in the markup.
        out.extend(node.alt.chars().filter(|c| !"[]()\n".contains(*c)));
        out.push_str("](");
        out.push_str(&node.source_ref);
        out.push(')');
        if node.width.is_some() || node.alignment.is_some() {
            out.push('{');
            let mut first = true;
            if let Some(w) = node.width {
                out.push_str("width=");
                out.push_str(w.as_str());
                first = false;
            }
            if let Some(a) = node.alignment {
                if !first {
                    out.push(' ');
                }
                out.push_str("align=");
                out.push_str(a.as_str());
            }
            out.push('}');
        }
    }
}

/// Block-level line prefixes the surface's native commands manage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BlockPrefix {
    Heading(usize),
    Bullet,
    Ordered,
    Quote,
}

impl EditingSurface for MarkupSurface {
    fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
        self.clamp_selection();
    }

    fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    fn apply_format(&mut self, command: &Command) -> bool {
        match command {
            Command::Bold => self.toggle_inline("**"),
            Command::Italic => self.toggle_inline("*"),
            Command::Underline => self.toggle_inline("++"),
            Command::UnorderedList => self.toggle_block(BlockPrefix::Bullet, "- "),
            Command::OrderedList => self.toggle_block(BlockPrefix::Ordered, "1. "),
            Command::Blockquote => self.toggle_block(BlockPrefix::Quote, "> "),
            Command::Heading(level) => self.set_heading(*level),
            Command::AlignLeft => self.set_text_align(None),
            Command::AlignCenter => self.set_text_align(Some(Alignment::Center)),
            Command::AlignRight => self.set_text_align(Some(Alignment::FloatRight)),
            Command::Link { url } => self.wrap_link(url),
            Command::Undo => self.do_undo(),
            Command::Redo => self.do_redo(),
        }
    }

    fn query_format(&self, command: &Command) -> bool {
        match command {
            Command::Bold | Command::Italic | Command::Underline => {
                let Some((start, end)) = self.format_target() else {
                    return false;
                };
                let marker = match command {
                    Command::Bold => "**",
                    Command::Italic => "*",
                    _ => "++",
                };
                self.is_inline_active(start, end, marker)
            }
            Command::UnorderedList
            | Command::OrderedList
            | Command::Blockquote
            | Command::Heading(_) => {
                let Some(sel) = self.selection else {
                    return false;
                };
                let prefix = self.block_prefix(self.text.line_start(sel.start()));
                match command {
                    Command::UnorderedList => matches!(prefix, Some((BlockPrefix::Bullet, _))),
                    Command::OrderedList => matches!(prefix, Some((BlockPrefix::Ordered, _))),
                    Command::Blockquote => matches!(prefix, Some((BlockPrefix::Quote, _))),
                    Command::Heading(level) => match level.depth() {
                        0 => !matches!(prefix, Some((BlockPrefix::Heading(_), _))),
                        d => matches!(prefix, Some((BlockPrefix::Heading(h), _)) if h == d),
                    },
                    _ => false,
                }
            }
            Command::AlignLeft | Command::AlignCenter | Command::AlignRight => {
                let Some(sel) = self.selection else {
                    return false;
                };
                let attr = self.line_align_attr(self.text.line_start(sel.start()));
                match command {
                    Command::AlignLeft => attr.is_none(),
                    Command::AlignCenter => {
                        matches!(attr, Some((_, Alignment::Center)))
                    }
                    _ => matches!(attr, Some((_, Alignment::FloatRight))),
                }
            }
            Command::Link { .. } => false,
            Command::Undo => self.can_undo(),
            Command::Redo => self.can_redo(),
        }
    }

    fn replace_range(&mut self, range: Range<usize>, text: &str) {
        self.checkpoint();
        self.splice(range, text);
    }

    fn insert_media_at(&mut self, offset: usize, node: MediaNode) -> MediaId {
        self.checkpoint();
        self.insert_anchor(offset, node)
    }

    fn insert_fragment(&mut self, fragment: &str) {
        self.checkpoint();
        let at = match self.selection {
            Some(sel) => {
                if !sel.is_collapsed() {
                    self.splice(sel.to_range(), "");
                }
                sel.start()
            }
            None => self.text.len_chars(),
        };
        let mut caret = at;
        for segment in Self::parse_segments(fragment) {
            match segment {
                Segment::Text(t) => {
                    self.splice(caret..caret, &t);
                    caret += t.chars().filter(|&c| c != MEDIA_ANCHOR).count();
                }
                Segment::Media(node) => {
                    self.insert_anchor(caret, node);
                    caret += 1;
                }
            }
        }
        self.selection = Some(Selection::caret(caret));
    }

    fn media_ids(&self) -> Vec<MediaId> {
        self.media.iter().map(|(id, _)| *id).collect()
    }

    fn media(&self, id: MediaId) -> Option<&MediaNode> {
        self.media
            .iter()
            .find(|(mid, _)| *mid == id)
            .map(|(_, n)| n)
    }

    fn media_mut(&mut self, id: MediaId) -> Option<&mut MediaNode> {
        self.media
            .iter_mut()
            .find(|(mid, _)| *mid == id)
            .map(|(_, n)| n)
    }

    fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.text.len_chars());
        let mut nodes = self.media.iter();
        for ch in self.text.to_string().chars() {
            if ch == MEDIA_ANCHOR {
                if let Some((_, node)) = nodes.next() {
                    Self::write_media(&mut out, node);
                }
            } else {
                out.push(ch);
            }
        }
        out
    }

    fn rehydrate(&mut self, value: &str) {
        debug!(len = value.len(), "rehydrating surface from external value");
        self.text = EditorRope::new();
        self.media.clear();
        self.history.clear();

        let mut caret = 0;
        for segment in Self::parse_segments(value) {
            match segment {
                Segment::Text(t) => {
                    self.splice(caret..caret, &t);
                    caret += t.chars().filter(|&c| c != MEDIA_ANCHOR).count();
                }
                Segment::Media(node) => {
                    self.insert_anchor(caret, node);
                    caret += 1;
                }
            }
        }
        self.selection = Some(Selection::caret(self.text.len_chars()));
    }
}

fn parse_attr_block(rest: &str) -> Option<(usize, Option<WidthClass>, Option<Alignment>)> {
    let inner = rest.strip_prefix('{')?;
    let close = inner.find('}')?;
    let inner = &inner[..close];
    if inner.contains('\n') {
        return None;
    }
    let mut width = None;
    let mut alignment = None;
    let mut recognized = false;
    for token in inner.split_whitespace() {
        if let Some(v) = token.strip_prefix("width=") {
            width = Some(WidthClass::parse(v)?);
        } else if let Some(v) = token.strip_prefix("align=") {
            alignment = Some(Alignment::parse(v)?);
        } else {
            return None;
        }
        recognized = true;
    }
    if !recognized {
        return None;
    }
    Some((close + 2, width, alignment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::reconcile;

    fn make_surface(content: &str) -> MarkupSurface {
        MarkupSurface::from_value(content)
    }

    #[test]
    fn test_serialize_plain_text() {
        let surface = make_surface("hello world");
        assert_eq!(surface.serialize(), "hello world");
    }

    #[test]
    fn test_insert_media_and_serialize() {
        let mut surface = make_surface("before after");
        surface.set_caret(7);
        let id = surface.insert_media_at(7, MediaNode::new("data:x", "cat"));
        let node = surface.media_mut(id).unwrap();
        reconcile(node);
        assert_eq!(
            surface.serialize(),
            "before ![cat](data:x){width=100% align=center}after"
        );
        // Caret sits right after the node.
        assert_eq!(surface.selection(), Some(Selection::caret(8)));
    }

    #[test]
    fn test_rehydrate_recovers_media_attributes() {
        let surface = make_surface("intro ![cat](data:x){width=50% align=right} outro");
        let ids = surface.media_ids();
        assert_eq!(ids.len(), 1);
        let node = surface.media(ids[0]).unwrap();
        assert_eq!(node.source_ref, "data:x");
        assert_eq!(node.alt, "cat");
        assert_eq!(node.width, Some(WidthClass::Half));
        assert_eq!(node.alignment, Some(Alignment::FloatRight));
    }

    #[test]
    fn test_rehydrate_raw_image_leaves_attributes_unset() {
        let surface = make_surface("![pic](http://x/p.png)");
        let node = surface.media(surface.media_ids()[0]).unwrap();
        assert_eq!(node.width, None);
        assert_eq!(node.alignment, None);
    }

    #[test]
    fn test_serialize_rehydrate_roundtrip() {
        let mut surface = make_surface("one ![a](r1){width=25% align=left} two");
        for id in surface.media_ids() {
            reconcile(surface.media_mut(id).unwrap());
        }
        let value = surface.serialize();
        let again = make_surface(&value);
        assert_eq!(again.serialize(), value);
    }

    #[test]
    fn test_replace_range_deleting_anchor_drops_node() {
        let mut surface = make_surface("ab ![x](r) cd");
        assert_eq!(surface.media_ids().len(), 1);
        let len = surface.len_chars();
        surface.replace_range(0..len, "fresh");
        assert!(surface.media_ids().is_empty());
        assert_eq!(surface.serialize(), "fresh");
    }

    #[test]
    fn test_replace_range_strips_smuggled_anchors() {
        let mut surface = make_surface("");
        surface.replace_range(0..0, "a\u{FFFC}b");
        assert_eq!(surface.serialize(), "ab");
        assert!(surface.media_ids().is_empty());
    }

    #[test]
    fn test_bold_toggle_on_selection() {
        let mut surface = make_surface("hello world");
        surface.set_selection(Some(Selection::new(0, 5)));
        assert!(surface.apply_format(&Command::Bold));
        assert_eq!(surface.serialize(), "**hello** world");

        surface.set_selection(Some(Selection::new(2, 7)));
        assert!(surface.query_format(&Command::Bold));
        assert!(surface.apply_format(&Command::Bold));
        assert_eq!(surface.serialize(), "hello world");
    }

    #[test]
    fn test_italic_not_fooled_by_bold() {
        let mut surface = make_surface("**hello** world");
        surface.set_selection(Some(Selection::new(2, 7)));
        assert!(surface.query_format(&Command::Bold));
        assert!(!surface.query_format(&Command::Italic));
    }

    #[test]
    fn test_format_with_collapsed_caret_expands_to_word() {
        let mut surface = make_surface("hello world");
        surface.set_caret(2);
        assert!(surface.apply_format(&Command::Italic));
        assert_eq!(surface.serialize(), "*hello* world");
    }

    #[test]
    fn test_format_without_active_range_is_noop() {
        let mut surface = make_surface("hello");
        surface.lose_selection();
        assert!(!surface.apply_format(&Command::Bold));
        assert_eq!(surface.serialize(), "hello");
    }

    #[test]
    fn test_heading_cycle() {
        let mut surface = make_surface("title line");
        surface.set_caret(3);
        assert!(surface.apply_format(&Command::Heading(HeadingLevel::H2)));
        assert_eq!(surface.serialize(), "## title line");
        assert!(surface.query_format(&Command::Heading(HeadingLevel::H2)));

        assert!(surface.apply_format(&Command::Heading(HeadingLevel::H1)));
        assert_eq!(surface.serialize(), "# title line");

        assert!(surface.apply_format(&Command::Heading(HeadingLevel::Normal)));
        assert_eq!(surface.serialize(), "title line");
        assert!(surface.query_format(&Command::Heading(HeadingLevel::Normal)));
    }

    #[test]
    fn test_list_toggle_replaces_conflicting_prefix() {
        let mut surface = make_surface("item");
        surface.set_caret(0);
        assert!(surface.apply_format(&Command::UnorderedList));
        assert_eq!(surface.serialize(), "- item");
        assert!(surface.query_format(&Command::UnorderedList));

        assert!(surface.apply_format(&Command::OrderedList));
        assert_eq!(surface.serialize(), "1. item");
        assert!(surface.query_format(&Command::OrderedList));

        assert!(surface.apply_format(&Command::OrderedList));
        assert_eq!(surface.serialize(), "item");
    }

    #[test]
    fn test_blockquote_toggle() {
        let mut surface = make_surface("quoted");
        surface.set_caret(0);
        assert!(surface.apply_format(&Command::Blockquote));
        assert_eq!(surface.serialize(), "> quoted");
        assert!(surface.apply_format(&Command::Blockquote));
        assert_eq!(surface.serialize(), "quoted");
    }

    #[test]
    fn test_text_alignment_attribute() {
        let mut surface = make_surface("some line");
        surface.set_caret(2);
        assert!(surface.apply_format(&Command::AlignCenter));
        assert_eq!(surface.serialize(), "some line {align=center}");
        assert!(surface.query_format(&Command::AlignCenter));
        assert!(!surface.query_format(&Command::AlignLeft));

        assert!(surface.apply_format(&Command::AlignRight));
        assert_eq!(surface.serialize(), "some line {align=right}");

        assert!(surface.apply_format(&Command::AlignLeft));
        assert_eq!(surface.serialize(), "some line");
        assert!(surface.query_format(&Command::AlignLeft));
    }

    #[test]
    fn test_link_wrap() {
        let mut surface = make_surface("see docs here");
        surface.set_selection(Some(Selection::new(4, 8)));
        assert!(surface.apply_format(&Command::Link {
            url: "https://e.co".into()
        }));
        assert_eq!(surface.serialize(), "see [docs](https://e.co) here");
    }

    #[test]
    fn test_undo_restores_media_registry() {
        let mut surface = make_surface("text");
        surface.set_caret(4);
        surface.insert_media_at(4, MediaNode::new("r", "a"));
        assert_eq!(surface.media_ids().len(), 1);

        assert!(surface.apply_format(&Command::Undo));
        assert!(surface.media_ids().is_empty());
        assert_eq!(surface.serialize(), "text");

        assert!(surface.apply_format(&Command::Redo));
        assert_eq!(surface.media_ids().len(), 1);
    }

    #[test]
    fn test_insert_fragment_with_image_markup() {
        let mut surface = make_surface("start end");
        surface.set_caret(6);
        surface.insert_fragment("pasted ![p](uri) text");
        assert_eq!(surface.media_ids().len(), 1);
        let node = surface.media(surface.media_ids()[0]).unwrap();
        assert_eq!(node.source_ref, "uri");
        assert_eq!(node.width, None);
        assert_eq!(surface.serialize(), "start pasted ![p](uri) textend");
    }

    #[test]
    fn test_insert_fragment_replaces_selection() {
        let mut surface = make_surface("abcdef");
        surface.set_selection(Some(Selection::new(1, 5)));
        surface.insert_fragment("XY");
        assert_eq!(surface.serialize(), "aXYf");
        assert_eq!(surface.selection(), Some(Selection::caret(3)));
    }

    #[test]
    fn test_attr_block_parsing() {
        let (consumed, width, alignment) = parse_attr_block("{width=75% align=left} tail").unwrap();
        assert_eq!(consumed, 22);
        assert_eq!(width, Some(WidthClass::ThreeQuarters));
        assert_eq!(alignment, Some(Alignment::FloatLeft));

        assert!(parse_attr_block("{}").is_none());
        assert!(parse_attr_block("{width=12%}").is_none());
        assert!(parse_attr_block("{other=1}").is_none());
        assert!(parse_attr_block("plain").is_none());
    }

    #[test]
    fn test_media_order_with_multiple_nodes() {
        let surface = make_surface("![a](1) mid ![b](2)");
        let ids = surface.media_ids();
        assert_eq!(ids.len(), 2);
        assert_eq!(surface.media(ids[0]).unwrap().source_ref, "1");
        assert_eq!(surface.media(ids[1]).unwrap().source_ref, "2");
    }
}
