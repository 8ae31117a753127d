//! vellum-editor-core: pure Rust inline editing engine, framework-free.
//!
//! This crate provides:
//! - `EditingSurface` trait - the host surface as an opaque capability
//! - `MarkupSurface` - markdown-flavored in-memory reference surface
//! - `Command` execution and `FormattingState` toolbar queries
//! - Media embedding: ingestion, the selection/resize state machine, and
//!   the `reconcile` normalization pass
//! - `ChangeController` / `Editor` - change propagation with echo
//!   suppression and the facade wiring it all together

pub mod command;
pub mod document;
pub mod editor;
pub mod history;
pub mod ingest;
pub mod insert;
pub mod media;
pub mod propagate;
pub mod surface;
pub mod text;
pub mod toolbar;
pub mod types;

pub use command::{Command, HeadingLevel, execute};
pub use document::{MEDIA_ANCHOR, MarkupSurface};
pub use editor::{Editor, reconcile_all};
pub use history::{EditHistory, Snapshots};
pub use ingest::{IngestError, ingest, ingest_drop};
pub use insert::{insert_media, insert_text};
pub use media::{ClickOutcome, MediaId, MediaNode, click, reconcile, select};
pub use propagate::{ChangeCallback, ChangeController};
pub use smol_str::SmolStr;
pub use surface::EditingSurface;
pub use text::{EditorRope, TextBuffer};
pub use toolbar::FormattingState;
pub use types::{
    Alignment, EditMode, RESIZE_GESTURE_WINDOW, Selection, WidthClass,
};
