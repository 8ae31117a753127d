//! vellum-common: collaborator-facing boundary types for the vellum editor.
//!
//! This crate holds the pieces the editing engine exchanges with its host:
//! - `RawFile` - a file-like object with a name, declared MIME type and bytes
//! - `MediaStore` - the file-bytes-to-embeddable-reference boundary, with
//!   `DataUrlStore` as the inline default
//! - the shared error taxonomy

pub mod error;
pub mod file;
pub mod store;

pub use error::StoreError;
pub use file::RawFile;
pub use store::{DataUrlStore, MediaStore};
