//! Error types for the collaborator boundary.

use miette::Diagnostic;
use smol_str::SmolStr;

/// Errors produced while converting file bytes into an embeddable reference.
///
/// The storage backend is a collaborator concern; this type is the shape of
/// its failures as seen by the editing engine. `Backend` covers whatever the
/// concrete store does (upload, disk write, ...), `UnsupportedMime` lets a
/// store refuse content types it cannot host.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum StoreError {
    /// The backing store rejected or failed the operation.
    #[error("media store failure: {reason}")]
    #[diagnostic(code(vellum::store::backend))]
    Backend { reason: String },

    /// The store does not host this content type.
    #[error("media store does not accept `{mime}`")]
    #[diagnostic(code(vellum::store::unsupported_mime))]
    UnsupportedMime { mime: SmolStr },
}

impl StoreError {
    pub fn backend(reason: impl Into<String>) -> Self {
        Self::Backend {
            reason: reason.into(),
        }
    }
}
