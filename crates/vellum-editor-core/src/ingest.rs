//! Turning incoming files into embedded media.
//!
//! Two entry points with different failure postures: `ingest` (explicit
//! upload, errors surface to the caller) and `ingest_drop` (drag-and-drop,
//! unsuitable files are skipped quietly).

use smol_str::SmolStr;
use thiserror::Error;
use tracing::{debug, warn};
use vellum_common::{MediaStore, RawFile, StoreError};

use crate::insert;
use crate::media::{MediaId, MediaNode};
use crate::surface::EditingSurface;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("not an image: {mime}")]
    NotAnImage { mime: SmolStr },

    #[error("empty file: {name}")]
    EmptyFile { name: SmolStr },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validate a file, persist it through the store, and embed the result at
/// the active range.
///
/// Content sniffing decides whether the file is an image; the declared MIME
/// type alone is not trusted. The node enters the surface unnormalized and
/// picks up its display defaults from the reconciliation pass.
pub fn ingest<S: EditingSurface>(
    surface: &mut S,
    store: &dyn MediaStore,
    file: &RawFile,
) -> Result<MediaId, IngestError> {
    if file.bytes.is_empty() {
        return Err(IngestError::EmptyFile {
            name: file.name.clone(),
        });
    }
    if !file.is_image() {
        return Err(IngestError::NotAnImage {
            mime: file.effective_mime(),
        });
    }

    let source_ref = store.store(file)?;
    debug!(name = %file.name, "ingested media file");
    let node = MediaNode::new(source_ref, file.stem());
    Ok(insert::insert_media(surface, node))
}

/// Drop-path ingestion: embed each image, skip everything else without
/// raising.
pub fn ingest_drop<S: EditingSurface>(
    surface: &mut S,
    store: &dyn MediaStore,
    file: &RawFile,
) -> Option<MediaId> {
    match ingest(surface, store, file) {
        Ok(id) => Some(id),
        Err(IngestError::NotAnImage { mime }) => {
            debug!(name = %file.name, %mime, "dropped file is not an image, skipping");
            None
        }
        Err(IngestError::EmptyFile { name }) => {
            debug!(%name, "dropped file is empty, skipping");
            None
        }
        Err(IngestError::Store(err)) => {
            warn!(name = %file.name, %err, "storing dropped file failed");
            None
        }
    }
}
