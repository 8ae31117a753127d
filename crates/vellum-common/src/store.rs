//! The file-bytes-to-embeddable-reference boundary.

use base64::{Engine, engine::general_purpose::STANDARD};
use smol_str::SmolStr;

use crate::error::StoreError;
use crate::file::RawFile;

/// Converts raw file bytes into a reference the editor can embed.
///
/// The encoding is the collaborator's decision: inline data URL, an
/// uploaded-and-referenced URL, a CDN path. The engine only requires that
/// the returned reference be embeddable inside the serialized value and
/// resolvable when the document is redisplayed.
pub trait MediaStore {
    fn store(&self, file: &RawFile) -> Result<SmolStr, StoreError>;
}

/// Inline `data:` URL store.
///
/// The default backend: encodes the payload in place so the reference needs
/// no server round-trip and previews immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct DataUrlStore;

impl MediaStore for DataUrlStore {
    fn store(&self, file: &RawFile) -> Result<SmolStr, StoreError> {
        let mime = file.effective_mime();
        Ok(SmolStr::new(format!(
            "data:{};base64,{}",
            mime,
            STANDARD.encode(&file.bytes)
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_encoding() {
        let file = RawFile::new("dot.gif", "image/gif", vec![0u8, 1, 2]);
        let reference = DataUrlStore.store(&file).unwrap();
        assert_eq!(reference, "data:image/gif;base64,AAEC");
    }

    #[test]
    fn test_data_url_uses_sniffed_mime() {
        let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];
        let file = RawFile::new("shot", "application/octet-stream", png.to_vec());
        let reference = DataUrlStore.store(&file).unwrap();
        assert!(reference.starts_with("data:image/png;base64,"));
    }
}
