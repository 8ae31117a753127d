//! File-like objects crossing the ingestion boundary.

use bytes::Bytes;
use mime_sniffer::MimeTypeSniffer;
use smol_str::SmolStr;

/// A file handed to the editor by a picker or a drop event.
///
/// Carries the declared MIME type alongside the payload; the declared type
/// comes from the host platform and is untrusted, so validation prefers the
/// type sniffed from the bytes themselves.
#[derive(Clone, Debug)]
pub struct RawFile {
    /// Original filename, used for alt-text defaults.
    pub name: SmolStr,
    /// MIME type as declared by the source (file picker, drag payload).
    pub mime: SmolStr,
    /// Raw payload.
    pub bytes: Bytes,
}

impl RawFile {
    pub fn new(name: impl Into<SmolStr>, mime: impl Into<SmolStr>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// MIME type sniffed from the payload, if recognizable.
    pub fn sniffed_mime(&self) -> Option<&str> {
        self.bytes.sniff_mime_type()
    }

    /// Effective MIME type: sniffed when recognizable, declared otherwise.
    pub fn effective_mime(&self) -> SmolStr {
        match self.sniffed_mime() {
            Some(mime) => SmolStr::new(mime),
            None => self.mime.clone(),
        }
    }

    /// Whether the payload is in the image family.
    pub fn is_image(&self) -> bool {
        self.effective_mime().starts_with("image/")
    }

    /// Filename without its extension, as an alt-text default.
    pub fn stem(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniffed_mime_wins_over_declared() {
        // A real PNG header, declared with a bogus type.
        let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];
        let file = RawFile::new("shot.png", "application/octet-stream", png.to_vec());
        assert_eq!(file.effective_mime(), "image/png");
        assert!(file.is_image());
    }

    #[test]
    fn test_declared_mime_as_fallback() {
        let file = RawFile::new("cat.png", "image/png", vec![1u8, 2, 3]);
        // Junk bytes sniff to nothing; the declared type stands.
        assert!(file.is_image());
    }

    #[test]
    fn test_plain_text_is_not_image() {
        let file = RawFile::new("notes.txt", "text/plain", b"hello".to_vec());
        assert!(!file.is_image());
    }

    #[test]
    fn test_stem() {
        assert_eq!(RawFile::new("cat.png", "image/png", vec![1u8]).stem(), "cat");
        assert_eq!(RawFile::new("noext", "image/png", vec![1u8]).stem(), "noext");
        assert_eq!(
            RawFile::new("archive.tar.gz", "application/gzip", vec![1u8]).stem(),
            "archive.tar"
        );
    }
}
