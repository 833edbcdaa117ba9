use std::io::Read;
use std::path::Path;

const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SIGNATURE: &[u8; 3] = &[0xFF, 0xD8, 0xFF];

/// Source container formats the watermarker accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
}

impl SourceFormat {
    /// Classify leading file bytes by magic number. Anything that is not a
    /// PNG signature or a JPEG SOI marker is unsupported.
    pub fn from_magic_bytes(header: &[u8]) -> Option<Self> {
        if header.len() >= PNG_SIGNATURE.len() && &header[..PNG_SIGNATURE.len()] == PNG_SIGNATURE {
            Some(SourceFormat::Png)
        } else if header.len() >= JPEG_SIGNATURE.len()
            && header[..JPEG_SIGNATURE.len()] == JPEG_SIGNATURE[..]
        {
            Some(SourceFormat::Jpeg)
        } else {
            None
        }
    }
}

/// Read just enough of the file to classify it. The extension is never
/// consulted.
pub fn sniff_format(path: &Path) -> Result<Option<SourceFormat>, std::io::Error> {
    let file = std::fs::File::open(path)?;
    let mut header = Vec::with_capacity(PNG_SIGNATURE.len());
    file.take(PNG_SIGNATURE.len() as u64)
        .read_to_end(&mut header)?;
    Ok(SourceFormat::from_magic_bytes(&header))
}
