//! Bundle assembly: file collection, manifest computation, archiving.

pub mod assembler;
pub mod images;
pub mod localization;
pub mod manifest;

pub use assembler::{CompressionLevel, PassBundle};
pub use images::{ImageDensity, ImageKind, PassImages};
pub use localization::Localizations;
pub use manifest::Manifest;

/// Archive name of the descriptor document.
pub const DESCRIPTOR_FILE: &str = "pass.json";
/// Archive name of the digest manifest.
pub const MANIFEST_FILE: &str = "manifest.json";
/// Archive name of the detached signature (raw bytes, no extension).
pub const SIGNATURE_FILE: &str = "signature";

/// A file destined for the bundle archive: path and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleFile {
    /// Path inside the archive.
    pub path: String,
    /// Raw file content.
    pub data: Vec<u8>,
}

impl BundleFile {
    /// Create a bundle file.
    pub fn new(path: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }
}
