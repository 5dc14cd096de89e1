//! Bundle assembly and archiving.
//!
//! [`PassBundle`] runs the whole production pipeline for one pass: validate,
//! serialize the descriptor, collect localization and image files, digest
//! everything into the manifest, obtain a detached signature, and write the
//! ZIP archive into an in-memory buffer.

use std::io::{Cursor, Write};

use log::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::bundle::{
    BundleFile, Localizations, Manifest, PassImages, DESCRIPTOR_FILE, MANIFEST_FILE,
    SIGNATURE_FILE,
};
use crate::model::Pass;
use crate::sign::{ManifestSigner, SigningConfig};
use crate::Result;

/// ZIP compression level for bundle output.
///
/// Controls the trade-off between compression speed and archive size. Use the
/// provided constants for common cases, or [`CompressionLevel::new`] for
/// custom levels.
#[derive(Debug, Clone, Copy)]
pub struct CompressionLevel(u32);

impl CompressionLevel {
    /// No compression (level 0). Fastest, largest output.
    pub const NONE: CompressionLevel = CompressionLevel(0);

    /// Default compression (level 6). Balanced.
    pub const DEFAULT: CompressionLevel = CompressionLevel(6);

    /// Maximum compression (level 9). Smallest output, slowest.
    pub const MAX: CompressionLevel = CompressionLevel(9);

    /// Creates a compression level from 0-9.
    ///
    /// Values greater than 9 are clamped to 9.
    #[must_use]
    pub fn new(level: u32) -> Self {
        CompressionLevel(level.min(9))
    }

    /// Returns the compression level value (0-9).
    #[must_use]
    pub fn level(&self) -> u32 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for CompressionLevel {
    fn from(level: u32) -> Self {
        CompressionLevel::new(level)
    }
}

/// Bundle production pipeline for one pass.
///
/// Borrows the pass and its collaborators; one [`PassBundle::build`] call
/// produces one archive buffer. Successive builds are independent.
///
/// # Example
///
/// ```no_run
/// use passforge::{Pass, PassBundle, PassImages, SigningConfig};
///
/// # fn demo(pass: &Pass, images: &PassImages, config: &SigningConfig) -> passforge::Result<()> {
/// let bundle = PassBundle::new(pass, images)
///     .compression_level(9.into())
///     .build(config)?;
/// std::fs::write("out.pkpass", bundle)?;
/// # Ok(())
/// # }
/// ```
pub struct PassBundle<'a> {
    pass: &'a Pass,
    images: &'a PassImages,
    localizations: Option<&'a Localizations>,
    compression_level: CompressionLevel,
}

impl<'a> PassBundle<'a> {
    /// Create a bundle pipeline for a pass and its images.
    pub fn new(pass: &'a Pass, images: &'a PassImages) -> Self {
        Self {
            pass,
            images,
            localizations: None,
            compression_level: CompressionLevel::DEFAULT,
        }
    }

    /// Attach localized string tables.
    pub fn localizations(mut self, localizations: &'a Localizations) -> Self {
        self.localizations = Some(localizations);
        self
    }

    /// Set the ZIP compression level for the output archive.
    pub fn compression_level(mut self, level: CompressionLevel) -> Self {
        self.compression_level = level;
        self
    }

    /// Produce the signed bundle archive.
    ///
    /// Pipeline:
    /// 1. Validate the pass and the image set; any failure aborts with no
    ///    output produced.
    /// 2. Resolve the signing strategy from the configuration (local signing
    ///    requires certificate and key up front).
    /// 3. Serialize the descriptor to `pass.json`.
    /// 4. Append localization files, then image files.
    /// 5. Digest every collected file into `manifest.json`.
    /// 6. Sign the exact manifest bytes; append the detached `signature`.
    /// 7. Write the ZIP archive and return its buffer.
    ///
    /// # Errors
    ///
    /// Propagates validation, configuration, signing, and archiving errors
    /// unmodified; no retry is attempted.
    pub fn build(&self, config: &SigningConfig) -> Result<Vec<u8>> {
        self.validate()?;
        let signer = config.signer()?;
        self.assemble(signer.as_ref())
    }

    /// Produce the signed bundle archive with a caller-supplied signer.
    ///
    /// [`PassBundle::build`] resolves the signer from a [`SigningConfig`];
    /// this entry point accepts any [`ManifestSigner`] implementation
    /// directly.
    pub fn build_with_signer(&self, signer: &dyn ManifestSigner) -> Result<Vec<u8>> {
        self.validate()?;
        self.assemble(signer)
    }

    /// Validate the pass, then delegate image completeness to the image set.
    fn validate(&self) -> Result<()> {
        self.pass.validate()?;
        self.images.validate()
    }

    fn assemble(&self, signer: &dyn ManifestSigner) -> Result<Vec<u8>> {
        let mut files: Vec<BundleFile> = Vec::new();
        files.push(BundleFile::new(DESCRIPTOR_FILE, self.pass.to_json()?));

        if let Some(localizations) = self.localizations {
            files.extend(localizations.to_files());
        }
        files.extend(self.images.to_files());

        // Every file collected so far gets a manifest entry; the manifest
        // and signature themselves stay out of the digest set.
        let mut manifest = Manifest::new();
        for file in &files {
            manifest.add_file(&file.path, &file.data);
        }
        let manifest_bytes = manifest.to_json()?;
        debug!(
            "assembled {} bundle files, manifest is {} bytes",
            files.len(),
            manifest_bytes.len()
        );

        let signature = signer.sign(&manifest_bytes)?;
        files.push(BundleFile::new(MANIFEST_FILE, manifest_bytes));
        files.push(BundleFile::new(SIGNATURE_FILE, signature));

        write_archive(&files, self.compression_level)
    }
}

/// Write the bundle files into a ZIP archive buffer.
fn write_archive(files: &[BundleFile], compression_level: CompressionLevel) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let options = if compression_level.level() == 0 {
        SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
    } else {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level.level() as i64))
    };

    for file in files {
        zip.start_file(file.path.as_str(), options)?;
        zip.write_all(&file.data)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
