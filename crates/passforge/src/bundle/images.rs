//! Image variants for the bundle.
//!
//! A pass carries PNG images in a handful of named roles (icon, logo, strip,
//! thumbnail, background, footer), each optionally in 1x/2x/3x density. File
//! names follow the `<kind>[@2x|@3x].png` convention. Producing the variants
//! themselves (resizing, rendering) is out of scope; this module only
//! registers finished files and checks completeness.

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;
use walkdir::WalkDir;

use crate::bundle::BundleFile;
use crate::error::Error;
use crate::Result;

/// Role of an image inside the pass layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImageKind {
    /// Shown on the lock screen and in apps; the one mandatory image.
    Icon,
    /// Shown in the pass header.
    Logo,
    /// Wide image behind the primary fields.
    Strip,
    /// Small image next to the fields (event tickets, generic passes).
    Thumbnail,
    /// Blurred background behind the whole pass.
    Background,
    /// Image above the barcode on boarding passes.
    Footer,
}

impl ImageKind {
    /// All image kinds.
    pub const ALL: [ImageKind; 6] = [
        ImageKind::Icon,
        ImageKind::Logo,
        ImageKind::Strip,
        ImageKind::Thumbnail,
        ImageKind::Background,
        ImageKind::Footer,
    ];

    /// Base file name (without density suffix or extension).
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Icon => "icon",
            ImageKind::Logo => "logo",
            ImageKind::Strip => "strip",
            ImageKind::Thumbnail => "thumbnail",
            ImageKind::Background => "background",
            ImageKind::Footer => "footer",
        }
    }
}

/// Pixel density of an image variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImageDensity {
    X1,
    X2,
    X3,
}

impl ImageDensity {
    /// File-name suffix for the density (`""`, `"@2x"`, `"@3x"`).
    pub fn suffix(&self) -> &'static str {
        match self {
            ImageDensity::X1 => "",
            ImageDensity::X2 => "@2x",
            ImageDensity::X3 => "@3x",
        }
    }
}

/// Registry of image variants destined for the bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassImages {
    files: BTreeMap<(ImageKind, ImageDensity), Vec<u8>>,
}

impl PassImages {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image variant from bytes. Replaces any previous variant
    /// of the same kind and density.
    pub fn add(&mut self, kind: ImageKind, density: ImageDensity, data: Vec<u8>) -> &mut Self {
        self.files.insert((kind, density), data);
        self
    }

    /// Register an image variant from a file on disk.
    pub fn add_file(
        &mut self,
        kind: ImageKind,
        density: ImageDensity,
        path: impl AsRef<Path>,
    ) -> Result<&mut Self> {
        let data = std::fs::read(path)?;
        Ok(self.add(kind, density, data))
    }

    /// Load every recognizable image variant from a directory.
    ///
    /// Scans the directory (not recursively) for files following the
    /// `<kind>[@2x|@3x].png` convention; anything else is skipped.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut images = PassImages::new();
        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                Error::Io(std::io::Error::other(format!(
                    "failed to walk image directory: {e}"
                )))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if let Some((kind, density)) = parse_variant(&name) {
                debug!("loading image variant {}", name);
                images.add_file(kind, density, entry.path())?;
            }
        }
        Ok(images)
    }

    /// Check image completeness: an icon variant must be present.
    pub fn validate(&self) -> Result<()> {
        let has_icon = self.files.keys().any(|(kind, _)| *kind == ImageKind::Icon);
        if !has_icon {
            return Err(Error::MissingField("icon".to_string()));
        }
        Ok(())
    }

    /// Number of registered variants.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no variants are registered.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Render the registered variants as bundle files, in stable order.
    pub fn to_files(&self) -> Vec<BundleFile> {
        self.files
            .iter()
            .map(|((kind, density), data)| {
                BundleFile::new(
                    format!("{}{}.png", kind.as_str(), density.suffix()),
                    data.clone(),
                )
            })
            .collect()
    }
}

/// Parse a `<kind>[@2x|@3x].png` file name into its kind and density.
fn parse_variant(file_name: &str) -> Option<(ImageKind, ImageDensity)> {
    let stem = file_name.strip_suffix(".png")?;
    let (base, density) = if let Some(base) = stem.strip_suffix("@2x") {
        (base, ImageDensity::X2)
    } else if let Some(base) = stem.strip_suffix("@3x") {
        (base, ImageDensity::X3)
    } else {
        (stem, ImageDensity::X1)
    };
    let kind = ImageKind::ALL.into_iter().find(|k| k.as_str() == base)?;
    Some((kind, density))
}
