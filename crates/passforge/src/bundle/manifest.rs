//! Digest manifest over the bundle files.
//!
//! The receiving platform verifies each bundle file against `manifest.json`,
//! a flat JSON object mapping archive paths to lowercase SHA-1 hex digests.
//! The manifest never lists itself or the signature file.

use std::collections::BTreeMap;

use sha1::{Digest, Sha1};

use crate::Result;

/// Mapping from archive path to content digest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: BTreeMap<String, String>,
}

impl Manifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Digest a file's content and record it under its archive path.
    pub fn add_file(&mut self, path: impl Into<String>, data: &[u8]) {
        let digest = Sha1::digest(data);
        self.entries.insert(path.into(), hex::encode(digest));
    }

    /// The digest recorded for a path, if any.
    pub fn digest(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// Number of recorded files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no files have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (path, digest) entries in path order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, d)| (p.as_str(), d.as_str()))
    }

    /// Render the manifest as its JSON document.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.entries)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sha1_vectors() {
        let mut manifest = Manifest::new();
        manifest.add_file("empty.txt", b"");
        manifest.add_file("abc.txt", b"abc");

        assert_eq!(
            manifest.digest("empty.txt"),
            Some("da39a3ee5e6b4b0d3255bfef95601890afd80709")
        );
        assert_eq!(
            manifest.digest("abc.txt"),
            Some("a9993e364706816aba3e25717850c26c9cd0d89d")
        );
    }

    #[test]
    fn test_re_adding_a_path_overwrites() {
        let mut manifest = Manifest::new();
        manifest.add_file("pass.json", b"one");
        manifest.add_file("pass.json", b"two");
        assert_eq!(manifest.len(), 1);
        assert_eq!(
            manifest.digest("pass.json"),
            Some(hex::encode(Sha1::digest(b"two")).as_str())
        );
    }

    #[test]
    fn test_json_rendering() {
        let mut manifest = Manifest::new();
        manifest.add_file("icon.png", b"png-bytes");

        let json = manifest.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(
            value["icon.png"],
            hex::encode(Sha1::digest(b"png-bytes"))
        );
    }
}
