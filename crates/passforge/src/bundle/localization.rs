//! Localized string tables.
//!
//! Each language produces one `<lang>.lproj/pass.strings` file of
//! `"key" = "value";` lines. The platform picks the table matching the device
//! locale and substitutes field values and labels by key.

use std::collections::BTreeMap;

use crate::bundle::BundleFile;

/// Per-language string tables for the bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Localizations {
    // language -> ordered key/value entries
    tables: BTreeMap<String, Vec<(String, String)>>,
}

impl Localizations {
    /// Create an empty set of tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one translation to a language table.
    ///
    /// Re-adding an existing key replaces its value in place.
    pub fn add(
        &mut self,
        language: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        let table = self.tables.entry(language.into()).or_default();
        let key = key.into();
        let value = value.into();
        match table.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => table.push((key, value)),
        }
        self
    }

    /// Languages with at least one entry.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Whether no translations have been added.
    pub fn is_empty(&self) -> bool {
        self.tables.values().all(Vec::is_empty)
    }

    /// Render one `pass.strings` file per non-empty language table.
    pub fn to_files(&self) -> Vec<BundleFile> {
        self.tables
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(language, entries)| {
                let mut content = String::new();
                for (key, value) in entries {
                    content.push_str(&format!(
                        "\"{}\" = \"{}\";\n",
                        escape(key),
                        escape(value)
                    ));
                }
                BundleFile::new(
                    format!("{language}.lproj/pass.strings"),
                    content.into_bytes(),
                )
            })
            .collect()
    }
}

/// Escape backslashes, quotes, and newlines for a `.strings` literal.
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_per_language() {
        let mut loc = Localizations::new();
        loc.add("ru", "Gate", "Выход")
            .add("ru", "Seat", "Место")
            .add("fr", "Gate", "Porte");

        let files = loc.to_files();
        assert_eq!(files.len(), 2);

        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["fr.lproj/pass.strings", "ru.lproj/pass.strings"]);

        let ru = files.iter().find(|f| f.path.starts_with("ru")).unwrap();
        let content = String::from_utf8(ru.data.clone()).unwrap();
        assert_eq!(content, "\"Gate\" = \"Выход\";\n\"Seat\" = \"Место\";\n");
    }

    #[test]
    fn test_escaping() {
        let mut loc = Localizations::new();
        loc.add("en", "quote", "say \"hi\"").add("en", "path", "a\\b");

        let files = loc.to_files();
        let content = String::from_utf8(files[0].data.clone()).unwrap();
        assert!(content.contains("\"say \\\"hi\\\"\""));
        assert!(content.contains("\"a\\\\b\""));
    }

    #[test]
    fn test_replace_existing_key() {
        let mut loc = Localizations::new();
        loc.add("en", "Gate", "Gate").add("en", "Gate", "Boarding gate");

        let files = loc.to_files();
        let content = String::from_utf8(files[0].data.clone()).unwrap();
        assert_eq!(content, "\"Gate\" = \"Boarding gate\";\n");
    }

    #[test]
    fn test_empty_produces_no_files() {
        assert!(Localizations::new().to_files().is_empty());
        assert!(Localizations::new().is_empty());
    }
}
