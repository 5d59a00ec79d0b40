use super::ResourceStore;
use crate::error::{MergeError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// In-memory resource tree for testing and development.
/// Does NOT persist data.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    locales: BTreeSet<String>,
    files: BTreeMap<(String, String), String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty locale directory
    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locales.insert(locale.to_string());
        self
    }

    /// Adds a file, creating its locale directory
    pub fn with_file(mut self, locale: &str, file: &str, content: &str) -> Self {
        self.locales.insert(locale.to_string());
        self.files
            .insert((locale.to_string(), file.to_string()), content.to_string());
        self
    }

    pub fn get(&self, locale: &str, file: &str) -> Option<&str> {
        self.files
            .get(&(locale.to_string(), file.to_string()))
            .map(String::as_str)
    }
}

impl ResourceStore for InMemoryStore {
    fn list_locales(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .locales
            .iter()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn exists(&self, locale: &str, file: &str) -> bool {
        self.get(locale, file).is_some()
    }

    fn read(&self, locale: &str, file: &str) -> Result<String> {
        self.get(locale, file)
            .map(str::to_string)
            .ok_or_else(|| MergeError::Store(format!("{}/{} not found", locale, file)))
    }

    fn write(&mut self, locale: &str, file: &str, content: &str) -> Result<()> {
        if !self.locales.contains(locale) {
            return Err(MergeError::Store(format!("no locale directory {}", locale)));
        }
        self.files
            .insert((locale.to_string(), file.to_string()), content.to_string());
        Ok(())
    }

    fn path_of(&self, locale: &str, file: &str) -> PathBuf {
        PathBuf::from(locale).join(file)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub const STRINGS: &str = "strings.xml";

    /// Wraps entry lines in a `<resources>` root, four-space indented.
    pub fn resources(entries: &[&str]) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n");
        for entry in entries {
            out.push_str("    ");
            out.push_str(entry);
            out.push('\n');
        }
        out.push_str("</resources>\n");
        out
    }

    pub struct TreeFixture {
        pub source: InMemoryStore,
        pub dest: InMemoryStore,
    }

    impl Default for TreeFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TreeFixture {
        pub fn new() -> Self {
            Self {
                source: InMemoryStore::new(),
                dest: InMemoryStore::new(),
            }
        }

        pub fn with_source(mut self, locale: &str, content: &str) -> Self {
            self.source = self.source.with_file(locale, STRINGS, content);
            self
        }

        pub fn with_dest(mut self, locale: &str, content: &str) -> Self {
            self.dest = self.dest.with_file(locale, STRINGS, content);
            self
        }

        /// Same locale on both sides
        pub fn with_pair(self, locale: &str, source: &str, dest: &str) -> Self {
            self.with_source(locale, source).with_dest(locale, dest)
        }
    }
}
