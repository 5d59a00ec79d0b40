use super::ResourceStore;
use crate::error::{MergeError, Result};
use std::fs;
use std::path::PathBuf;

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceStore for FileStore {
    fn list_locales(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            MergeError::Store(format!(
                "cannot read resource tree {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let mut locales = Vec::new();
        for entry in entries {
            let entry = entry.map_err(MergeError::Io)?;
            if !entry.path().is_dir() {
                continue;
            }
            // Non UTF-8 names can never match the prefix
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(prefix) {
                    locales.push(name.to_string());
                }
            }
        }

        locales.sort();
        Ok(locales)
    }

    fn exists(&self, locale: &str, file: &str) -> bool {
        self.path_of(locale, file).is_file()
    }

    fn read(&self, locale: &str, file: &str) -> Result<String> {
        fs::read_to_string(self.path_of(locale, file)).map_err(MergeError::Io)
    }

    fn write(&mut self, locale: &str, file: &str, content: &str) -> Result<()> {
        fs::write(self.path_of(locale, file), content).map_err(MergeError::Io)
    }

    fn path_of(&self, locale: &str, file: &str) -> PathBuf {
        self.root.join(locale).join(file)
    }
}
