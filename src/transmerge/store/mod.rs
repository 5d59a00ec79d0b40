//! # Storage Layer
//!
//! The merge reads one resource tree and rewrites another. Both are reached
//! through the [`ResourceStore`] trait so the passes never touch the
//! filesystem directly.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: a resource tree on disk
//!   ```text
//!   res/
//!   ├── values/strings.xml
//!   ├── values-fr/strings.xml
//!   └── values-pt-rBR/strings.xml
//!   ```
//! - [`memory::InMemoryStore`]: in-memory tree for testing, no persistence
//!
//! A store is addressed by locale directory name plus file name, never by
//! arbitrary path, which keeps every write inside the tree.

use crate::error::Result;
use std::path::PathBuf;

pub mod fs;
pub mod memory;

/// Abstract interface over a tree of per-locale resource directories.
pub trait ResourceStore {
    /// Locale directories directly under the root whose name starts with
    /// `prefix`, sorted by name
    fn list_locales(&self, prefix: &str) -> Result<Vec<String>>;

    /// Whether `file` exists inside the locale directory
    fn exists(&self, locale: &str, file: &str) -> bool;

    fn read(&self, locale: &str, file: &str) -> Result<String>;

    fn write(&mut self, locale: &str, file: &str, content: &str) -> Result<()>;

    /// Location of a file, for diagnostics
    fn path_of(&self, locale: &str, file: &str) -> PathBuf;
}
