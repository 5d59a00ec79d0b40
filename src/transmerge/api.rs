//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for any UI. It holds the two resource trees and the validated
//! configuration, dispatches to `commands/*`, and returns structured types.
//! It never prints and never exits.
//!
//! `MergeApi<S, D>` is generic over both stores:
//! - Production: `MergeApi<FileStore, FileStore>`
//! - Testing: `MergeApi<InMemoryStore, InMemoryStore>`

use crate::commands;
use crate::config::MergeConfig;
use crate::error::{MergeError, Result};
use crate::model::{Document, EntryTable};
use crate::store::ResourceStore;

pub struct MergeApi<S: ResourceStore, D: ResourceStore> {
    source: S,
    dest: D,
    config: MergeConfig,
}

impl<S: ResourceStore, D: ResourceStore> MergeApi<S, D> {
    pub fn new(source: S, dest: D, config: MergeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            dest,
            config,
        })
    }

    /// Merges every locale; with `dry_run` the destination is not written.
    pub fn merge(&mut self, dry_run: bool) -> Result<commands::CmdResult> {
        commands::merge::run(&self.source, &mut self.dest, &self.config, dry_run)
    }

    /// Entries the merge would capture from one source locale.
    pub fn extract(&self, locale: &str) -> Result<EntryTable> {
        let file = &self.config.strings_file;
        if !self.source.exists(locale, file) {
            return Err(MergeError::Store(format!(
                "{} not found",
                self.source.path_of(locale, file).display()
            )));
        }
        let source = Document::parse(&self.source.read(locale, file)?);
        Ok(commands::extract::run(&source, &self.config).table)
    }

    pub fn destination(&self) -> &D {
        &self.dest
    }
}

pub use commands::{CmdMessage, CmdResult, LocaleReport, LocaleStatus, MessageLevel};
