//! # Command Layer
//!
//! The merge of one locale is three line passes, each in its own module and
//! each a pure function over [`Document`](crate::model::Document) values:
//!
//! 1. [`extract`]: capture the configured entries from the source file
//! 2. [`strip`]: drop the previous auto-merged block from the destination
//! 3. [`rebuild`]: write a fresh block right after the root opening tag
//!
//! [`merge`] walks the locale directories, reads and writes through a
//! [`ResourceStore`](crate::store::ResourceStore) and turns per-locale
//! problems into [`CmdMessage`]s. Nothing here prints.

pub mod extract;
pub mod merge;
pub mod rebuild;
pub mod strip;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Outcome of one locale directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleStatus {
    /// Destination rewritten
    Updated,
    /// Destination would be rewritten (dry run)
    Pending,
    /// Destination already matched
    Unchanged,
    /// A required file was missing
    Skipped,
    /// Destination content could not be spliced; left as is
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleReport {
    pub locale: String,
    pub status: LocaleStatus,
    /// Entries written to the block
    pub entries: usize,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub reports: Vec<LocaleReport>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn add_report(&mut self, report: LocaleReport) {
        self.reports.push(report);
    }

    pub fn count(&self, status: LocaleStatus) -> usize {
        self.reports.iter().filter(|r| r.status == status).count()
    }

    pub fn report(&self, locale: &str) -> Option<&LocaleReport> {
        self.reports.iter().find(|r| r.locale == locale)
    }
}
