//! # Transmerge Architecture
//!
//! Transmerge copies a fixed list of translated strings from one Android-style
//! resource tree into another. The copies live in an **auto-merged block**, a
//! region between two sentinel comments right after the `<resources>` opening
//! tag, which the tool owns and regenerates on every run. Everything outside
//! the block is hand-maintained and copied through byte for byte.
//!
//! ```text
//! <resources>
//!     <!-- BEGIN: do not remove :: auto-merged strings :: BEGIN: do not remove -->
//!     <string name="enable_reverse_lookup">Activer</string>
//!     <!-- END: do not remove :: auto-merged strings :: END: do not remove -->
//!     <string name="hand_written">...</string>
//! </resources>
//! ```
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints messages, owns exit codes       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Holds both trees and the validated config                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - extract, strip, rebuild: pure passes over Documents      │
//! │  - merge: walks locales, collects CmdMessages               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - ResourceStore trait: FileStore, InMemoryStore            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout/stderr or exits. Per-locale
//! problems (a missing file, a destination whose sentinels do not pair up)
//! become messages in the [`commands::CmdResult`]; only store and config
//! failures surface as errors.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: The three line passes and the per-locale merge
//! - [`markup`]: Tag, comment and sentinel recognition on single lines
//! - [`model`]: `Document` and `EntryTable`
//! - [`store`]: Storage abstraction and implementations
//! - [`config`]: `transmerge.json` handling
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod markup;
pub mod model;
pub mod store;
