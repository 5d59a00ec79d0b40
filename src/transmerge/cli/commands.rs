//! # CLI Layer
//!
//! One possible UI client for the merge. This is the only place that parses
//! arguments, prints, sets up tracing and decides exit codes:
//!
//! - argument errors print the usage line to stdout and exit 1
//! - `--help` / `--version` print and exit 0
//! - a library `Err` bubbles up to `main`, which prints it and exits 1
//! - per-locale problems are messages, the run still exits 0

use super::print::print_messages;
use super::setup::{usage, Cli};
use clap::error::ErrorKind;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, Level};
use transmerge::api::MergeApi;
use transmerge::config::MergeConfig;
use transmerge::error::{MergeError, Result};
use transmerge::store::fs::FileStore;

const DEFAULT_DEST_DIR: &str = "res";

struct AppContext {
    api: MergeApi<FileStore, FileStore>,
    dry_run: bool,
}

pub fn run() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            println!("{}", usage());
            std::process::exit(1);
        }
    };

    init_tracing(cli.verbose);
    let mut ctx = init_context(&cli)?;
    handle_merge(&mut ctx)
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let tool_dir = tool_dir()?;

    let dest_root = cli
        .dest
        .clone()
        .unwrap_or_else(|| tool_dir.join(DEFAULT_DEST_DIR));
    let config = match &cli.config {
        Some(path) => MergeConfig::load_file(path)?,
        None => MergeConfig::load(&tool_dir)?,
    };

    require_dir(&cli.source, "source")?;
    require_dir(&dest_root, "destination")?;
    debug!(source = %cli.source.display(), dest = %dest_root.display(), "resource trees");

    let api = MergeApi::new(FileStore::new(&cli.source), FileStore::new(dest_root), config)?;
    Ok(AppContext {
        api,
        dry_run: cli.dry_run,
    })
}

fn handle_merge(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.merge(ctx.dry_run)?;
    print_messages(&result.messages);
    Ok(())
}

/// Directory holding the running executable
fn tool_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| MergeError::Store(format!("{} has no parent directory", exe.display())))
}

fn require_dir(path: &Path, role: &str) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(MergeError::Store(format!(
            "{} tree {} is not a directory",
            role,
            path.display()
        )))
    }
}
