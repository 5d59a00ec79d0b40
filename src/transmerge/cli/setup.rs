use clap::{CommandFactory, Parser};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.1.0" for releases, "0.1.0@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "transmerge", bin_name = "transmerge", version = get_version())]
#[command(
    about = "Merge lookup translations from another resource tree into an auto-merged block",
    long_about = None
)]
pub struct Cli {
    /// Source resource tree (the directory holding the values*/ folders)
    pub source: PathBuf,

    /// Destination resource tree [default: <tool directory>/res]
    #[arg(short, long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Merge configuration file [default: <tool directory>/transmerge.json]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report what would change without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// One-line usage, printed on any argument error
pub fn usage() -> String {
    Cli::command().render_usage().to_string()
}
