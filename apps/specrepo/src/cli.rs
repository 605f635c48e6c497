//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "specrepo",
    version,
    about = "Lint spec repositories",
    long_about = "specrepo — validate every spec file in a spec repository and report grouped results.\n\nConfiguration precedence: CLI > specrepo.toml > defaults.",
    after_help = "Examples:\n  specrepo lint\n  specrepo lint master --only-errors\n  specrepo lint ./Specs --output json\n  specrepo list",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(long, global = true, help = "Directory holding registered spec repos")]
    pub repos_root: Option<String>,
    #[arg(long, global = true, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
    #[arg(long, global = true, help = "Color mode: auto|always|never (default: auto)")]
    pub color: Option<String>,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current specrepo version.")]
    Version,
    /// Lint spec repos
    #[command(
        about = "Validate the specs of a repo",
        long_about = "Validate every spec file of the named repo, of a directory, or of all registered repos. Exits non-zero when any spec has errors.",
        after_help = "Examples:\n  specrepo lint\n  specrepo lint master\n  specrepo lint path/to/Specs --only-errors"
    )]
    Lint {
        #[arg(help = "Repo name or directory (default: all registered repos)")]
        name: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Lint presents only the errors")]
        only_errors: bool,
        #[arg(long, help = "Number of validation workers (default: one per core)")]
        jobs: Option<usize>,
    },
    /// List registered repos
    #[command(
        about = "List repos",
        long_about = "List the spec repos found under the repositories root."
    )]
    List,
}
