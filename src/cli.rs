use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI definition: one conversion pass over one target path.
#[derive(Parser, Debug)]
#[command(
    name = "recoder",
    version,
    about = "Re-encode legacy source files to UTF-8 in place"
)]
pub struct Cli {
    /// File or directory to convert. Prompted for on stdin when omitted.
    pub path: Option<PathBuf>,
    /// Explicit config file (default: nearest `.recoder.toml`, then the home config).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Report what would change without touching any file.
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(long = "no-color")]
    pub no_color: bool,
}

/// Helper entry point so `main` can stay minimal.
pub fn parse() -> Cli {
    Cli::parse()
}
