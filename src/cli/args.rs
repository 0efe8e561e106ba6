//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input media file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// ffprobe executable to run
    #[arg(long)]
    pub ffprobe: Option<PathBuf>,

    /// Give up on ffprobe after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the parse command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Captured report file, `-` for standard input
    #[arg(short, long)]
    pub report: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Fail on report lines without `=` instead of skipping them. A live
    /// ffprobe run always prints its banner on stderr, so `inspect` has no
    /// such flag.
    #[arg(long)]
    pub strict: bool,
}
