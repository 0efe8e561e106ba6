//! CLI module for streamprobe
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::{LogFormat, LogLevel};

pub mod args;
pub mod commands;

/// streamprobe
///
/// Reads the per-stream report of ffprobe and prints typed stream records,
/// deriving duration and frame count where the report leaves them out.
#[derive(Parser, Debug)]
#[command(name = "streamprobe")]
#[command(about = "streamprobe - Typed stream records from ffprobe reports")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./streamprobe.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Logging format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run ffprobe on a media file and summarise its streams
    Inspect(args::InspectArgs),
    /// Summarise an already captured ffprobe report
    Parse(args::ParseArgs),
}
