//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Activity timeline for window-focus events.
///
/// Pulls window events from a local activity service and collapses them into
/// a timeline of activity blocks.
#[derive(Debug, Parser)]
#[command(name = "fl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the activity timeline.
    Timeline {
        #[command(flatten)]
        range: RangeArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Summarize time per category, app and hour.
    Summary {
        #[command(flatten)]
        range: RangeArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Dump raw window events as JSONL.
    Events {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Show the configured activity service and whether it is reachable.
    Status,
}

/// Which events to load. Defaults to today.
#[derive(Debug, Clone, Default, Args)]
pub struct RangeArgs {
    /// Today (default).
    #[arg(long, conflicts_with_all = ["last_day", "week", "last_week", "start"])]
    pub day: bool,

    /// Yesterday.
    #[arg(long, conflicts_with_all = ["week", "last_week", "start"])]
    pub last_day: bool,

    /// This week (Monday to Monday).
    #[arg(long, conflicts_with_all = ["last_week", "start"])]
    pub week: bool,

    /// Last week.
    #[arg(long, conflicts_with = "start")]
    pub last_week: bool,

    /// Range start (ISO 8601 or relative, e.g. "2 hours ago").
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// Range end (ISO 8601 or relative).
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// Read events from a JSON file instead of the activity service
    /// (`-` for stdin).
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}
