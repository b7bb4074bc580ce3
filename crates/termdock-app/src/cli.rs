use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// termdock: persistent multi-pane shell sessions with dev-server detection.
#[derive(Parser, Debug)]
#[command(name = "termdock", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open a project's panes in this terminal.
    Run {
        /// Project whose layout is restored and persisted.
        #[arg(short, long, default_value = "default")]
        project: String,

        /// Working directory for new shells.
        #[arg(short = 'd', long)]
        cwd: Option<PathBuf>,

        /// Run this command in a side pane once its shell is up.
        #[arg(short = 'e', long)]
        command: Option<String>,
    },
    /// Print a project's persisted layout as JSON.
    Layout {
        #[arg(short, long, default_value = "default")]
        project: String,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
