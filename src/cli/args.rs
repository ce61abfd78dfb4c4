//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Organization chart engine: assemble parent-linked records and annotate them for rendering
#[derive(Parser, Debug)]
#[command(name = "orgchart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Project directory holding .orgchart.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the assembled chart as a tree
    Tree {
        /// Snapshot file (default: `snapshot` setting)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Print the render-ready chart
    Layout {
        /// Snapshot file (default: `snapshot` setting)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Pretty-print JSON
        #[arg(long, conflicts_with = "text")]
        pretty: bool,
        /// Text tree with geometry instead of JSON
        #[arg(long)]
        text: bool,
    },

    /// Report link problems in a snapshot
    Check {
        /// Snapshot file (default: `snapshot` setting)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },
}
