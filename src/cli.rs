use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// packr - asset pack compiler
#[derive(Parser, Debug)]
#[command(name = "packr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the source tree and print the pack plan as YAML
    Plan {
        /// Source directory to scan
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Write the plan to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Packer type for bare files (overrides config)
        #[arg(long)]
        default_type: Option<String>,

        /// Path to a packr.toml config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run the full pipeline: plan, pack, prune, write the manifest
    Pack {
        /// Source directory to scan
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Destination directory (cleaned before the run)
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// Use a previously generated plan instead of re-planning
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Packer type for bare files (overrides config)
        #[arg(long)]
        default_type: Option<String>,

        /// Keep absorbed pack outputs on disk (skip prune deletion)
        #[arg(long)]
        keep_virtual: bool,

        /// Path to a packr.toml config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
