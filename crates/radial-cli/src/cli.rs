use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Radial distribution network repair and voltage-drop analysis", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Repair a site and compute per-node voltages
    Analyze {
        /// Site file: JSON with "nodes" and "conductors" arrays
        input: PathBuf,
        /// Engine configuration, TOML
        #[arg(long)]
        config: Option<PathBuf>,
        /// Conductor catalog overriding the built-in table, JSON
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Write the report here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Compact single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Audit a site file without modifying anything
    Validate {
        /// Site file: JSON with "nodes" and "conductors" arrays
        input: PathBuf,
        /// Emit findings as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the conductor catalog in effect
    Catalog {
        /// Conductor catalog overriding the built-in table, JSON
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}
