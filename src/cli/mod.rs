//! CLI interface for Murmur

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Procedural ambient drone for a twenty-chapter story
#[derive(Parser)]
#[command(name = "murmur")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play the drone on the default output device until Ctrl-C
    Play {
        /// Configuration file path
        #[arg(short, long, default_value = "murmur.yaml")]
        config: PathBuf,

        /// Base volume override (0.0 - 0.5)
        #[arg(long)]
        volume: Option<f64>,

        /// Starting chapter override (1 - 20)
        #[arg(long)]
        chapter: Option<i64>,

        /// Advance one chapter every N seconds
        #[arg(long)]
        chapter_secs: Option<u64>,
    },

    /// Render the drone to a WAV file
    Record {
        /// Configuration file path
        #[arg(short, long, default_value = "murmur.yaml")]
        config: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Duration in seconds, before the fade-out tail
        #[arg(short, long, default_value = "60")]
        duration: u64,

        /// Advance one chapter every N seconds
        #[arg(long)]
        chapter_secs: Option<u64>,
    },

    /// List available output devices
    Devices,

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "murmur.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}
