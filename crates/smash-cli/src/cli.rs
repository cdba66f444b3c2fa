//! Command-Line Interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use smash_core::DominantHand;

/// SmashForm - overhead smash technique analysis from pose data
#[derive(Parser, Debug)]
#[command(name = "smash-cli")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyse one or more pose JSON files
    Analyze {
        /// Pose input files
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Racket hand (left or right); overrides the file
        #[arg(long)]
        hand: Option<DominantHand>,

        /// Source video frame rate; overrides the file
        #[arg(long)]
        fps: Option<f64>,

        /// Directory for result files; results go to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the active reference profile
    Reference,

    /// Print the effective configuration
    Config,
}
