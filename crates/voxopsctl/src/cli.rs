//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// VoxOps CLI
#[derive(Parser, Debug)]
#[command(name = "voxopsctl")]
#[command(about = "VoxOps - voice-driven kubectl and docker", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Config file (overrides $VOXOPS_CONFIG and the default locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a spoken command, e.g. `voxopsctl ask show me the pods`
    Ask {
        /// The transcribed sentence
        #[arg(required = true)]
        text: Vec<String>,

        /// Output JSON only
        #[arg(long)]
        json: bool,

        /// Read the spoken summary aloud
        #[arg(long)]
        speak: bool,
    },

    /// Show how a sentence would be routed without running anything
    Classify {
        #[arg(required = true)]
        text: Vec<String>,

        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Check that docker and kubectl are available
    Health {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },
}

/// Words of a sentence argument joined back together
pub fn sentence(words: &[String]) -> String {
    words.join(" ")
}
