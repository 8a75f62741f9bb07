//! CLI Module
//!
//! Command-line interface for browsing the catalog and running sessions.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ambient - layered ambient sound sessions with a meditation timer
#[derive(Parser, Debug)]
#[command(name = "ambient")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Session configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available sounds
    #[command(name = "catalog")]
    Catalog {
        /// Only sounds in this category
        #[arg(long)]
        category: Option<String>,

        /// Only sounds curated for this season
        #[arg(long)]
        season: Option<String>,
    },

    /// List seasons and their background tracks
    #[command(name = "seasons")]
    Seasons,

    /// Run a meditation session
    #[command(name = "session")]
    Session(SessionArgs),

    /// Report catalog sounds missing from the asset root
    #[command(name = "check-assets")]
    CheckAssets,

    /// Print the effective configuration
    #[command(name = "config")]
    Config,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SessionArgs {
    /// Season theme
    #[arg(short, long)]
    pub season: String,

    /// Ambient layer to add (repeatable)
    #[arg(short, long = "layer")]
    pub layers: Vec<String>,

    /// Session length in minutes (must be a preset)
    #[arg(short, long)]
    pub minutes: Option<u32>,

    /// Master volume 0-100
    #[arg(long)]
    pub master: Option<u16>,

    /// Start muted
    #[arg(long)]
    pub mute: bool,

    /// Tick on the wall clock instead of as fast as possible
    #[arg(long)]
    pub realtime: bool,

    /// Write the rendered session to this WAV file
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Print the final session state as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not load audio; record controller calls only
    #[arg(long)]
    pub silent: bool,
}
