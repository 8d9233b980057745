//! Command-line interface definition for Game Scout
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the guided conversation, free-text search,
//! vibe search and catalog listing.

use clap::{Parser, Subcommand};

/// Game Scout - find your next game through a short conversation
///
/// Collects search criteria step by step and forwards them to a remote
/// recommendation service.
#[derive(Parser, Debug, Clone)]
#[command(name = "gamescout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/gamescout.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Override the recommendation gateway endpoint
    #[arg(long, env = "GAMESCOUT_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Game Scout
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive scouting conversation
    Scout {
        /// Conversation mode: guided (step by step filters) or free_text
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Ask for recommendations with a single free-text description
    Ask {
        /// What kind of game are you looking for?
        query: String,
    },

    /// Search the games catalog by vibe, likes and dislikes
    Vibe {
        /// Mood or style, e.g. "chill retro puzzle"
        #[arg(long)]
        vibe: String,

        /// Games or themes you like (defaults to the vibe)
        #[arg(long)]
        likes: Option<String>,

        /// Terms to steer away from
        #[arg(long, default_value = "")]
        dislikes: String,
    },

    /// List the selectable genres, tags and platforms
    Catalog {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/gamescout.yaml".to_string()),
            verbose: false,
            json_logs: false,
            endpoint: None,
            command: Commands::Scout { mode: None },
        }
    }
}
