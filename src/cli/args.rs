//! Command-line argument definitions
//!
//! This module defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A fast, reliable tool to index, identify and deduplicate a local video collection
#[derive(Parser, Debug)]
#[command(name = "video-organizer")]
#[command(author = "Vihaan Reddy M")]
#[command(version = "1.0.0")]
#[command(
    about = "Index a local video collection, match it against a reference catalog and find near-duplicates",
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Collection root directory (overrides config)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Path to the catalog document (overrides config)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Number of parallel hashing workers (overrides config)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bring the hash index up to date for the collection
    Index {
        /// Skip perceptual fingerprinting (content hashes only)
        #[arg(long)]
        skip_perceptual: bool,

        /// Drop all stored hashes of one kind and recompute them
        #[arg(long, value_name = "KIND", value_parser = ["content", "perceptual"])]
        recompute: Option<String>,
    },

    /// Report found/missing status of every catalog item
    Report,

    /// Rename indexed files to their resolved catalog names
    Rename {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Find near-duplicate files by perceptual-hash proximity
    Duplicates {
        /// Maximum bit-distance for two files to be grouped (overrides config)
        #[arg(short, long)]
        threshold: Option<u32>,
    },

    /// Open the configuration file in your default editor
    ///
    /// The config file is stored at:
    /// - Windows: %APPDATA%\video_organizer_tool\config.toml
    /// - Linux/macOS: ~/.config/video_organizer_tool/config.toml
    ///
    /// If no config file exists, a default one will be created.
    Config {
        /// Show the config file path without opening it
        #[arg(long)]
        path: bool,

        /// Reset config to defaults (creates a fresh config file)
        #[arg(long)]
        reset: bool,
    },

    /// Generate a configuration file at a specific location
    GenerateConfig {
        /// Output path for the config file (defaults to standard location)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show current configuration
    ShowConfig,
}
