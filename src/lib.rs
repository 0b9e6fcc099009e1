//! Video Organizer Tool Library
//!
//! A fast, reliable library for maintaining a persisted hash index of a
//! local video collection, matching it against a hierarchical reference
//! catalog, and detecting near-duplicate files by perceptual-hash
//! proximity.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`core`] - Core functionality including configuration, error handling
//!   and collection scanning
//! - [`index`] - The persisted path -> {hash kind -> value} index
//! - [`hashing`] - Content and perceptual hash computation plus the
//!   worker-pool engine that keeps the index up to date
//! - [`catalog`] - The reference catalog model and hash-to-item lookup
//! - [`duplicate`] - Near-duplicate clustering over perceptual fingerprints
//! - [`cli`] - Command-line interface (only used by the binary)
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use video_organizer_tool::core::config::Config;
//! use video_organizer_tool::core::scan::collect_video_files;
//! use video_organizer_tool::hashing::{content, kind, HashingEngine};
//! use video_organizer_tool::index::HashIndex;
//! use std::sync::atomic::AtomicBool;
//!
//! // Load configuration and the persisted index
//! let config = Config::load_default().unwrap_or_default();
//! let mut index = HashIndex::new(config.index_path());
//! index.load();
//! index.prune_missing();
//!
//! // Hash whatever the collection gained since the last run
//! let files = collect_video_files(&config.collection);
//! let hash_fn = content::content_hash_fn;
//! let engine = HashingEngine::new(&index, kind::CONTENT, &files, &hash_fn, 4);
//!
//! let shutdown = AtomicBool::new(false);
//! engine.run(&mut index, &shutdown);
//! index.persist().unwrap();
//! ```
//!
//! # Features
//!
//! - **Incremental Indexing** - only new or not-yet-hashed files are computed
//! - **Bounded Parallelism** - a fixed-size worker pool feeds a single
//!   coordinating writer
//! - **Graceful Interruption** - partial progress is persisted on Ctrl+C
//! - **Catalog Matching** - deterministic hash-to-item resolution
//! - **Near-Duplicate Detection** - bit-distance clustering of perceptual
//!   fingerprints

pub mod catalog;
pub mod cli;
pub mod core;
pub mod duplicate;
pub mod hashing;
pub mod index;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
