//! Hashing pipeline
//!
//! Two hash kinds are maintained for every collection file:
//!
//! - [`content`] - SHA-256 over the exact file bytes; identical only for
//!   byte-identical files
//! - [`perceptual`] - a 64-bit fingerprint derived from sampled video
//!   frames; compared by bit-distance, tolerant of minor re-encodes
//!
//! The [`engine`] module brings the persisted index up to date for one
//! kind over a candidate file set using a bounded worker pool.

pub mod content;
pub mod engine;
pub mod perceptual;

pub use engine::HashingEngine;

/// Hash-kind names as stored in the index and the catalog
pub mod kind {
    /// Cryptographic digest of the exact file bytes
    pub const CONTENT: &str = "content";

    /// Frame-sampled perceptual fingerprint
    pub const PERCEPTUAL: &str = "perceptual";
}
