//! Near-duplicate detection over perceptual fingerprints

pub mod detector;

pub use detector::{find_duplicates, hamming_distance};
