//! Error types for the video organizer tool
//!
//! This module defines the error types used throughout the application.
//! Most failures are non-fatal: document loads degrade to empty results
//! and per-file hash failures are isolated to the file that caused them.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the video organizer tool
#[derive(Error, Debug)]
pub enum OrganizerError {
    /// A referenced file or document does not exist
    #[error("Not found: {0}")]
    NotFound(PathBuf),

    /// A persisted document failed to parse
    #[error("Failed to parse '{path}': {message}")]
    Corrupt { path: PathBuf, message: String },

    /// General I/O error
    #[error("IO error: {0}")]
    IoError(String),

    /// An individual file's hash computation failed
    #[error("Hashing failed for '{path}': {message}")]
    HashError { path: PathBuf, message: String },

    /// An external tool (ffmpeg) failed or is unavailable
    #[error("External tool error: {0}")]
    ToolError(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, OrganizerError>;

impl From<std::io::Error> for OrganizerError {
    fn from(err: std::io::Error) -> Self {
        OrganizerError::IoError(err.to_string())
    }
}
