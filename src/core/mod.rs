//! Core functionality: configuration, error handling and collection scanning

pub mod config;
pub mod error;
pub mod scan;

pub use config::Config;
pub use error::{OrganizerError, Result};
