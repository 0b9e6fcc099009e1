//! Reference catalog
//!
//! The catalog is an externally-supplied JSON document describing the
//! known seasons, episodes, groups and videos, each with the released
//! versions and their hashes. It is loaded once, never mutated, and used
//! to resolve local files to named items.

pub mod matcher;
pub mod model;

pub use matcher::{find_version, VersionMatch};
pub use model::Catalog;
