//! Catalog data model
//!
//! Owned-by-parent value trees built in one top-down pass by serde; no
//! back-references, all lookups traverse from the root. Equality is
//! structural (order-sensitive on sequences, value-based on maps) and
//! exists for tests and validation, not for runtime logic.

use crate::core::error::{OrganizerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Root of the reference catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Seasons in catalog order
    #[serde(default)]
    pub seasons: Vec<Season>,

    /// Content not organized by season
    #[serde(default)]
    pub other_groups: Vec<Group>,
}

/// One season of episodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Season {
    /// Season number; unique but not necessarily contiguous
    pub number: u32,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Episodes in airing order
    #[serde(default)]
    pub episodes: Vec<Episode>,

    /// Season finale, if released separately
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finale: Option<Video>,

    /// Mid-season finale, if released separately
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid_season_finale: Option<Video>,
}

/// An episode: a video with an episode-number label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Episode number; usually numeric but may be a free-text label
    #[serde(default)]
    pub number: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Known versions in catalog order
    #[serde(default)]
    pub versions: Vec<Version>,
}

/// A named group of videos outside the season structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Group name
    #[serde(default)]
    pub name: String,

    /// Videos in catalog order
    #[serde(default)]
    pub videos: Vec<Video>,
}

/// A generic catalog video
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// Display name
    #[serde(default)]
    pub name: String,

    /// Known versions in catalog order
    #[serde(default)]
    pub versions: Vec<Version>,
}

/// One specific encode/release of a video.
///
/// Multiple versions per item are expected; the model itself never
/// deduplicates them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Version {
    /// Free-text tags (resolution, source, ...)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Hash-kind name to hex value
    #[serde(default)]
    pub hashes: BTreeMap<String, String>,

    /// File-suffix hint for this release (e.g. "mkv")
    #[serde(default)]
    pub suffix: String,
}

impl Catalog {
    /// Load a catalog document from a JSON file.
    ///
    /// A missing file yields [`OrganizerError::NotFound`] and a malformed
    /// one [`OrganizerError::Corrupt`]; callers degrade to "no catalog"
    /// with a logged diagnostic rather than aborting.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(OrganizerError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| OrganizerError::Corrupt {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Find a season by number
    #[allow(dead_code)]
    pub fn season(&self, number: u32) -> Option<&Season> {
        self.seasons.iter().find(|s| s.number == number)
    }

    /// Find an episode by season and episode number
    #[allow(dead_code)]
    pub fn episode(&self, season_number: u32, episode_number: &str) -> Option<&Episode> {
        self.season(season_number)
            .and_then(|s| s.episode(episode_number))
    }
}

impl Season {
    /// Find an episode by its number label
    pub fn episode(&self, number: &str) -> Option<&Episode> {
        self.episodes.iter().find(|e| e.number == number)
    }
}

impl Episode {
    /// Episode number as rendered in reports and filenames: numeric
    /// numbers are zero-padded to two digits, labels pass through.
    pub fn display_number(&self) -> String {
        match self.number.parse::<u32>() {
            Ok(n) => format!("{:02}", n),
            Err(_) => self.number.clone(),
        }
    }
}

impl Version {
    /// The hash of the given kind, if recorded
    pub fn hash(&self, kind: &str) -> Option<&str> {
        self.hashes.get(kind).map(String::as_str)
    }

    /// Whether this version carries the given hash value under the kind
    pub fn matches(&self, kind: &str, value: &str) -> bool {
        self.hash(kind) == Some(value)
    }
}

/// First version in catalog order carrying the given hash
pub(crate) fn version_matching<'a>(
    versions: &'a [Version],
    kind: &str,
    value: &str,
) -> Option<&'a Version> {
    versions.iter().find(|v| v.matches(kind, value))
}
