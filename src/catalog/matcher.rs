//! Catalog lookup
//!
//! Resolves a (hash kind, value) pair to the catalog version carrying it,
//! together with the owning video and container. The search order is
//! fixed so ambiguous catalogs (duplicate hash values) resolve
//! deterministically: seasons in catalog order - episodes, then the
//! finale, then the mid-season finale - and only then the groups, each in
//! catalog order. Versions are checked in order within any video and the
//! first hit wins.

use crate::catalog::model::{version_matching, Catalog, Episode, Group, Season, Version, Video};

/// The container owning a matched video
#[derive(Debug, Clone, Copy)]
pub enum MatchContainer<'a> {
    Season(&'a Season),
    Group(&'a Group),
}

impl<'a> MatchContainer<'a> {
    /// Human-readable label for reports
    pub fn label(&self) -> String {
        match self {
            MatchContainer::Season(season) if season.name.is_empty() => {
                format!("Season {}", season.number)
            }
            MatchContainer::Season(season) => {
                format!("Season {} - {}", season.number, season.name)
            }
            MatchContainer::Group(group) => group.name.clone(),
        }
    }
}

/// The matched video, episode or standalone
#[derive(Debug, Clone, Copy)]
pub enum MatchedVideo<'a> {
    Episode(&'a Episode),
    Video(&'a Video),
}

impl<'a> MatchedVideo<'a> {
    /// Display name of the matched item
    pub fn name(&self) -> &'a str {
        match self {
            MatchedVideo::Episode(episode) => &episode.name,
            MatchedVideo::Video(video) => &video.name,
        }
    }
}

/// Result of a successful catalog lookup
#[derive(Debug, Clone, Copy)]
pub struct VersionMatch<'a> {
    /// Season or group owning the video
    pub container: MatchContainer<'a>,

    /// The matched episode or video
    pub video: MatchedVideo<'a>,

    /// The version whose hash matched
    pub version: &'a Version,
}

/// Find the first catalog version whose hash of `kind` equals `value`.
///
/// Short-circuits on the first hit under the fixed search order described
/// in the module docs; returns `None` when no version carries the value.
pub fn find_version<'a>(catalog: &'a Catalog, kind: &str, value: &str) -> Option<VersionMatch<'a>> {
    for season in &catalog.seasons {
        if let Some(found) = find_in_season(season, kind, value) {
            return Some(found);
        }
    }

    for group in &catalog.other_groups {
        for video in &group.videos {
            if let Some(version) = version_matching(&video.versions, kind, value) {
                return Some(VersionMatch {
                    container: MatchContainer::Group(group),
                    video: MatchedVideo::Video(video),
                    version,
                });
            }
        }
    }

    None
}

/// Search one season: episodes, then finale, then mid-season finale
fn find_in_season<'a>(season: &'a Season, kind: &str, value: &str) -> Option<VersionMatch<'a>> {
    for episode in &season.episodes {
        if let Some(version) = version_matching(&episode.versions, kind, value) {
            return Some(VersionMatch {
                container: MatchContainer::Season(season),
                video: MatchedVideo::Episode(episode),
                version,
            });
        }
    }

    for special in [&season.finale, &season.mid_season_finale].into_iter().flatten() {
        if let Some(version) = version_matching(&special.versions, kind, value) {
            return Some(VersionMatch {
                container: MatchContainer::Season(season),
                video: MatchedVideo::Video(special),
                version,
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::engine::HashingEngine;
    use crate::hashing::{content, kind};
    use crate::index::HashIndex;
    use std::collections::BTreeMap;
    use std::sync::atomic::AtomicBool;
    use tempfile::TempDir;

    fn version(value: &str) -> Version {
        Version {
            tags: Vec::new(),
            hashes: BTreeMap::from([("content".to_string(), value.to_string())]),
            suffix: "mkv".to_string(),
        }
    }

    fn episode(number: &str, name: &str, hash: &str) -> Episode {
        Episode {
            number: number.to_string(),
            name: name.to_string(),
            versions: vec![version(hash)],
        }
    }

    fn video(name: &str, hash: &str) -> Video {
        Video {
            name: name.to_string(),
            versions: vec![version(hash)],
        }
    }

    #[test]
    fn test_not_found() {
        let catalog = Catalog::default();
        assert!(find_version(&catalog, "content", "anything").is_none());
    }

    #[test]
    fn test_wrong_kind_does_not_match() {
        let catalog = Catalog {
            seasons: vec![Season {
                number: 1,
                episodes: vec![episode("1", "Pilot", "h1")],
                ..Season::default()
            }],
            ..Catalog::default()
        };

        assert!(find_version(&catalog, "perceptual", "h1").is_none());
        assert!(find_version(&catalog, "content", "h1").is_some());
    }

    #[test]
    fn test_earlier_episode_wins_on_duplicate_hash() {
        let catalog = Catalog {
            seasons: vec![Season {
                number: 1,
                episodes: vec![episode("1", "First", "dup"), episode("2", "Second", "dup")],
                ..Season::default()
            }],
            ..Catalog::default()
        };

        let found = find_version(&catalog, "content", "dup").unwrap();
        assert_eq!(found.video.name(), "First");
    }

    #[test]
    fn test_earlier_season_wins_on_duplicate_hash() {
        let catalog = Catalog {
            seasons: vec![
                Season {
                    number: 1,
                    episodes: vec![episode("1", "S1E1", "dup")],
                    ..Season::default()
                },
                Season {
                    number: 2,
                    episodes: vec![episode("1", "S2E1", "dup")],
                    ..Season::default()
                },
            ],
            ..Catalog::default()
        };

        let found = find_version(&catalog, "content", "dup").unwrap();
        assert_eq!(found.video.name(), "S1E1");
        assert!(matches!(
            found.container,
            MatchContainer::Season(season) if season.number == 1
        ));
    }

    #[test]
    fn test_episode_precedes_finale_precedes_mid_season_finale() {
        let season = Season {
            number: 1,
            episodes: vec![episode("1", "Episode", "dup")],
            finale: Some(video("Finale", "dup")),
            mid_season_finale: Some(video("Mid-Season Finale", "dup")),
            ..Season::default()
        };
        let catalog = Catalog {
            seasons: vec![season],
            ..Catalog::default()
        };

        let found = find_version(&catalog, "content", "dup").unwrap();
        assert_eq!(found.video.name(), "Episode");

        // Without the episode, the finale outranks the mid-season finale
        let mut catalog = catalog;
        catalog.seasons[0].episodes.clear();
        let found = find_version(&catalog, "content", "dup").unwrap();
        assert_eq!(found.video.name(), "Finale");

        catalog.seasons[0].finale = None;
        let found = find_version(&catalog, "content", "dup").unwrap();
        assert_eq!(found.video.name(), "Mid-Season Finale");
    }

    #[test]
    fn test_seasons_precede_groups() {
        let catalog = Catalog {
            seasons: vec![Season {
                number: 3,
                episodes: vec![episode("1", "In Season", "dup")],
                ..Season::default()
            }],
            other_groups: vec![Group {
                name: "Extras".to_string(),
                videos: vec![video("In Group", "dup")],
            }],
        };

        let found = find_version(&catalog, "content", "dup").unwrap();
        assert_eq!(found.video.name(), "In Season");
    }

    #[test]
    fn test_group_match_carries_group_container() {
        let catalog = Catalog {
            other_groups: vec![
                Group {
                    name: "First Group".to_string(),
                    videos: vec![video("Other", "other")],
                },
                Group {
                    name: "Second Group".to_string(),
                    videos: vec![video("Wanted", "h9")],
                },
            ],
            ..Catalog::default()
        };

        let found = find_version(&catalog, "content", "h9").unwrap();
        assert_eq!(found.video.name(), "Wanted");
        assert!(matches!(
            found.container,
            MatchContainer::Group(group) if group.name == "Second Group"
        ));
        assert_eq!(found.container.label(), "Second Group");
    }

    #[test]
    fn test_first_version_wins_within_video() {
        let mut episode = episode("1", "Pilot", "dup");
        episode.versions.push(Version {
            tags: vec!["4k".to_string()],
            hashes: BTreeMap::from([("content".to_string(), "dup".to_string())]),
            suffix: "mkv".to_string(),
        });
        let catalog = Catalog {
            seasons: vec![Season {
                number: 1,
                episodes: vec![episode],
                ..Season::default()
            }],
            ..Catalog::default()
        };

        let found = find_version(&catalog, "content", "dup").unwrap();
        assert!(found.version.tags.is_empty());
    }

    #[test]
    fn test_collection_scenario_end_to_end() {
        // A and B share content, C differs; the catalog knows A/B's hash.
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("A.mkv");
        let b = temp_dir.path().join("B.mkv");
        let c = temp_dir.path().join("C.mkv");
        std::fs::write(&a, b"shared episode bytes").unwrap();
        std::fs::write(&b, b"shared episode bytes").unwrap();
        std::fs::write(&c, b"different bytes").unwrap();

        let files = vec![a.clone(), b.clone(), c.clone()];
        let mut index = HashIndex::new(temp_dir.path().join(".video_index.json"));
        let shutdown = AtomicBool::new(false);

        let hash_fn = content::content_hash_fn;
        let engine = HashingEngine::new(&index, kind::CONTENT, &files, &hash_fn, 2);
        engine.run(&mut index, &shutdown);

        assert_eq!(index.len(), 3);

        let h1 = index.get(&a, kind::CONTENT).unwrap().to_string();
        let h2 = index.get(&c, kind::CONTENT).unwrap().to_string();
        assert_eq!(index.get(&b, kind::CONTENT), Some(h1.as_str()));
        assert_ne!(h1, h2);

        let catalog = Catalog {
            seasons: vec![Season {
                number: 1,
                name: "Season One".to_string(),
                episodes: vec![episode("1", "The Known Episode", &h1)],
                ..Season::default()
            }],
            ..Catalog::default()
        };

        let found = find_version(&catalog, kind::CONTENT, &h1).unwrap();
        assert_eq!(found.video.name(), "The Known Episode");

        assert_eq!(index.find_by_value(&h2, None), Some(c.clone()));
        assert_eq!(index.find_by_value("nonexistent", None), None);
        assert!(find_version(&catalog, kind::CONTENT, &h2).is_none());
    }

    #[test]
    fn test_container_label_formats() {
        let season = Season {
            number: 2,
            name: "The Second".to_string(),
            ..Season::default()
        };
        assert_eq!(
            MatchContainer::Season(&season).label(),
            "Season 2 - The Second"
        );

        let unnamed = Season {
            number: 7,
            ..Season::default()
        };
        assert_eq!(MatchContainer::Season(&unnamed).label(), "Season 7");
    }
}
