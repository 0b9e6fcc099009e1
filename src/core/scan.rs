//! Collection scanning
//!
//! Walks the collection root and collects every file whose extension is in
//! the configured video-extension set. Paths are returned sorted so the
//! rest of the pipeline sees a stable order.

use crate::core::config::CollectionConfig;
use log::{debug, warn};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Collect all video files under the collection root.
///
/// A missing root is not an error: it is logged and an empty list is
/// returned, mirroring how document loads degrade elsewhere.
pub fn collect_video_files(config: &CollectionConfig) -> Vec<PathBuf> {
    let root = &config.root;

    if !root.is_dir() {
        warn!("Collection root does not exist: {}", root.display());
        return Vec::new();
    }

    let walker = WalkDir::new(root)
        .follow_links(config.follow_symlinks)
        .max_depth(if config.recursive { usize::MAX } else { 1 });

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let ext = e
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.to_lowercase())
                .unwrap_or_default();
            config.include_extensions.iter().any(|allowed| *allowed == ext)
        })
        .map(|e| e.into_path())
        .collect();

    files.sort();

    debug!(
        "Collected {} video files under {}",
        files.len(),
        root.display()
    );

    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_config(root: &std::path::Path) -> CollectionConfig {
        CollectionConfig {
            root: root.to_path_buf(),
            ..CollectionConfig::default()
        }
    }

    #[test]
    fn test_collects_only_video_extensions() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.mkv"), b"x").unwrap();
        fs::write(temp_dir.path().join("b.mp4"), b"x").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), b"x").unwrap();
        fs::write(temp_dir.path().join("noext"), b"x").unwrap();

        let files = collect_video_files(&test_config(temp_dir.path()));

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| {
            let ext = p.extension().unwrap().to_str().unwrap();
            ext == "mkv" || ext == "mp4"
        }));
    }

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("upper.MKV"), b"x").unwrap();

        let files = collect_video_files(&test_config(temp_dir.path()));
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_recursive_scan() {
        let temp_dir = TempDir::new().unwrap();
        let sub = temp_dir.path().join("season1");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("ep1.mp4"), b"x").unwrap();
        fs::write(temp_dir.path().join("movie.avi"), b"x").unwrap();

        let mut config = test_config(temp_dir.path());
        let files = collect_video_files(&config);
        assert_eq!(files.len(), 2);

        config.recursive = false;
        let files = collect_video_files(&config);
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_missing_root_returns_empty() {
        let config = test_config(std::path::Path::new("/nonexistent/collection"));
        assert!(collect_video_files(&config).is_empty());
    }

    #[test]
    fn test_results_are_sorted() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.mp4"), b"x").unwrap();
        fs::write(temp_dir.path().join("a.mp4"), b"x").unwrap();
        fs::write(temp_dir.path().join("c.mp4"), b"x").unwrap();

        let files = collect_video_files(&test_config(temp_dir.path()));
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }
}
