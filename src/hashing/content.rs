//! Content hashing
//!
//! Computes a SHA-256 digest by streaming the file in fixed-size chunks,
//! so memory stays bounded for arbitrarily large files. The result is
//! independent of chunk boundaries.

use crate::core::error::{OrganizerError, Result};
use log::error;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Buffer size for streaming hash computation (64KB)
const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Compute the SHA-256 content hash of a file as a lowercase hex string
pub fn compute_content_hash(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| OrganizerError::HashError {
        path: path.to_path_buf(),
        message: format!("Failed to open file: {}", e),
    })?;

    let mut reader = BufReader::with_capacity(HASH_BUFFER_SIZE, file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; HASH_BUFFER_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| OrganizerError::HashError {
            path: path.to_path_buf(),
            message: format!("Failed to read file: {}", e),
        })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    let result = hasher.finalize();
    Ok(result.iter().map(|b| format!("{:02x}", b)).collect())
}

/// Hash function for the hashing engine: logs failures and yields no value,
/// so one unreadable file never aborts a batch.
pub fn content_hash_fn(path: &Path) -> Option<String> {
    match compute_content_hash(path) {
        Ok(hash) => Some(hash),
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_hash_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.mkv");
        fs::write(&file_path, b"Hello, World!").unwrap();

        let hash = compute_content_hash(&file_path).unwrap();
        let hash2 = compute_content_hash(&file_path).unwrap();
        assert_eq!(hash, hash2);

        // 64 lowercase hex characters for SHA-256
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash.to_lowercase());
    }

    #[test]
    fn test_known_digest() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("empty.mkv");
        fs::write(&file_path, b"").unwrap();

        // SHA-256 of the empty input
        assert_eq!(
            compute_content_hash(&file_path).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_identical_content_same_hash() {
        let temp_dir = TempDir::new().unwrap();
        let file1 = temp_dir.path().join("file1.mkv");
        let file2 = temp_dir.path().join("file2.mkv");
        fs::write(&file1, b"Identical content").unwrap();
        fs::write(&file2, b"Identical content").unwrap();

        assert_eq!(
            compute_content_hash(&file1).unwrap(),
            compute_content_hash(&file2).unwrap()
        );
    }

    #[test]
    fn test_chunk_boundaries_do_not_matter() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("large.mkv");

        // Spans multiple read buffers with a partial final chunk
        let data = vec![0xABu8; HASH_BUFFER_SIZE * 2 + 17];
        fs::write(&file_path, &data).unwrap();

        let hash = compute_content_hash(&file_path).unwrap();

        let mut hasher = Sha256::new();
        hasher.update(&data);
        let expected: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();

        assert_eq!(hash, expected);
    }

    #[test]
    fn test_missing_file_yields_no_value() {
        assert!(content_hash_fn(Path::new("/nonexistent/file.mkv")).is_none());
    }
}
