//! Perceptual hashing
//!
//! Derives a 64-bit fingerprint from a video by sampling frames at a fixed
//! time interval with ffmpeg, computing a mean-luminance hash over an 8x8
//! downscale of each frame, and folding the per-frame hashes into one
//! value by per-bit majority vote. The fingerprint is rendered as 16
//! lowercase hex digits and compared by bit-distance, so minor re-encodes
//! of the same material land within a few bits of each other.
//!
//! Frames are written into a per-file scratch directory created with
//! [`tempfile::TempDir`], which is removed when the value is dropped on
//! every exit path.

use crate::core::error::{OrganizerError, Result};
use image::imageops::FilterType;
use image::DynamicImage;
use log::{error, warn};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Edge length of the downscaled frame used for the per-frame hash
const HASH_SIZE: u32 = 8;

/// Computes perceptual fingerprints for video files
#[derive(Debug, Clone)]
pub struct PerceptualHasher {
    /// Seconds between sampled frames
    frame_interval: f64,
}

impl PerceptualHasher {
    /// Create a hasher sampling one frame every `frame_interval` seconds.
    ///
    /// Intervals below 0.1s are clamped to keep frame counts bounded.
    pub fn new(frame_interval: f64) -> Self {
        Self {
            frame_interval: frame_interval.max(0.1),
        }
    }

    /// Hash function for the hashing engine: logs failures and yields no
    /// value, so one broken file never aborts a batch.
    pub fn hash_fn(&self, path: &Path) -> Option<String> {
        match self.compute(path) {
            Ok(hash) => Some(hash),
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }

    /// Compute the fingerprint of a single video file
    pub fn compute(&self, path: &Path) -> Result<String> {
        // Scratch directory is scoped to this computation; the TempDir
        // guard deletes it on success and on every early return.
        let scratch = tempfile::Builder::new()
            .prefix("video-organizer-frames-")
            .tempdir()
            .map_err(|e| OrganizerError::IoError(format!("Failed to create scratch dir: {}", e)))?;

        self.extract_frames(path, scratch.path())?;

        let frames = collect_frames(scratch.path())?;
        if frames.is_empty() {
            return Err(OrganizerError::HashError {
                path: path.to_path_buf(),
                message: "ffmpeg produced no frames".to_string(),
            });
        }

        let mut frame_hashes = Vec::with_capacity(frames.len());
        for frame in &frames {
            match image::open(frame) {
                Ok(img) => frame_hashes.push(average_hash(&img)),
                Err(e) => warn!("Skipping undecodable frame {}: {}", frame.display(), e),
            }
        }

        if frame_hashes.is_empty() {
            return Err(OrganizerError::HashError {
                path: path.to_path_buf(),
                message: "No sampled frame could be decoded".to_string(),
            });
        }

        Ok(format!("{:016x}", majority_fold(&frame_hashes)))
    }

    /// Run ffmpeg to sample frames into the scratch directory
    fn extract_frames(&self, video: &Path, scratch: &Path) -> Result<()> {
        let pattern = scratch.join("frame_%05d.jpg");

        let output = Command::new("ffmpeg")
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(video)
            .arg("-vf")
            .arg(format!("fps={}", 1.0 / self.frame_interval))
            .arg("-f")
            .arg("image2")
            .arg(&pattern)
            .output()
            .map_err(|e| {
                OrganizerError::ToolError(format!("Failed to run ffmpeg (is it on PATH?): {}", e))
            })?;

        if !output.status.success() {
            return Err(OrganizerError::HashError {
                path: video.to_path_buf(),
                message: format!(
                    "ffmpeg exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(())
    }
}

/// List the sampled frame files in deterministic order
fn collect_frames(scratch: &Path) -> Result<Vec<PathBuf>> {
    let mut frames: Vec<PathBuf> = std::fs::read_dir(scratch)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().map(|e| e == "jpg").unwrap_or(false))
        .collect();
    frames.sort();
    Ok(frames)
}

/// 64-bit mean-luminance hash of one frame.
///
/// The frame is downscaled to 8x8 grayscale; each bit is set when the
/// pixel's luminance exceeds the frame mean. Bits are ordered row-major,
/// most significant bit first.
pub fn average_hash(img: &DynamicImage) -> u64 {
    let small = img
        .resize_exact(HASH_SIZE, HASH_SIZE, FilterType::Triangle)
        .to_luma8();

    let sum: u64 = small.pixels().map(|p| u64::from(p.0[0])).sum();
    let mean = sum as f64 / f64::from(HASH_SIZE * HASH_SIZE);

    let mut hash = 0u64;
    for (idx, pixel) in small.pixels().enumerate() {
        if f64::from(pixel.0[0]) > mean {
            hash |= 1 << (63 - idx);
        }
    }
    hash
}

/// Fold per-frame hashes into one value by per-bit majority vote.
///
/// A bit is set in the result when it is set in at least half of the
/// frame hashes (ties round up).
pub fn majority_fold(hashes: &[u64]) -> u64 {
    let mut folded = 0u64;
    for bit in 0..64 {
        let set = hashes.iter().filter(|h| *h & (1 << bit) != 0).count();
        if set * 2 >= hashes.len() {
            folded |= 1 << bit;
        }
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn gray_image<F: Fn(u32, u32) -> u8>(width: u32, height: u32, f: F) -> DynamicImage {
        let mut img = GrayImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                img.put_pixel(x, y, Luma([f(x, y)]));
            }
        }
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn test_average_hash_uniform_image_is_zero() {
        // No pixel exceeds the mean of a flat image
        let img = gray_image(8, 8, |_, _| 128);
        assert_eq!(average_hash(&img), 0);
    }

    #[test]
    fn test_average_hash_half_split() {
        // Left half black, right half white: exactly the white bits set
        let img = gray_image(8, 8, |x, _| if x < 4 { 0 } else { 255 });
        assert_eq!(average_hash(&img), 0x0f0f_0f0f_0f0f_0f0f);
    }

    #[test]
    fn test_average_hash_is_stable_under_scaling() {
        let small = gray_image(8, 8, |x, _| if x < 4 { 0 } else { 255 });
        let large = gray_image(64, 64, |x, _| if x < 32 { 0 } else { 255 });
        assert_eq!(average_hash(&small), average_hash(&large));
    }

    #[test]
    fn test_majority_fold_single_hash() {
        assert_eq!(majority_fold(&[0xdead_beef_0000_ffff]), 0xdead_beef_0000_ffff);
    }

    #[test]
    fn test_majority_fold_majority_wins() {
        assert_eq!(majority_fold(&[0xff, 0xff, 0x00]), 0xff);
        assert_eq!(majority_fold(&[0xff, 0x00, 0x00]), 0x00);
    }

    #[test]
    fn test_majority_fold_ties_round_up() {
        assert_eq!(majority_fold(&[0xf0, 0x0f]), 0xff);
    }

    #[test]
    fn test_fingerprint_format() {
        assert_eq!(format!("{:016x}", 0u64), "0000000000000000");
        assert_eq!(format!("{:016x}", u64::MAX), "ffffffffffffffff");
    }

    #[test]
    fn test_interval_clamped() {
        let hasher = PerceptualHasher::new(0.0);
        assert!((hasher.frame_interval - 0.1).abs() < f64::EPSILON);
    }
}
