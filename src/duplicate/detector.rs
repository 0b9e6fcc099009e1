//! Duplicate detection by perceptual-hash proximity
//!
//! Clusters files whose fingerprints lie within a bit-distance threshold
//! of each other, using a greedy single pass over the candidates in
//! sorted path order (a fixed enumeration, so results are deterministic
//! across runs). Comparison count is O(n^2) over the candidate set; fine
//! for collections in the low thousands, and kept explicit since no
//! indexing structure narrows the pairings.
//!
//! A fingerprint that fails hex-decoding is incomparable: its distance to
//! anything is undefined and it is never merged, ending up in a singleton
//! cluster. This replaces the historical distance-0 fallback, which
//! silently grouped unhashed files with everything they were compared to.

use log::{debug, warn};
use std::collections::{BTreeMap, HashSet};

/// Bit-distance between two hex-encoded fingerprints.
///
/// The values are decoded to bytes (the shorter one zero-extended on the
/// left), XORed, and the differing bits counted. Returns `None` when
/// either value is not valid hex.
pub fn hamming_distance(a: &str, b: &str) -> Option<u32> {
    let mut a = decode_hex(a)?;
    let mut b = decode_hex(b)?;

    // Zero-extend the shorter value so both have the same bit-length
    while a.len() < b.len() {
        a.insert(0, 0);
    }
    while b.len() < a.len() {
        b.insert(0, 0);
    }

    Some(
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x ^ y).count_ones())
            .sum(),
    )
}

/// Decode a hex string to bytes, tolerating an odd number of digits
fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.is_empty() {
        return None;
    }

    let padded = if s.len() % 2 == 0 {
        s.to_string()
    } else {
        format!("0{}", s)
    };

    padded
        .as_bytes()
        .chunks(2)
        .map(|chunk| {
            let hex = std::str::from_utf8(chunk).ok()?;
            u8::from_str_radix(hex, 16).ok()
        })
        .collect()
}

/// Cluster files whose pairwise fingerprint distance is strictly below
/// `threshold`.
///
/// Input is the perceptual sub-mapping of the index (path -> hex
/// fingerprint). Every input path appears in the result, mapped to its
/// full cluster including itself; files that match nothing map to a
/// singleton. With `threshold` 0 no pair can merge.
pub fn find_duplicates(
    fingerprints: &BTreeMap<String, String>,
    threshold: u32,
) -> BTreeMap<String, Vec<String>> {
    let paths: Vec<&String> = fingerprints.keys().collect();
    let mut absorbed: HashSet<usize> = HashSet::new();
    let mut clusters: Vec<Vec<usize>> = Vec::new();

    for i in 0..paths.len() {
        if absorbed.contains(&i) {
            continue;
        }

        let mut cluster = vec![i];
        let fingerprint = &fingerprints[paths[i]];

        if decode_hex(fingerprint).is_none() {
            warn!(
                "Fingerprint of {} is not valid hex; excluding it from matching",
                paths[i]
            );
            clusters.push(cluster);
            continue;
        }

        for j in (i + 1)..paths.len() {
            if absorbed.contains(&j) {
                continue;
            }

            match hamming_distance(fingerprint, &fingerprints[paths[j]]) {
                Some(distance) if distance < threshold => {
                    debug!(
                        "{} and {} are {} bit(s) apart",
                        paths[i], paths[j], distance
                    );
                    cluster.push(j);
                    absorbed.insert(j);
                }
                _ => {}
            }
        }

        clusters.push(cluster);
    }

    let mut result = BTreeMap::new();
    for cluster in clusters {
        let members: Vec<String> = cluster.iter().map(|&idx| paths[idx].clone()).collect();
        for &idx in &cluster {
            result.insert(paths[idx].clone(), members.clone());
        }
    }

    result
}

/// The cluster a single file belongs to, or empty when the file holds no
/// fingerprint.
#[allow(dead_code)]
pub fn duplicates_for_file(
    fingerprints: &BTreeMap<String, String>,
    path: &str,
    threshold: u32,
) -> Vec<String> {
    find_duplicates(fingerprints, threshold)
        .remove(path)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprints(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(path, fp)| (path.to_string(), fp.to_string()))
            .collect()
    }

    #[test]
    fn test_distance_identical_is_zero() {
        for fp in ["0", "ff", "deadbeef", "0123456789abcdef"] {
            assert_eq!(hamming_distance(fp, fp), Some(0));
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [("deadbeef", "deadbee0"), ("00", "ff"), ("0f", "f0")];
        for (a, b) in pairs {
            assert_eq!(hamming_distance(a, b), hamming_distance(b, a));
        }
    }

    #[test]
    fn test_distance_counts_bits() {
        assert_eq!(hamming_distance("00", "01"), Some(1));
        assert_eq!(hamming_distance("00", "03"), Some(2));
        assert_eq!(hamming_distance("00", "ff"), Some(8));
        assert_eq!(hamming_distance("0f", "f0"), Some(8));
    }

    #[test]
    fn test_distance_zero_extends_shorter_value() {
        // "ff" against "0ff" is the same value
        assert_eq!(hamming_distance("ff", "0ff"), Some(0));
        assert_eq!(hamming_distance("1", "0"), Some(1));
    }

    #[test]
    fn test_distance_rejects_invalid_hex() {
        assert_eq!(hamming_distance("xyz", "00"), None);
        assert_eq!(hamming_distance("00", ""), None);
    }

    #[test]
    fn test_threshold_zero_yields_singletons() {
        let fps = fingerprints(&[("a", "00"), ("b", "00"), ("c", "ff")]);
        let clusters = find_duplicates(&fps, 0);

        assert_eq!(clusters.len(), 3);
        for (path, cluster) in &clusters {
            assert_eq!(cluster, &vec![path.clone()]);
        }
    }

    #[test]
    fn test_huge_threshold_collapses_everything() {
        let fps = fingerprints(&[
            ("a", "0000000000000000"),
            ("b", "ffffffffffffffff"),
            ("c", "00000000ffffffff"),
        ]);
        // 65 exceeds the 64-bit fingerprint length
        let clusters = find_duplicates(&fps, 65);

        let expected: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        for path in ["a", "b", "c"] {
            assert_eq!(clusters[path], expected);
        }
    }

    #[test]
    fn test_every_path_maps_to_cluster_containing_itself() {
        let fps = fingerprints(&[("a", "00"), ("b", "01"), ("z", "f0")]);
        let clusters = find_duplicates(&fps, 2);

        assert_eq!(clusters.len(), 3);
        for (path, cluster) in &clusters {
            assert!(cluster.contains(path));
        }
    }

    #[test]
    fn test_greedy_absorption() {
        // a-b and a-c are within the threshold; b-c is not. The greedy
        // pass still puts all three into a's cluster.
        let fps = fingerprints(&[("a", "00"), ("b", "01"), ("c", "02")]);
        let clusters = find_duplicates(&fps, 2);

        let expected: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        assert_eq!(clusters["a"], expected);
        assert_eq!(clusters["b"], expected);
        assert_eq!(clusters["c"], expected);
    }

    #[test]
    fn test_invalid_fingerprint_stays_singleton() {
        let fps = fingerprints(&[("a", "00"), ("bad", "not-hex"), ("c", "01")]);
        let clusters = find_duplicates(&fps, 8);

        assert_eq!(clusters["bad"], vec!["bad".to_string()]);
        assert_eq!(clusters["a"].len(), 2);
        assert!(clusters["a"].contains(&"c".to_string()));
    }

    #[test]
    fn test_duplicates_for_file() {
        let fps = fingerprints(&[("a", "00"), ("b", "01"), ("z", "f0")]);

        let cluster = duplicates_for_file(&fps, "a", 2);
        assert_eq!(cluster, vec!["a".to_string(), "b".to_string()]);

        assert!(duplicates_for_file(&fps, "unknown", 2).is_empty());
    }
}
