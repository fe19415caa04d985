//! Version store: a flat directory of archived engine binaries.
//!
//! Layout: `<dir>/v<N>_<label>`, where `N` is a non-negative integer with no
//! fixed width. Files that do not follow the pattern are ignored, including by
//! prefix lookup.

use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::error::{BenchError, Result};

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^v([0-9]+)_(.+)$").expect("version pattern is valid"))
}

/// A version number of any width, held as decimal digits without leading zeros.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionNumber(String);

impl VersionNumber {
    /// The number of the first version in an empty store.
    pub fn zero() -> Self {
        Self("0".to_string())
    }

    /// Build from ASCII digits. Leading zeros are dropped.
    fn from_digits(digits: &str) -> Self {
        match digits.trim_start_matches('0') {
            "" => Self::zero(),
            trimmed => Self(trimmed.to_string()),
        }
    }

    /// The following number. Never overflows.
    pub fn next(&self) -> Self {
        let mut digits: Vec<u8> = self.0.bytes().collect();
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }

        let mut next = String::with_capacity(digits.len() + 1);
        if carry {
            next.push('1');
        }
        next.extend(digits.into_iter().map(char::from));
        Self(next)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for VersionNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for VersionNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u64> for VersionNumber {
    fn from(number: u64) -> Self {
        Self(number.to_string())
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An archived engine binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedBinary {
    pub version: VersionNumber,
    pub label: String,
    pub path: PathBuf,
}

impl VersionedBinary {
    /// Parse an entry from its path. Returns `None` for names outside the `v<N>_<label>` pattern.
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let caps = version_pattern().captures(name)?;
        let version = VersionNumber::from_digits(&caps[1]);
        let label = caps[2].to_string();
        Some(Self {
            version,
            label,
            path,
        })
    }

    /// The on-disk file name, leading zeros included.
    pub fn file_name(&self) -> String {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => file_name_for(&self.version, &self.label),
        }
    }
}

/// File name for a version number and label.
pub fn file_name_for(version: &VersionNumber, label: &str) -> String {
    format!("v{version}_{label}")
}

/// Read access to the version store directory.
#[derive(Debug, Clone)]
pub struct VersionStore {
    dir: PathBuf,
}

impl VersionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Well-formed entries in directory-listing order. A missing directory is an empty store.
    fn entries(&self) -> Result<Vec<VersionedBinary>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(dir = %self.dir.display(), "Version store does not exist");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(binary) = VersionedBinary::from_path(path) {
                entries.push(binary);
            }
        }
        Ok(entries)
    }

    /// Every entry, sorted by version number.
    pub fn versions(&self) -> Result<Vec<VersionedBinary>> {
        let mut entries = self.entries()?;
        entries.sort_by(|a, b| a.version.cmp(&b.version));
        Ok(entries)
    }

    /// The single entry whose file name starts with `"<prefix>_"`.
    ///
    /// `v1` matches `v1_base` but not `v10_base`, since the separator is part of
    /// the match.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<VersionedBinary> {
        let needle = format!("{prefix}_");
        let mut matches: Vec<VersionedBinary> = self
            .entries()?
            .into_iter()
            .filter(|entry| entry.file_name().starts_with(&needle))
            .collect();

        match matches.len() {
            0 => Err(BenchError::NotFound {
                prefix: prefix.to_string(),
            }),
            1 => Ok(matches.remove(0)),
            _ => {
                let mut names: Vec<String> =
                    matches.iter().map(VersionedBinary::file_name).collect();
                names.sort();
                Err(BenchError::Ambiguous {
                    prefix: prefix.to_string(),
                    matches: names,
                })
            }
        }
    }

    /// The entry with the greatest version number.
    ///
    /// Duplicate numbers only occur in hand-edited stores; the last one in
    /// directory-listing order wins.
    pub fn find_latest(&self) -> Result<VersionedBinary> {
        let mut latest: Option<VersionedBinary> = None;
        for entry in self.entries()? {
            if latest
                .as_ref()
                .map_or(true, |best| entry.version >= best.version)
            {
                latest = Some(entry);
            }
        }

        latest.ok_or_else(|| BenchError::NoVersions {
            dir: self.dir.clone(),
        })
    }

    /// Number the archiver assigns to the next new version.
    pub fn next_version(&self) -> Result<VersionNumber> {
        match self.find_latest() {
            Ok(latest) => Ok(latest.version.next()),
            Err(BenchError::NoVersions { .. }) => Ok(VersionNumber::zero()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store(names: &[&str]) -> (tempfile::TempDir, VersionStore) {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), name.as_bytes()).unwrap();
        }
        let store = VersionStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn parses_version_and_label() {
        let binary = VersionedBinary::from_path(PathBuf::from("versions/v12_null_move")).unwrap();
        assert_eq!(binary.version, VersionNumber::from(12));
        assert_eq!(binary.label, "null_move");
        assert_eq!(binary.file_name(), "v12_null_move");
    }

    #[test]
    fn rejects_malformed_names() {
        for name in ["v_x", "v3_", "x3_y", "v3", "V3_y", "v-1_y", "v٣_y"] {
            assert!(
                VersionedBinary::from_path(PathBuf::from(name)).is_none(),
                "{name} should not parse"
            );
        }
    }

    #[test]
    fn number_ordering_ignores_width_and_leading_zeros() {
        let small = VersionNumber::from_digits("0009");
        let large = VersionNumber::from_digits("10");
        assert_eq!(small, VersionNumber::from(9));
        assert!(small < large);
        assert_eq!(VersionNumber::from_digits("000"), VersionNumber::zero());
        let widest = VersionNumber::from(u64::MAX);
        assert!(VersionNumber::from_digits("99999999999999999999") > widest);
    }

    #[test]
    fn next_number_carries() {
        assert_eq!(VersionNumber::zero().next(), VersionNumber::from(1));
        assert_eq!(VersionNumber::from(199).next(), VersionNumber::from(200));
        assert_eq!(VersionNumber::from(999).next().as_str(), "1000");
        assert_eq!(
            VersionNumber::from(u64::MAX).next().as_str(),
            "18446744073709551616"
        );
    }

    #[test]
    fn latest_is_numeric_maximum() {
        let (_dir, store) = make_store(&["v0_a", "v2_b", "v1_c"]);
        let latest = store.find_latest().unwrap();
        assert_eq!(latest.file_name(), "v2_b");
    }

    #[test]
    fn latest_compares_numbers_not_strings() {
        let (_dir, store) = make_store(&["v9_a", "v10_b"]);
        assert_eq!(
            store.find_latest().unwrap().version,
            VersionNumber::from(10)
        );
    }

    #[test]
    fn latest_ranks_numbers_wider_than_u64() {
        let (_dir, store) = make_store(&["v1_b", "v99999999999999999999999_a"]);
        let latest = store.find_latest().unwrap();
        assert_eq!(latest.file_name(), "v99999999999999999999999_a");
        assert_eq!(
            store.next_version().unwrap().as_str(),
            "100000000000000000000000"
        );
    }

    #[test]
    fn next_version_past_u64_max_does_not_wrap() {
        let (_dir, store) = make_store(&["v18446744073709551615_a"]);
        let next = store.next_version().unwrap();
        assert_eq!(next.as_str(), "18446744073709551616");
        assert_ne!(next, VersionNumber::zero());
    }

    #[test]
    fn leading_zeros_keep_their_file_name() {
        let (_dir, store) = make_store(&["v007_bond", "v6_x"]);
        let latest = store.find_latest().unwrap();
        assert_eq!(latest.version, VersionNumber::from(7));
        assert_eq!(latest.file_name(), "v007_bond");
        assert_eq!(store.next_version().unwrap(), VersionNumber::from(8));
    }

    #[test]
    fn latest_ignores_foreign_files() {
        let (dir, store) = make_store(&["v3_a", "notes.txt", "v99"]);
        fs::create_dir(dir.path().join("v100_dir")).unwrap();
        assert_eq!(store.find_latest().unwrap().file_name(), "v3_a");
    }

    #[test]
    fn empty_store_has_nothing() {
        let (_dir, store) = make_store(&[]);
        assert!(matches!(
            store.find_latest(),
            Err(BenchError::NoVersions { .. })
        ));
        assert!(matches!(
            store.find_by_prefix("v0"),
            Err(BenchError::NotFound { .. })
        ));
        assert_eq!(store.next_version().unwrap(), VersionNumber::zero());
    }

    #[test]
    fn missing_directory_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = VersionStore::new(dir.path().join("versions"));
        assert!(store.versions().unwrap().is_empty());
        assert!(matches!(
            store.find_latest(),
            Err(BenchError::NoVersions { .. })
        ));
        assert!(matches!(
            store.find_by_prefix("v1"),
            Err(BenchError::NotFound { .. })
        ));
    }

    #[test]
    fn prefix_finds_unique_entry() {
        let (_dir, store) = make_store(&["v0_a", "v3_tempo", "v1_c"]);
        let found = store.find_by_prefix("v3").unwrap();
        assert_eq!(found.file_name(), "v3_tempo");
        assert_eq!(found.version, VersionNumber::from(3));
        assert!(found.path.ends_with("v3_tempo"));
    }

    #[test]
    fn prefix_stops_at_separator() {
        let (_dir, store) = make_store(&["v1_c", "v10_d"]);
        assert_eq!(store.find_by_prefix("v1").unwrap().file_name(), "v1_c");
        assert_eq!(store.find_by_prefix("v10").unwrap().file_name(), "v10_d");
    }

    #[test]
    fn prefix_only_sees_versioned_files() {
        let (dir, store) = make_store(&["old_x", "v1_", "v2_b"]);
        fs::create_dir(dir.path().join("v3_dir")).unwrap();
        for prefix in ["old", "v1", "v3"] {
            assert!(
                matches!(
                    store.find_by_prefix(prefix),
                    Err(BenchError::NotFound { .. })
                ),
                "{prefix} should not resolve"
            );
        }
        assert_eq!(store.find_by_prefix("v2").unwrap().file_name(), "v2_b");
    }

    #[test]
    fn duplicate_numbers_are_ambiguous() {
        let (_dir, store) = make_store(&["v1_c", "v1_d", "v2_e"]);
        match store.find_by_prefix("v1") {
            Err(BenchError::Ambiguous { prefix, matches }) => {
                assert_eq!(prefix, "v1");
                assert_eq!(matches, vec!["v1_c".to_string(), "v1_d".to_string()]);
            }
            other => panic!("expected Ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn unknown_prefix_is_not_found() {
        let (_dir, store) = make_store(&["v1_c"]);
        match store.find_by_prefix("v7") {
            Err(BenchError::NotFound { prefix }) => assert_eq!(prefix, "v7"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn versions_are_sorted_and_next_follows_latest() {
        let (_dir, store) = make_store(&["v4_d", "v0_a", "v2_b"]);
        let numbers: Vec<String> = store
            .versions()
            .unwrap()
            .iter()
            .map(|v| v.version.to_string())
            .collect();
        assert_eq!(numbers, vec!["0", "2", "4"]);
        assert_eq!(store.next_version().unwrap(), VersionNumber::from(5));
    }
}
