//! Decides which two binaries play a match.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{BenchError, Result};
use crate::store::{VersionStore, VersionedBinary};

/// Display name of the current build.
pub const CURRENT_NAME: &str = "current";

/// One side of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRef {
    /// Absolute path to the engine executable.
    pub path: PathBuf,
    pub display_name: String,
}

impl EngineRef {
    /// The current build, named `current`.
    pub fn current(current_build: &Path) -> Result<Self> {
        let path = current_build.canonicalize().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BenchError::MissingBuild {
                    path: current_build.to_path_buf(),
                }
            } else {
                BenchError::Io(e)
            }
        })?;
        Ok(Self {
            path,
            display_name: CURRENT_NAME.to_string(),
        })
    }

    /// An archived version, named after its file.
    pub fn archived(binary: &VersionedBinary) -> Result<Self> {
        Ok(Self {
            path: binary.path.canonicalize()?,
            display_name: binary.file_name(),
        })
    }
}

impl fmt::Display for EngineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.path.display())
    }
}

/// The two participants, in command-line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnginePair {
    pub a: EngineRef,
    pub b: EngineRef,
}

/// Resolve the engines for a match from up to two version tokens.
///
/// - no tokens: current build vs latest version
/// - one token: current build vs the version matching it
/// - two tokens: each side by its own token
pub fn resolve_engines(
    store: &VersionStore,
    current_build: &Path,
    engine_a: Option<&str>,
    engine_b: Option<&str>,
) -> Result<EnginePair> {
    let pair = match (engine_a, engine_b) {
        (None, None) => EnginePair {
            a: EngineRef::current(current_build)?,
            b: EngineRef::archived(&store.find_latest()?)?,
        },
        (Some(token), None) | (None, Some(token)) => EnginePair {
            a: EngineRef::current(current_build)?,
            b: EngineRef::archived(&store.find_by_prefix(token)?)?,
        },
        (Some(token_a), Some(token_b)) => EnginePair {
            a: EngineRef::archived(&store.find_by_prefix(token_a)?)?,
            b: EngineRef::archived(&store.find_by_prefix(token_b)?)?,
        },
    };

    debug!(engine_a = %pair.a, engine_b = %pair.b, "Resolved engines");
    Ok(pair)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct Fixture {
        _dir: tempfile::TempDir,
        store: VersionStore,
        build: PathBuf,
    }

    fn fixture(names: &[&str]) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let versions = dir.path().join("versions");
        fs::create_dir(&versions).unwrap();
        for name in names {
            fs::write(versions.join(name), b"engine").unwrap();
        }
        let build_dir = dir.path().join("build");
        fs::create_dir(&build_dir).unwrap();
        let build = build_dir.join("enigma");
        fs::write(&build, b"current").unwrap();
        Fixture {
            store: VersionStore::new(versions),
            build,
            _dir: dir,
        }
    }

    #[test]
    fn no_tokens_is_current_vs_latest() {
        let f = fixture(&["v0_a", "v2_b", "v1_c"]);
        let pair = resolve_engines(&f.store, &f.build, None, None).unwrap();
        assert_eq!(pair.a.display_name, "current");
        assert_eq!(pair.a.path, f.build.canonicalize().unwrap());
        assert_eq!(pair.b.display_name, "v2_b");
        assert!(pair.b.path.is_absolute());
    }

    #[test]
    fn one_token_is_current_vs_prefix() {
        let f = fixture(&["v3_eval", "v4_search"]);
        let pair = resolve_engines(&f.store, &f.build, Some("v3"), None).unwrap();
        assert_eq!(pair.a.display_name, "current");
        assert_eq!(pair.b.display_name, "v3_eval");
    }

    #[test]
    fn two_tokens_resolve_independently() {
        let f = fixture(&["v3_eval", "v4_search", "v5_tt"]);
        let pair = resolve_engines(&f.store, &f.build, Some("v5"), Some("v3")).unwrap();
        assert_eq!(pair.a.display_name, "v5_tt");
        assert_eq!(pair.b.display_name, "v3_eval");
    }

    #[test]
    fn empty_store_fails_without_tokens() {
        let f = fixture(&[]);
        let err = resolve_engines(&f.store, &f.build, None, None).unwrap_err();
        assert!(matches!(err, BenchError::NoVersions { .. }));
    }

    #[test]
    fn unknown_token_fails() {
        let f = fixture(&["v3_eval"]);
        let err = resolve_engines(&f.store, &f.build, Some("v3"), Some("v8")).unwrap_err();
        assert!(matches!(err, BenchError::NotFound { ref prefix } if prefix == "v8"));
    }

    #[test]
    fn missing_current_build_is_reported() {
        let f = fixture(&["v3_eval"]);
        fs::remove_file(&f.build).unwrap();
        let err = resolve_engines(&f.store, &f.build, None, None).unwrap_err();
        assert!(matches!(err, BenchError::MissingBuild { .. }));
    }

    #[test]
    fn two_tokens_do_not_need_current_build() {
        let f = fixture(&["v3_eval", "v4_search"]);
        fs::remove_file(&f.build).unwrap();
        let pair = resolve_engines(&f.store, &f.build, Some("v3"), Some("v4")).unwrap();
        assert_eq!(pair.a.display_name, "v3_eval");
    }
}
