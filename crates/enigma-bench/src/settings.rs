//! Startup configuration: where the store and the current build live, and
//! which match tool to launch.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{BenchError, Result};

/// Environment variable holding the path to the cutechess-cli executable.
pub const MATCH_TOOL_ENV: &str = "cutechess_cli_binary";

/// Default location of the version store.
pub const DEFAULT_VERSIONS_DIR: &str = "versions";

/// Default location of the current build.
pub const DEFAULT_CURRENT_BUILD: &str = "build/enigma";

/// Immutable settings, built once at startup and passed down by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub versions_dir: PathBuf,
    pub current_build: PathBuf,
    /// Absent for the archiver, or when the environment variable is unset.
    pub match_tool: Option<PathBuf>,
}

impl Settings {
    /// Settings for the match runner, reading the match tool from [`MATCH_TOOL_ENV`].
    ///
    /// An unset or empty variable leaves the tool unconfigured; [`Settings::match_tool`]
    /// reports it when the tool is first needed.
    pub fn load(versions_dir: impl Into<PathBuf>, current_build: impl Into<PathBuf>) -> Self {
        Self {
            versions_dir: versions_dir.into(),
            current_build: current_build.into(),
            match_tool: match_tool_from(std::env::var_os(MATCH_TOOL_ENV)),
        }
    }

    /// Settings with an explicit match tool path.
    pub fn with_match_tool(
        versions_dir: impl Into<PathBuf>,
        current_build: impl Into<PathBuf>,
        match_tool: impl Into<PathBuf>,
    ) -> Self {
        Self {
            versions_dir: versions_dir.into(),
            current_build: current_build.into(),
            match_tool: Some(match_tool.into()),
        }
    }

    /// Settings for the archiver.
    pub fn for_archiver(
        versions_dir: impl Into<PathBuf>,
        current_build: impl Into<PathBuf>,
    ) -> Self {
        Self {
            versions_dir: versions_dir.into(),
            current_build: current_build.into(),
            match_tool: None,
        }
    }

    /// The configured match tool.
    pub fn match_tool(&self) -> Result<&Path> {
        self.match_tool
            .as_deref()
            .ok_or_else(|| BenchError::MissingEnvironment {
                var: MATCH_TOOL_ENV.to_string(),
            })
    }
}

/// Match tool path from the raw variable value. Empty counts as unset.
fn match_tool_from(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|value| !value.is_empty()).map(PathBuf::from)
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_archiver(DEFAULT_VERSIONS_DIR, DEFAULT_CURRENT_BUILD)
    }
}
