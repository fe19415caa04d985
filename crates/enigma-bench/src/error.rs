//! Error taxonomy for the bench tooling.

use std::path::PathBuf;

/// Errors produced while resolving versions, building match commands or archiving builds.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("no binary found for version \"{prefix}\"")]
    NotFound { prefix: String },

    #[error("no versions found in {}", .dir.display())]
    NoVersions { dir: PathBuf },

    #[error(
        "multiple binaries found for version \"{prefix}\": {}",
        .matches.join(", ")
    )]
    Ambiguous { prefix: String, matches: Vec<String> },

    #[error("{} cannot be combined with --{mode}", .flags.join(", "))]
    ConflictingArguments { mode: String, flags: Vec<String> },

    #[error("no existing version to overwrite in {}", .dir.display())]
    NothingToOverwrite { dir: PathBuf },

    #[error("environment variable {var} is not set")]
    MissingEnvironment { var: String },

    #[error("invalid version label \"{label}\": labels must be a single path component")]
    InvalidLabel { label: String },

    #[error("current build not found at {}", .path.display())]
    MissingBuild { path: PathBuf },

    #[error("match tool exited with status {code}")]
    ExternalToolFailure { code: i32 },

    #[error("match tool was terminated by a signal")]
    TerminatedBySignal,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BenchError {
    /// Process exit code for this error.
    ///
    /// The match tool's own status is passed through; everything else is `1`.
    pub fn exit_code(&self) -> u8 {
        match self {
            BenchError::ExternalToolFailure { code } => u8::try_from(*code)
                .ok()
                .filter(|code| *code != 0)
                .unwrap_or(1),
            _ => 1,
        }
    }
}

/// Result type for bench operations.
pub type Result<T> = std::result::Result<T, BenchError>;
