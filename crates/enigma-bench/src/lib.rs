//! Enigma bench tooling
//!
//! Library behind the `run-match` and `save-version` binaries:
//!
//! - [`store`]: archived engine binaries named `v<N>_<label>`
//! - [`resolver`]: picks the two engines for a match
//! - [`preset`]: named match configurations and custom overrides
//! - [`command`]: cutechess-cli argument construction
//! - [`driver`]: summary, confirmation and match-tool execution
//! - [`archiver`]: copies the current build into the store

pub mod archiver;
pub mod command;
pub mod driver;
pub mod error;
pub mod preset;
pub mod resolver;
pub mod settings;
pub mod store;
pub mod telemetry;

pub use archiver::{archive_current_build, ArchiveOutcome};
pub use command::MatchCommand;
pub use driver::{confirm, drive, plan_match, render_summary, run_match_tool, MatchPlan, Outcome};
pub use error::{BenchError, Result};
pub use preset::{
    select_configuration, CustomOverrides, DrawRule, Preset, ResignRule, SprtBounds,
    TestConfiguration, TestMode, TimeControl,
};
pub use resolver::{resolve_engines, EnginePair, EngineRef};
pub use settings::Settings;
pub use store::{VersionNumber, VersionStore, VersionedBinary};
pub use telemetry::init_tracing;
