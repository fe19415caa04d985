//! Preset catalog and test configuration.
//!
//! Each optional group of match-tool options is an `Option` so that an unset
//! group is never confused with a zero-valued one.

use std::fmt;

use serde::Serialize;

use crate::error::{BenchError, Result};

/// Custom-mode default base time, in seconds.
pub const DEFAULT_TIME_SECS: u32 = 10;
/// Custom-mode default increment, in seconds.
pub const DEFAULT_INCREMENT_SECS: u32 = 0;
/// Custom-mode default game count.
pub const DEFAULT_GAMES: u32 = 100;
/// Custom-mode default number of concurrent games.
pub const DEFAULT_CONCURRENCY: u32 = 8;
/// Custom-mode default time margin, in milliseconds.
pub const DEFAULT_TIME_MARGIN_MS: u32 = 50;

/// Base time plus per-move increment, both in whole seconds.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct TimeControl {
    pub base_secs: u32,
    pub increment_secs: u32,
}

impl TimeControl {
    pub const fn new(base_secs: u32, increment_secs: u32) -> Self {
        Self {
            base_secs,
            increment_secs,
        }
    }
}

impl fmt::Display for TimeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.base_secs, self.increment_secs)
    }
}

/// Draw adjudication: once past `move_number`, a game is drawn after
/// `move_count` consecutive moves with both scores within `score` centipawns.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DrawRule {
    pub move_number: u32,
    pub move_count: u32,
    pub score: u32,
}

/// Resign adjudication: a side loses after `move_count` consecutive moves
/// with a score of at least `score` centipawns against it.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ResignRule {
    pub move_count: u32,
    pub score: u32,
}

/// Sequential probability ratio test bounds.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SprtBounds {
    pub elo0: f64,
    pub elo1: f64,
    pub alpha: f64,
    pub beta: f64,
}

/// Fully resolved options for one match run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TestConfiguration {
    pub time_control: TimeControl,
    pub time_margin_ms: Option<u32>,
    pub draw: Option<DrawRule>,
    pub resign: Option<ResignRule>,
    pub sprt: Option<SprtBounds>,
    pub games: u32,
    /// Play each opening twice with colours reversed.
    pub repeat: bool,
    pub concurrency: Option<u32>,
    /// Ask the match tool for its own debug output.
    pub debug: bool,
}

const DRAW: DrawRule = DrawRule {
    move_number: 40,
    move_count: 8,
    score: 10,
};

const RESIGN: ResignRule = ResignRule {
    move_count: 3,
    score: 600,
};

/// Named, fixed configurations.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Long time control with tight SPRT bounds.
    Confident,
    /// Short time control with loose SPRT bounds.
    Fast,
    /// Few quick games to catch crashes and gross regressions.
    Smoke,
    /// Two slow games with the match tool's debug output.
    Debug,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Confident,
        Preset::Fast,
        Preset::Smoke,
        Preset::Debug,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Confident => "confident",
            Preset::Fast => "fast",
            Preset::Smoke => "smoke",
            Preset::Debug => "debug",
        }
    }

    pub fn configuration(&self) -> TestConfiguration {
        match self {
            Preset::Confident => TestConfiguration {
                time_control: TimeControl::new(60, 1),
                time_margin_ms: Some(100),
                draw: Some(DRAW),
                resign: Some(RESIGN),
                sprt: Some(SprtBounds {
                    elo0: 0.0,
                    elo1: 5.0,
                    alpha: 0.05,
                    beta: 0.05,
                }),
                games: 20_000,
                repeat: true,
                concurrency: Some(8),
                debug: false,
            },
            Preset::Fast => TestConfiguration {
                time_control: TimeControl::new(10, 0),
                time_margin_ms: Some(50),
                draw: Some(DRAW),
                resign: Some(RESIGN),
                sprt: Some(SprtBounds {
                    elo0: 0.0,
                    elo1: 10.0,
                    alpha: 0.1,
                    beta: 0.1,
                }),
                games: 5_000,
                repeat: true,
                concurrency: Some(8),
                debug: false,
            },
            Preset::Smoke => TestConfiguration {
                time_control: TimeControl::new(5, 0),
                time_margin_ms: Some(50),
                draw: Some(DRAW),
                resign: Some(RESIGN),
                sprt: None,
                games: 200,
                repeat: true,
                concurrency: Some(8),
                debug: false,
            },
            Preset::Debug => TestConfiguration {
                time_control: TimeControl::new(60, 0),
                time_margin_ms: None,
                draw: None,
                resign: None,
                sprt: None,
                games: 2,
                repeat: false,
                concurrency: None,
                debug: true,
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The selected test mode. Exactly one per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestMode {
    Preset(Preset),
    Custom,
}

impl TestMode {
    pub fn name(&self) -> &'static str {
        match self {
            TestMode::Preset(preset) => preset.name(),
            TestMode::Custom => "custom",
        }
    }
}

/// Explicit values for custom mode; unset fields take the documented defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomOverrides {
    pub time_secs: Option<u32>,
    pub increment_secs: Option<u32>,
    pub games: Option<u32>,
    pub concurrency: Option<u32>,
    pub time_margin_ms: Option<u32>,
}

impl CustomOverrides {
    /// Long flag names of every supplied override, in CLI order.
    pub fn supplied_flags(&self) -> Vec<String> {
        [
            ("--time", self.time_secs.is_some()),
            ("--increment", self.increment_secs.is_some()),
            ("--games", self.games.is_some()),
            ("--concurrency", self.concurrency.is_some()),
            ("--timemargin", self.time_margin_ms.is_some()),
        ]
        .into_iter()
        .filter(|(_, supplied)| *supplied)
        .map(|(flag, _)| flag.to_string())
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.supplied_flags().is_empty()
    }

    fn configuration(&self) -> TestConfiguration {
        TestConfiguration {
            time_control: TimeControl::new(
                self.time_secs.unwrap_or(DEFAULT_TIME_SECS),
                self.increment_secs.unwrap_or(DEFAULT_INCREMENT_SECS),
            ),
            time_margin_ms: Some(self.time_margin_ms.unwrap_or(DEFAULT_TIME_MARGIN_MS)),
            draw: None,
            resign: None,
            sprt: None,
            games: self.games.unwrap_or(DEFAULT_GAMES),
            repeat: true,
            concurrency: Some(self.concurrency.unwrap_or(DEFAULT_CONCURRENCY)),
            debug: false,
        }
    }
}

/// Build the configuration for `mode`.
///
/// Overrides are only accepted in custom mode; combining them with a preset
/// fails with [`BenchError::ConflictingArguments`].
pub fn select_configuration(
    mode: TestMode,
    overrides: &CustomOverrides,
) -> Result<TestConfiguration> {
    match mode {
        TestMode::Custom => Ok(overrides.configuration()),
        TestMode::Preset(preset) => {
            let flags = overrides.supplied_flags();
            if !flags.is_empty() {
                return Err(BenchError::ConflictingArguments {
                    mode: preset.name().to_string(),
                    flags,
                });
            }
            Ok(preset.configuration())
        }
    }
}
