//! Plays two Enigma builds against each other with cutechess-cli.
//!
//! ## Engines
//!
//! - no versions: current build vs the latest archived version
//! - one version: current build vs that version
//! - two versions: the two archived versions
//!
//! ## Modes
//!
//! `--confident`, `--fast`, `--smoke` and `--debug` select a preset. Without a
//! preset (or with `--custom`) the match uses `-t/-i/-g/-c/-m`, falling back to
//! `10+0`, 100 games, concurrency 8 and a 50ms time margin.

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use tracing::debug;

use enigma_bench::{drive, plan_match, CustomOverrides, Outcome, Preset, Settings, TestMode};
use enigma_bench_cli::{parse_or_exit, report, CommonArgs};

#[derive(Parser, Debug)]
#[command(name = "run-match")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Uses cutechess-cli to play two versions of the engine against each other",
    long_about = None
)]
#[command(group(
    ArgGroup::new("mode")
        .args(["confident", "fast", "smoke", "debug", "custom"])
        .multiple(false)
))]
struct Cli {
    /// Engine A version (e.g. v1); alone, it plays against the current build
    engine_a_version: Option<String>,

    /// Engine B version (e.g. v2)
    engine_b_version: Option<String>,

    /// Long time control with tight SPRT bounds
    #[arg(long)]
    confident: bool,

    /// Short time control with loose SPRT bounds
    #[arg(long)]
    fast: bool,

    /// A couple hundred quick games to catch crashes
    #[arg(long)]
    smoke: bool,

    /// Two slow games with cutechess-cli debug output
    #[arg(long)]
    debug: bool,

    /// Use -t/-i/-g/-c/-m (the default when no mode is given)
    #[arg(long)]
    custom: bool,

    /// Starting time for each side, in seconds (custom mode)
    #[arg(short = 't', long)]
    time: Option<u32>,

    /// Time added after each move, in seconds (custom mode)
    #[arg(short = 'i', long)]
    increment: Option<u32>,

    /// Number of games to play (custom mode)
    #[arg(short = 'g', long)]
    games: Option<u32>,

    /// Number of games played at once (custom mode)
    #[arg(short = 'c', long)]
    concurrency: Option<u32>,

    /// Time margin in milliseconds before a flag fall (custom mode)
    #[arg(short = 'm', long)]
    timemargin: Option<u32>,

    #[command(flatten)]
    common: CommonArgs,
}

impl Cli {
    fn mode(&self) -> TestMode {
        if self.confident {
            TestMode::Preset(Preset::Confident)
        } else if self.fast {
            TestMode::Preset(Preset::Fast)
        } else if self.smoke {
            TestMode::Preset(Preset::Smoke)
        } else if self.debug {
            TestMode::Preset(Preset::Debug)
        } else {
            TestMode::Custom
        }
    }

    fn overrides(&self) -> CustomOverrides {
        CustomOverrides {
            time_secs: self.time,
            increment_secs: self.increment,
            games: self.games,
            concurrency: self.concurrency,
            time_margin_ms: self.timemargin,
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    let settings = Settings::load(&cli.common.versions_dir, &cli.common.current_build);
    debug!(?settings, "Loaded settings");

    let plan = plan_match(
        &settings,
        cli.engine_a_version.as_deref(),
        cli.engine_b_version.as_deref(),
        cli.mode(),
        &cli.overrides(),
    )?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    Ok(drive(&plan, &mut input, &mut output).await?)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli: Cli = match parse_or_exit() {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    cli.common.init_logging();

    match run(cli).await {
        Ok(outcome) => {
            debug!(?outcome, "Done");
            ExitCode::SUCCESS
        }
        Err(err) => report(&err),
    }
}
