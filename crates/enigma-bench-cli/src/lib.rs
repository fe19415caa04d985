//! Pieces shared by the `run-match` and `save-version` binaries.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser};
use enigma_bench::settings::{DEFAULT_CURRENT_BUILD, DEFAULT_VERSIONS_DIR};
use enigma_bench::telemetry::{default_level, init_tracing};
use enigma_bench::BenchError;

/// Flags accepted by both binaries.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Directory holding archived versions
    #[arg(long, default_value = DEFAULT_VERSIONS_DIR)]
    pub versions_dir: PathBuf,

    /// Path to the current engine build
    #[arg(long = "build", default_value = DEFAULT_CURRENT_BUILD)]
    pub current_build: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    pub json: bool,
}

impl CommonArgs {
    pub fn init_logging(&self) {
        init_tracing(self.json, default_level(self.verbose));
    }
}

/// Parse the command line, exiting `0` for help/version and `1` for usage errors.
pub fn parse_or_exit<C: Parser>() -> Result<C, ExitCode> {
    C::try_parse().map_err(|err| {
        let _ = err.print();
        if err.use_stderr() {
            ExitCode::from(1)
        } else {
            ExitCode::SUCCESS
        }
    })
}

/// Exit code for a failed run: the match tool's own status when it failed,
/// `1` for everything else.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<BenchError>()
        .map_or(1, BenchError::exit_code)
}

/// Print `err` and convert it to an exit code.
pub fn report(err: &anyhow::Error) -> ExitCode {
    eprintln!("Error: {err:#}");
    ExitCode::from(exit_code_for(err))
}
