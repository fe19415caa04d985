//! Archives the current Enigma build in the version store.
//!
//! `save-version <name>` copies `build/enigma` to `versions/v<N>_<name>`,
//! where `N` is one past the latest version. Without a name, the latest
//! version is overwritten after confirmation.

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use enigma_bench::{archive_current_build, ArchiveOutcome, Settings};
use enigma_bench_cli::{parse_or_exit, report, CommonArgs};

#[derive(Parser, Debug)]
#[command(name = "save-version")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Copies the current binary to the versions folder as v<N>_<name>",
    long_about = None
)]
struct Cli {
    /// Name for the new version; omit to overwrite the latest one
    name: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

fn run(cli: Cli) -> Result<ArchiveOutcome> {
    let settings = Settings::for_archiver(&cli.common.versions_dir, &cli.common.current_build);
    debug!(?settings, "Loaded settings");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    Ok(archive_current_build(
        &settings,
        cli.name.as_deref(),
        &mut input,
        &mut output,
    )?)
}

fn main() -> ExitCode {
    let cli: Cli = match parse_or_exit() {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    cli.common.init_logging();

    match run(cli) {
        Ok(outcome) => {
            debug!(?outcome, "Done");
            ExitCode::SUCCESS
        }
        Err(err) => report(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn name_is_optional() {
        let cli = Cli::try_parse_from(["save-version"]).unwrap();
        assert!(cli.name.is_none());

        let args = ["save-version", "nullmove", "--versions-dir", "/tmp/v"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.name.as_deref(), Some("nullmove"));
        assert_eq!(cli.common.versions_dir, std::path::PathBuf::from("/tmp/v"));
    }

    #[test]
    fn labelled_run_archives_build() {
        let dir = tempfile::tempdir().unwrap();
        let build = dir.path().join("enigma");
        std::fs::write(&build, b"engine").unwrap();
        let versions = dir.path().join("versions");

        let cli = Cli::try_parse_from([
            "save-version".to_string(),
            "first".to_string(),
            "--versions-dir".to_string(),
            versions.display().to_string(),
            "--build".to_string(),
            build.display().to_string(),
        ])
        .unwrap();

        let outcome = run(cli).unwrap();
        assert!(matches!(outcome, ArchiveOutcome::Created(ref b) if b.file_name() == "v0_first"));
        assert!(versions.join("v0_first").is_file());
    }
}
