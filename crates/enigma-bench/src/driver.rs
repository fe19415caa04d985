//! Invocation driver: summary, confirmation and match-tool execution.

use std::io::{BufRead, Write};

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::command::MatchCommand;
use crate::error::{BenchError, Result};
use crate::preset::{select_configuration, CustomOverrides, TestConfiguration, TestMode};
use crate::resolver::{resolve_engines, EnginePair};
use crate::settings::Settings;
use crate::store::VersionStore;

const RULE_WIDTH: usize = 60;

/// How an invocation ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The match tool ran and exited successfully.
    Completed,
    /// The user declined at the confirmation prompt.
    Aborted,
}

/// Everything needed to launch one match, resolved before any prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPlan {
    pub engines: EnginePair,
    pub mode: TestMode,
    pub config: TestConfiguration,
    pub command: MatchCommand,
}

/// Validate the mode, resolve both engines and build the command.
///
/// Argument conflicts are reported before the store is touched.
pub fn plan_match(
    settings: &Settings,
    engine_a: Option<&str>,
    engine_b: Option<&str>,
    mode: TestMode,
    overrides: &CustomOverrides,
) -> Result<MatchPlan> {
    let config = select_configuration(mode, overrides)?;
    let program = settings.match_tool()?;
    let store = VersionStore::new(&settings.versions_dir);
    let engines = resolve_engines(&store, &settings.current_build, engine_a, engine_b)?;
    let command = MatchCommand::build(program, &engines, &config);
    Ok(MatchPlan {
        engines,
        mode,
        config,
        command,
    })
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Human-readable summary of the engines and configuration.
pub fn render_summary(engines: &EnginePair, mode: TestMode, config: &TestConfiguration) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        rule.clone(),
        format!("Engine A:     {}", engines.a),
        format!("Engine B:     {}", engines.b),
        format!("Mode:         {}", mode.name()),
        format!("Time Control: {}", config.time_control),
    ];
    if let Some(margin) = config.time_margin_ms {
        lines.push(format!("Time Margin:  {margin}ms"));
    }
    lines.push(match &config.draw {
        Some(draw) => format!(
            "Draw:         after move {}, {} moves within {}cp",
            draw.move_number, draw.move_count, draw.score
        ),
        None => "Draw:         off".to_string(),
    });
    lines.push(match &config.resign {
        Some(resign) => format!(
            "Resign:       {} moves at {}cp",
            resign.move_count, resign.score
        ),
        None => "Resign:       off".to_string(),
    });
    lines.push(match &config.sprt {
        Some(sprt) => format!(
            "SPRT:         elo0={} elo1={} alpha={} beta={}",
            sprt.elo0, sprt.elo1, sprt.alpha, sprt.beta
        ),
        None => "SPRT:         off".to_string(),
    });
    lines.push(format!("Games:        {}", config.games));
    lines.push(format!("Repeat:       {}", on_off(config.repeat)));
    if let Some(concurrency) = config.concurrency {
        lines.push(format!("Concurrency:  {concurrency}"));
    }
    lines.push(format!("Debug:        {}", on_off(config.debug)));
    lines.push(rule);
    lines.join("\n")
}

/// True for `y` or `yes`, ignoring case and surrounding whitespace.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Ask a yes/no question and block until a line is read. EOF declines.
pub fn confirm<R: BufRead, W: Write>(
    question: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    write!(output, "{question} (y/N): ")?;
    output.flush()?;

    let mut answer = String::new();
    let read = input.read_line(&mut answer)?;
    if read == 0 {
        writeln!(output)?;
        return Ok(false);
    }
    Ok(is_affirmative(&answer))
}

/// Run the match tool with inherited stdio and wait for it to exit.
///
/// A nonzero status becomes [`BenchError::ExternalToolFailure`] carrying the code.
pub async fn run_match_tool(command: &MatchCommand) -> Result<()> {
    info!(program = %command.program.display(), "Launching match tool");
    let status = Command::new(&command.program)
        .args(command.args())
        .status()
        .await?;

    match status.code() {
        Some(0) => {
            info!("Match tool finished");
            Ok(())
        }
        Some(code) => {
            warn!(code, "Match tool failed");
            Err(BenchError::ExternalToolFailure { code })
        }
        None => {
            warn!("Match tool terminated by signal");
            Err(BenchError::TerminatedBySignal)
        }
    }
}

/// Print the summary and command, confirm, then run the match tool.
pub async fn drive<R: BufRead, W: Write>(
    plan: &MatchPlan,
    input: &mut R,
    output: &mut W,
) -> Result<Outcome> {
    if let Ok(json) = serde_json::to_string(&plan.config) {
        debug!(mode = plan.mode.name(), config = %json, "Resolved test configuration");
    }

    let summary = render_summary(&plan.engines, plan.mode, &plan.config);
    writeln!(output)?;
    writeln!(output, "{summary}")?;
    writeln!(output)?;
    writeln!(output, "Command:")?;
    writeln!(output, "{}", plan.command)?;
    writeln!(output)?;

    if !confirm("Confirm", input, output)? {
        writeln!(output, "Aborted")?;
        return Ok(Outcome::Aborted);
    }

    writeln!(output)?;
    output.flush()?;
    run_match_tool(&plan.command).await?;
    Ok(Outcome::Completed)
}
