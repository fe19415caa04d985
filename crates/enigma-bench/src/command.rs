//! cutechess-cli command construction.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::preset::TestConfiguration;
use crate::resolver::{EnginePair, EngineRef};

/// A fully built match-tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl MatchCommand {
    /// Map an engine pair and configuration to the match tool's argument list.
    ///
    /// Optional groups are emitted only when present in `config`, always in
    /// the order the tool expects.
    pub fn build(program: &Path, engines: &EnginePair, config: &TestConfiguration) -> Self {
        let mut args = Vec::new();
        push_engine(&mut args, &engines.a);
        push_engine(&mut args, &engines.b);

        args.extend([
            "-each".to_string(),
            "proto=uci".to_string(),
            "ponder=off".to_string(),
            format!("tc={}", config.time_control),
        ]);
        if let Some(margin) = config.time_margin_ms {
            args.push(format!("timemargin={margin}"));
        }

        if let Some(draw) = &config.draw {
            args.extend([
                "-draw".to_string(),
                format!("movenumber={}", draw.move_number),
                format!("movecount={}", draw.move_count),
                format!("score={}", draw.score),
            ]);
        }
        if let Some(resign) = &config.resign {
            args.extend([
                "-resign".to_string(),
                format!("movecount={}", resign.move_count),
                format!("score={}", resign.score),
            ]);
        }
        if let Some(sprt) = &config.sprt {
            args.extend([
                "-sprt".to_string(),
                format!("elo0={}", sprt.elo0),
                format!("elo1={}", sprt.elo1),
                format!("alpha={}", sprt.alpha),
                format!("beta={}", sprt.beta),
            ]);
        }

        args.extend(["-games".to_string(), config.games.to_string()]);
        if config.repeat {
            args.push("-repeat".to_string());
        }
        if let Some(concurrency) = config.concurrency {
            args.extend(["-concurrency".to_string(), concurrency.to_string()]);
        }
        if config.debug {
            args.push("-debug".to_string());
        }

        Self {
            program: program.to_path_buf(),
            args,
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// True if `flag` appears as a standalone argument.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|arg| arg == flag)
    }

    /// The values following `flag`, up to the next flag.
    pub fn flag_values(&self, flag: &str) -> Option<&[String]> {
        let start = self.args.iter().position(|arg| arg == flag)? + 1;
        let len = self.args[start..]
            .iter()
            .take_while(|arg| !arg.starts_with('-'))
            .count();
        Some(&self.args[start..start + len])
    }
}

fn push_engine(args: &mut Vec<String>, engine: &EngineRef) {
    args.extend([
        "-engine".to_string(),
        format!("cmd={}", engine.path.display()),
        format!("name={}", engine.display_name),
    ]);
}

const SHELL_SPECIAL: &[char] = &['\'', '"', '\\', '$', '`', '*', '?', ';', '&', '|'];

/// Quote `arg` for a POSIX shell if it needs it.
fn shell_quote(arg: &str) -> String {
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || SHELL_SPECIAL.contains(&c));
    if needs_quotes {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        arg.to_string()
    }
}

/// Renders the command as a single copy-pasteable shell line.
impl fmt::Display for MatchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program.display().to_string()))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}
