//! Session scripts: many desk commands against one in-memory desk.
//!
//! ```text
//! # morning drill
//! requests new --location "5 Quay St" --type fall
//! requests update EMR006 --status dispatched --ambulance AMB005
//! dashboard
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::desk::Desk;

use super::{DeskCommand, Output, execute};

/// One script line, parsed like a `dispatch` invocation without the binary name.
#[derive(Debug, Parser)]
#[command(name = "dispatch", no_binary_name = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Debug, Subcommand)]
enum SessionCommand {
    #[command(flatten)]
    Desk(DeskCommand),

    /// Reload the seed, discarding this session's changes.
    Reset,

    /// Stop reading the script.
    Exit,
}

/// Read a script from `path` (or stdin for `-`) and run it.
pub(super) fn run(
    desk: &mut Desk,
    config: &Config,
    out: Output,
    path: &Path,
) -> Result<(), String> {
    let script = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read script from stdin: {e}"))?;
        buf
    } else {
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?
    };

    let executed = run_script(desk, config, out, &script)?;
    tracing::info!(commands = executed, "session finished");
    Ok(())
}

/// Run each line of `script` in order. Stops at the first failing line.
///
/// Returns how many commands ran.
fn run_script(
    desk: &mut Desk,
    config: &Config,
    out: Output,
    script: &str,
) -> Result<usize, String> {
    let mut executed = 0;

    for (index, raw) in script.lines().enumerate() {
        let number = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let words = shlex::split(line).ok_or_else(|| format!("line {number}: unbalanced quotes"))?;
        let parsed = SessionLine::try_parse_from(words)
            .map_err(|e| format!("line {number}: {}", e.to_string().trim_end()))?;

        tracing::debug!(line = number, "{line}");
        match parsed.command {
            SessionCommand::Desk(command) => {
                execute(desk, config, out, command).map_err(|e| format!("line {number}: {e}"))?;
            }
            SessionCommand::Reset => desk.reset(),
            SessionCommand::Exit => {
                executed += 1;
                break;
            }
        }
        executed += 1;
    }

    Ok(executed)
}
