use std::fs::File;
use std::io::{self, Read};
use std::process::{Command, Stdio};

use chrono::Utc;

use crate::errors::RefbenchError;
use crate::extract::parse_profiler_output;
use crate::types::{RunConfig, RunResult};

/// Run the configured executable `config.runs` times, one after another.
///
/// `on_run` is called after each run's record is extracted, before the next
/// run starts. An input file that cannot be opened, a spawn failure, or a
/// malformed counter stops the whole run set.
pub fn run_all<F>(config: &RunConfig, mut on_run: F) -> Result<Vec<RunResult>, RefbenchError>
where
    F: FnMut(&RunResult),
{
    let mut results = Vec::with_capacity(config.runs);

    for index in 1..=config.runs {
        let result = run_once(config, index)?;
        on_run(&result);
        results.push(result);
    }

    Ok(results)
}

/// Spawn the executable once and extract its counters.
pub fn run_once(config: &RunConfig, index: usize) -> Result<RunResult, RefbenchError> {
    let mut cmd = Command::new(&config.executable);

    // Each run opens its own handle so the child reads the input from the start.
    match &config.input_file {
        Some(path) => {
            let file = File::open(path).map_err(|source| RefbenchError::InputFileOpen {
                path: path.clone(),
                source,
            })?;
            cmd.stdin(file);
        }
        None => {
            cmd.stdin(Stdio::null());
        }
    }

    tracing::debug!(run = index, executable = %config.executable.display(), "spawning");

    let spawn_error = |source| RefbenchError::Spawn {
        executable: config.executable.clone(),
        source,
    };

    // One pipe for both streams keeps stdout and stderr in the order the child wrote them.
    let (mut reader, writer) = io::pipe().map_err(spawn_error)?;
    cmd.stdout(writer.try_clone().map_err(spawn_error)?);
    cmd.stderr(writer);

    let mut child = cmd.spawn().map_err(spawn_error)?;
    // The command still owns the write ends; drop it so the read sees EOF.
    drop(cmd);

    let mut combined = Vec::new();
    reader.read_to_end(&mut combined).map_err(spawn_error)?;
    let status = child.wait().map_err(spawn_error)?;

    if !status.success() {
        tracing::warn!(run = index, status = %status, "executable returned an error");
    }

    let text = String::from_utf8_lossy(&combined);

    let values = parse_profiler_output(&text, config.precision)?;

    Ok(RunResult {
        index,
        finished_at: Utc::now(),
        exit_code: status.code(),
        values,
    })
}
