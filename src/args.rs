use std::path::PathBuf;

use crate::errors::RefbenchError;
use crate::types::RunConfig;

/// Defaults that apply when the positional arguments leave a setting open.
#[derive(Debug, Clone, Copy)]
pub struct Defaults {
    pub runs: usize,
    pub precision: usize,
}

/// Resolve `<executable> [<input file> | <runs>] [<runs>]` into a run configuration.
///
/// With two positionals the second is a run count if it parses as an
/// integer, otherwise an input file. A run count of zero or below is
/// accepted with a warning and clamped to zero runs.
pub fn resolve(positionals: &[String], defaults: Defaults) -> Result<RunConfig, RefbenchError> {
    let (executable, input_file, requested) = match positionals {
        [exe] => (exe, None, None),
        [exe, second] => match second.parse::<i32>() {
            Ok(n) => (exe, None, Some(n)),
            Err(_) => (exe, Some(second), None),
        },
        [exe, input, count] => {
            let n = count
                .parse::<i32>()
                .map_err(|_| RefbenchError::InvalidRunCount {
                    value: count.clone(),
                })?;
            (exe, Some(input), Some(n))
        }
        _ => return Err(RefbenchError::Usage),
    };

    let runs = match requested {
        Some(n) if n <= 0 => {
            tracing::warn!(requested = n, "number of tests is not positive, nothing will be run");
            0
        }
        Some(n) => n as usize,
        None => defaults.runs,
    };

    Ok(RunConfig {
        executable: PathBuf::from(executable),
        input_file: input_file.map(PathBuf::from),
        runs,
        precision: defaults.precision,
    })
}
