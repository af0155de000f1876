use std::path::Path;

use serde::Deserialize;

use crate::args::Defaults;
use crate::errors::RefbenchError;
use crate::types::{DEFAULT_PRECISION, DEFAULT_RUNS, OutputFormat};

/// Optional settings read from a TOML file passed with `--config`.
///
/// ```toml
/// runs = 10
/// precision = 3
/// format = "json"
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub runs: Option<usize>,
    pub precision: Option<usize>,
    pub format: Option<OutputFormat>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, RefbenchError> {
        let text = std::fs::read_to_string(path).map_err(|source| RefbenchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, RefbenchError> {
        toml::from_str(text).map_err(|e| RefbenchError::ConfigParse {
            path: path.to_path_buf(),
            detail: e.message().to_string(),
        })
    }

    /// Merge with command line values; the command line wins.
    pub fn defaults(&self, cli_precision: Option<usize>) -> Defaults {
        Defaults {
            runs: self.runs.unwrap_or(DEFAULT_RUNS),
            precision: cli_precision.or(self.precision).unwrap_or(DEFAULT_PRECISION),
        }
    }
}
