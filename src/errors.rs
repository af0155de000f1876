use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum RefbenchError {
    #[error("pass pathToExecutable [pathToInputFile] [numberOfTests] as command line arguments")]
    Usage,

    #[error("the third argument should be the number of tests, got '{value}'")]
    InvalidRunCount { value: String },

    #[error("cannot open input file {path}: {source}")]
    InputFileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to run executable {executable}: {source}")]
    Spawn {
        executable: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed value after '{label}': {value:?}")]
    MalformedValue { label: &'static str, value: String },

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {detail}")]
    ConfigParse { path: PathBuf, detail: String },
}
