use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a run before any output is produced.
#[derive(Debug, Error)]
pub enum TstfError {
    #[error("failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {message}", path.display())]
    ConfigInvalid { path: PathBuf, message: String },

    #[error("{} is missing compilerOptions.{field}", path.display())]
    MissingCompilerOption { path: PathBuf, field: &'static str },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid glob pattern '{pattern}': {message}")]
    Glob { pattern: String, message: String },
}
