use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Library-wide error type for vhostgen operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Settings file not found at the expected location.
    #[error("Settings file not found: {}", .0.display())]
    ConfigMissing(PathBuf),

    /// Domain batch file not found at the expected location.
    #[error("Domain batch file not found: {}", .0.display())]
    BatchMissing(PathBuf),

    /// A settings or batch file failed to parse as TOML.
    #[error("Failed to parse {path}: {reason}")]
    Malformed { path: String, reason: String },

    /// An external command exited unsuccessfully or could not be spawned.
    #[error("Command `{command}` failed: {details}")]
    Command { command: String, details: String },

    /// A configured value cannot be passed through the shell safely.
    #[error("Cannot shell-quote configured command: {0}")]
    Unquotable(String),
}
