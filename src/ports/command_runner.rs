use crate::domain::AppError;

/// Capability for running external shell commands.
///
/// The writer and the reload trigger only ever shell out through this
/// port, so both can be exercised in tests without touching a real
/// process table.
pub trait CommandRunner {
    /// Run one shell command line to completion.
    ///
    /// Returns trimmed stdout on success; a non-zero exit or a spawn
    /// failure surfaces as [`AppError::Command`].
    fn run(&self, command: &str) -> Result<String, AppError>;
}
