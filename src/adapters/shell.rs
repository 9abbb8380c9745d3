use std::process::Command;

use crate::domain::AppError;
use crate::ports::CommandRunner;

/// `CommandRunner` backed by `sh -c`.
///
/// Reload commands and `mkdir -p` lines come from settings as full
/// command strings, so they go through the shell rather than argv
/// splitting; callers quote untrusted words beforehand.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> Result<String, AppError> {
        let output = Command::new("sh").arg("-c").arg(command).output().map_err(|e| {
            AppError::Command { command: command.to_string(), details: e.to_string() }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(AppError::Command {
                command: command.to_string(),
                details: if stderr.is_empty() {
                    format!("exit status {}", output.status)
                } else {
                    stderr
                },
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
