use std::cell::RefCell;

use crate::domain::AppError;
use crate::ports::CommandRunner;

/// In-memory `CommandRunner` for tests: records every command line and
/// optionally fails on command lines containing a marker substring.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: RefCell<Vec<String>>,
    fail_on: Option<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any command whose line contains `marker`.
    pub fn failing_on<S: Into<String>>(marker: S) -> Self {
        Self { commands: RefCell::new(Vec::new()), fail_on: Some(marker.into()) }
    }

    /// Every command line run so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &str) -> Result<String, AppError> {
        self.commands.borrow_mut().push(command.to_string());
        if let Some(marker) = &self.fail_on {
            if command.contains(marker.as_str()) {
                return Err(AppError::Command {
                    command: command.to_string(),
                    details: "injected failure".to_string(),
                });
            }
        }
        Ok(String::new())
    }
}
