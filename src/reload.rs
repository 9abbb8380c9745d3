//! Executes the reload plan after a write pass.

use crate::domain::{AppError, ReloadAction, ReloadPolicy};
use crate::ports::CommandRunner;

/// Actions that were run, in order, for the caller to render.
#[derive(Debug, Default)]
pub struct ReloadReport {
    pub actions: Vec<ReloadAction>,
}

/// Run the PHP-layer and webserver reload sequence.
///
/// Command failures are not caught here; the first failing action
/// aborts the sequence and propagates to the invoking harness.
pub fn reload(policy: &ReloadPolicy, runner: &dyn CommandRunner) -> Result<ReloadReport, AppError> {
    let mut report = ReloadReport::default();

    for action in policy.plan()? {
        // Announce before running so a hanging command is attributable.
        println!("{}: {}", action.label, action.command);
        runner.run(&action.command)?;
        report.actions.push(action);
    }

    Ok(report)
}
