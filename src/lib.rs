//! vhostgen: regenerate priority-ordered webserver vhost configuration,
//! directory protection files and reload commands from hosting-account
//! domain records.

pub mod adapters;
pub mod batch;
pub mod builder;
pub mod config;
pub mod domain;
pub mod input;
pub mod layout;
pub mod ports;
pub mod reload;
pub mod writer;

use std::path::Path;

use chrono::Local;

use adapters::ShellRunner;
use config::Config;
use input::BatchInput;
use ports::CommandRunner;

pub use domain::AppError;
pub use reload::ReloadReport;
pub use writer::WriteReport;

/// Outcome of one full generation pass.
#[derive(Debug)]
pub struct RebuildResult {
    pub write: WriteReport,
    pub reload: Option<ReloadReport>,
}

/// Run one full generation pass: build, write, reload.
///
/// `skip_reload` leaves the freshly written files in place without
/// touching the running services (used by `rebuild --no-reload`).
pub fn rebuild(
    config_path: &Path,
    batch_path: &Path,
    skip_reload: bool,
) -> Result<RebuildResult, AppError> {
    let config = Config::load(config_path)?;
    let input = BatchInput::load(batch_path)?;
    let runner = ShellRunner::new();

    let result = rebuild_with_runner(&config, &input, &runner, skip_reload)?;

    for warning in &result.write.warnings {
        eprintln!("warning: {warning}");
    }
    println!("✅ Wrote {} config file(s)", result.write.written.len());
    Ok(result)
}

/// [`rebuild`] against an explicit runner; entry point for tests.
pub fn rebuild_with_runner(
    config: &Config,
    input: &BatchInput,
    runner: &dyn CommandRunner,
    skip_reload: bool,
) -> Result<RebuildResult, AppError> {
    let batch = builder::build_batch(config, input);
    let write = writer::write_configs(config, batch, runner, Local::now())?;

    let reload = if skip_reload { None } else { Some(reload::reload(&config.reload, runner)?) };

    Ok(RebuildResult { write, reload })
}

/// Validate settings and batch files and report what a pass would do,
/// without writing or reloading anything.
pub fn check(config_path: &Path, batch_path: &Path) -> Result<(), AppError> {
    let config = Config::load(config_path)?;
    let input = BatchInput::load(batch_path)?;

    let batch = builder::build_batch(&config, &input);
    println!(
        "{} vhost(s), {} diroption(s), {} htpasswd file(s)",
        batch.vhosts().len(),
        batch.diroptions().len(),
        batch.htpasswds().len()
    );
    for filename in batch.vhosts().keys() {
        println!("  {}", filename.display());
    }
    for action in config.reload.plan()? {
        println!("would run: {}", action.command);
    }
    Ok(())
}
