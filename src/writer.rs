//! Materializes an accumulated [`ConfigBatch`] onto the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::batch::{ConfigBatch, aggregate, dedup_lines};
use crate::config::Config;
use crate::domain::AppError;
use crate::layout::{self, TargetLayout};
use crate::ports::CommandRunner;

const DO_NOT_EDIT: &str =
    "# Do NOT manually edit this file, all changes will be deleted after the next domain change at the panel.";

/// Mode applied to a freshly created htpasswd directory.
const HTPASSWD_DIR_MODE: u32 = 0o751;

/// What one write pass did, for the caller to render.
#[derive(Debug, Default)]
pub struct WriteReport {
    /// Files written, in write order.
    pub written: Vec<PathBuf>,
    /// Non-fatal problems; the pass continued past each of them.
    pub warnings: Vec<String>,
}

/// Write all accumulated categories to disk.
///
/// Categories are written in a fixed order (diroptions, htpasswds,
/// vhosts) so the aggregated vhost output can reference the diroptions
/// file it just produced. An empty category performs no filesystem
/// mutation at all. Individual file failures become warnings and the
/// pass keeps going; failing to create a target directory aborts.
pub fn write_configs(
    config: &Config,
    batch: ConfigBatch,
    runner: &dyn CommandRunner,
    now: DateTime<Local>,
) -> Result<WriteReport, AppError> {
    let mut report = WriteReport::default();

    write_diroptions(config, &batch, runner, now, &mut report)?;
    write_htpasswds(config, &batch, &mut report);
    write_vhosts(config, &batch, runner, now, &mut report)?;

    Ok(report)
}

fn write_diroptions(
    config: &Config,
    batch: &ConfigBatch,
    runner: &dyn CommandRunner,
    now: DateTime<Local>,
    report: &mut WriteReport,
) -> Result<(), AppError> {
    if batch.diroptions().is_empty() {
        return Ok(());
    }

    match layout::resolve(&config.diroptions_path) {
        TargetLayout::Aggregated => {
            let content = aggregate(batch.diroptions());
            write_with_banner(&config.diroptions_path, &content, now, report);
        }
        TargetLayout::PerEntity => {
            ensure_dir_via_shell(&config.diroptions_path, runner)?;
            for (filename, content) in batch.diroptions() {
                write_with_banner(filename, content, now, report);
            }
        }
    }
    Ok(())
}

fn write_htpasswds(config: &Config, batch: &ConfigBatch, report: &mut WriteReport) {
    if batch.htpasswds().is_empty() {
        return;
    }

    if !config.htpasswd_dir.exists() {
        if let Err(e) = create_htpasswd_dir(&config.htpasswd_dir) {
            report.warnings.push(format!(
                "cannot create {}: {e}; directory protection is disabled for this pass",
                config.htpasswd_dir.display()
            ));
            return;
        }
    }

    if !is_writable_dir(&config.htpasswd_dir) {
        report.warnings.push(format!(
            "{} is not a writable directory; directory protection is disabled for this pass",
            config.htpasswd_dir.display()
        ));
        return;
    }

    for (filename, content) in batch.htpasswds() {
        // No banner: the webserver reads these files verbatim.
        record_write(filename, &dedup_lines(content), report);
    }
}

fn write_vhosts(
    config: &Config,
    batch: &ConfigBatch,
    runner: &dyn CommandRunner,
    now: DateTime<Local>,
    report: &mut WriteReport,
) -> Result<(), AppError> {
    if batch.vhosts().is_empty() {
        return Ok(());
    }

    match layout::resolve(&config.vhost_path) {
        TargetLayout::Aggregated => {
            let mut content = aggregate(batch.vhosts());
            // Directive-style webservers can pull the aggregated
            // diroptions file in directly.
            if config.is_apache() && config.diroptions_path.is_file() {
                content.push_str(&format!("\nInclude {}\n\n", config.diroptions_path.display()));
            }
            write_with_banner(&config.vhost_path, &content, now, report);
        }
        TargetLayout::PerEntity => {
            ensure_dir_via_shell(&config.vhost_path, runner)?;
            for (filename, content) in batch.vhosts() {
                write_with_banner(filename, content, now, report);
            }
        }
    }
    Ok(())
}

/// Three-line generated-file banner plus a separating blank line.
pub fn banner(filename: &Path, now: DateTime<Local>) -> String {
    let basename = filename
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.display().to_string());
    format!("# {basename}\n# Created {}\n{DO_NOT_EDIT}\n\n", now.format("%d.%m.%Y %H:%M"))
}

fn write_with_banner(
    filename: &Path,
    content: &str,
    now: DateTime<Local>,
    report: &mut WriteReport,
) {
    let banner = banner(filename, now);
    record_write(filename, &format!("{banner}{content}"), report);
}

/// Write one file, replacing prior content; failures downgrade to a
/// warning so the remaining files still get their attempt.
fn record_write(filename: &Path, content: &str, report: &mut WriteReport) {
    match fs::write(filename, content) {
        Ok(()) => report.written.push(filename.to_path_buf()),
        Err(e) => report.warnings.push(format!("cannot write {}: {e}", filename.display())),
    }
}

/// Create a missing per-entity target directory through the shell.
fn ensure_dir_via_shell(dir: &Path, runner: &dyn CommandRunner) -> Result<(), AppError> {
    if dir.exists() {
        return Ok(());
    }
    let quoted = shlex::try_quote(&dir.display().to_string())
        .map_err(|_| AppError::Unquotable(dir.display().to_string()))?
        .into_owned();
    runner.run(&format!("mkdir -p {quoted}"))?;
    Ok(())
}

/// Create the htpasswd directory with its exact mode, independent of
/// the process umask.
fn create_htpasswd_dir(dir: &Path) -> Result<(), std::io::Error> {
    fs::create_dir_all(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(HTPASSWD_DIR_MODE))?;
    }
    Ok(())
}

/// Whether this process can actually create files in `dir`.
///
/// Mode bits alone are not enough (they say nothing about which user
/// they apply to), so this attempts a real write and cleans it up.
fn is_writable_dir(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    let check = dir.join(".vhostgen-writecheck");
    match fs::write(&check, b"") {
        Ok(()) => {
            let _ = fs::remove_file(&check);
            true
        }
        Err(_) => false,
    }
}
