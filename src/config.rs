//! Pass-wide settings, resolved once from a TOML settings file.
//!
//! Every component takes the resolved `Config` by reference instead of
//! reading settings ad hoc, so one pass sees one consistent snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{AppError, ReloadPolicy};

/// Resolved settings for one generation pass.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Vhost destination: a directory (one file per vhost) or a single
    /// aggregated file, distinguished by [`crate::layout`].
    pub vhost_path: PathBuf,
    /// Directory-options destination, same aggregated/per-entity rule.
    pub diroptions_path: PathBuf,
    /// Directory holding htpasswd files; always per-entity.
    pub htpasswd_dir: PathBuf,
    /// Webserver identity, e.g. `apache2`, `nginx`, `lighttpd`.
    pub webserver: String,
    /// Vendor prefix embedded in generated filenames.
    #[serde(default = "default_vendor")]
    pub vendor: String,
    /// Colon-separated extra paths appended to every open_basedir value.
    #[serde(default)]
    pub php_append_open_basedir: String,
    /// Serve the panel at the hostname root instead of a subdirectory.
    #[serde(default)]
    pub panel_directly_via_hostname: bool,
    /// Installation path of the panel itself.
    #[serde(default = "default_panel_install_path")]
    pub panel_install_path: PathBuf,
    /// Hostname the panel is reachable at; empty disables the panel's
    /// own infrastructure vhosts.
    #[serde(default)]
    pub panel_hostname: String,
    /// Per-domain vhost body; `{NAME}` placeholders, see
    /// [`crate::domain::template`]. Empty means the built-in default.
    #[serde(default)]
    pub vhost_template: String,
    #[serde(default)]
    pub reload: ReloadPolicy,
}

fn default_vendor() -> String {
    "vhostgen".to_string()
}

fn default_panel_install_path() -> PathBuf {
    PathBuf::from("/var/www/vhostgen")
}

impl Config {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.is_file() {
            return Err(AppError::ConfigMissing(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| AppError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if config.webserver.is_empty() {
            return Err(AppError::Configuration("webserver identity must not be empty".into()));
        }
        Ok(config)
    }

    /// Whether the webserver uses apache-style directives (`Include`,
    /// `<Directory>` blocks).
    pub fn is_apache(&self) -> bool {
        self.webserver == "apache2"
    }
}
