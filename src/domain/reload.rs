//! Reload decision table for the PHP layer and the webserver.

use serde::Deserialize;

use super::AppError;

/// Reload-related settings, resolved once per pass.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReloadPolicy {
    /// Command restarting standalone PHP processes (mod_php / cgi setups).
    #[serde(default)]
    pub php_reload_command: String,
    /// Whether PHP-FPM is the active PHP interface.
    #[serde(default)]
    pub phpfpm_enabled: bool,
    /// Command reloading the PHP-FPM master.
    #[serde(default)]
    pub phpfpm_reload_command: String,
    /// Whether the FastCGI module (mod_fcgid) is active.
    #[serde(default)]
    pub fcgid_enabled: bool,
    /// Command reloading the webserver itself.
    #[serde(default)]
    pub webserver_reload_command: String,
}

/// One external command to run, with a human-readable label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadAction {
    pub label: &'static str,
    pub command: String,
}

impl ReloadPolicy {
    /// Resolve the action sequence for one pass.
    ///
    /// Exactly one PHP-layer action is picked, in fixed priority order:
    /// the standalone PHP restart only applies when neither PHP-FPM nor
    /// the FastCGI module is active; an enabled PHP-FPM always wins over
    /// the FastCGI flag. The webserver reload follows unconditionally.
    pub fn plan(&self) -> Result<Vec<ReloadAction>, AppError> {
        let mut actions = Vec::with_capacity(2);

        if !self.php_reload_command.is_empty() && !self.phpfpm_enabled && !self.fcgid_enabled {
            actions.push(ReloadAction {
                label: "restarting php processes",
                command: sanitize_command(&self.php_reload_command)?,
            });
        } else if self.phpfpm_enabled {
            actions.push(ReloadAction {
                label: "reloading php-fpm",
                command: sanitize_command(&self.phpfpm_reload_command)?,
            });
        }

        actions.push(ReloadAction {
            label: "reloading webserver",
            command: sanitize_command(&self.webserver_reload_command)?,
        });

        Ok(actions)
    }
}

/// Neutralize shell metacharacters in a free-form settings command.
///
/// The command is tokenized and each word re-quoted, so word structure
/// survives while substitutions, redirects and chaining do not.
pub fn sanitize_command(command: &str) -> Result<String, AppError> {
    let words =
        shlex::split(command).ok_or_else(|| AppError::Unquotable(command.to_string()))?;
    let mut quoted = Vec::with_capacity(words.len());
    for word in &words {
        let word = shlex::try_quote(word)
            .map_err(|_| AppError::Unquotable(command.to_string()))?;
        quoted.push(word.into_owned());
    }
    Ok(quoted.join(" "))
}
