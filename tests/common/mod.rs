//! Shared testing utilities for vhostgen CLI tests.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;

/// Isolated environment for one CLI exercise: a scratch root holding
/// the settings file, the batch file and all generation targets.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Fixture handle for a generated file, for `assert_fs` assertions.
    pub fn child(&self, name: &str) -> ChildPath {
        self.root.child(name)
    }

    /// Write the settings file with aggregated (single-file) targets.
    pub fn write_aggregated_settings(&self, webserver: &str) {
        self.write_settings_with(webserver, "vhosts.conf", "diroptions.conf");
    }

    /// Write the settings file with per-entity (directory) targets.
    pub fn write_per_entity_settings(&self, webserver: &str) {
        self.write_settings_with(webserver, "sites-enabled/", "diroptions/");
    }

    fn write_settings_with(&self, webserver: &str, vhost: &str, diroptions: &str) {
        let root = self.root().display();
        let settings = format!(
            r#"
vhost_path = "{root}/{vhost}"
diroptions_path = "{root}/{diroptions}"
htpasswd_dir = "{root}/htpasswd/"
webserver = "{webserver}"

[reload]
webserver_reload_command = "touch {root}/reloaded"
"#
        );
        fs::write(self.path("settings.toml"), settings).expect("write settings.toml");
    }

    /// Write a batch file; the caller provides the TOML body.
    pub fn write_batch(&self, body: &str) {
        fs::write(self.path("batch.toml"), body).expect("write batch.toml");
    }

    /// A batch with one apex domain, one subdomain, one promoted
    /// subdomain, plain + ssl listeners and one protected directory.
    pub fn write_standard_batch(&self) {
        self.write_batch(
            r#"
[[domains]]
id = 1
domain = "example.com"
documentroot = "/var/customers/webs/alice/example.com"
customerroot = "/var/customers/webs/alice"
loginname = "alice"

[[domains]]
id = 2
domain = "www.example.com"
parent_domain_id = 1
documentroot = "/var/customers/webs/alice/example.com"
customerroot = "/var/customers/webs/alice"
loginname = "alice"

[[domains]]
id = 3
domain = "shop.example.com"
is_main_but_subto = 1
main_to_sub_exists = true
documentroot = "/var/customers/webs/alice/shop"
customerroot = "/var/customers/webs/alice"
loginname = "alice"

[[listeners]]
ip = "203.0.113.4"
port = 80

[[listeners]]
ip = "203.0.113.4"
port = 8443
ssl = true
ssl_cert_file = "/etc/ssl/panel.crt"

[[protections]]
loginname = "alice"
path = "/var/customers/webs/alice/secret"
credentials = ["alice:$apr1$abc$def", "bob:$apr1$ghi$jkl", "alice:$apr1$abc$def"]
"#,
        );
    }

    /// Build a command invoking the compiled `vhostgen` binary against
    /// this context's settings and batch files.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("vhostgen").expect("Failed to locate vhostgen binary");
        cmd.arg("--config")
            .arg(self.path("settings.toml"))
            .arg("--batch")
            .arg(self.path("batch.toml"));
        cmd
    }

    /// Read a generated file under the scratch root.
    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name))
            .unwrap_or_else(|e| panic!("read {name}: {e}"))
    }

    /// Generated file content with the `# Created ...` banner line
    /// blanked, for timestamp-independent comparison.
    pub fn read_without_timestamp(&self, name: &str) -> String {
        self.read(name)
            .lines()
            .map(|line| if line.starts_with("# Created ") { "# Created" } else { line })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
