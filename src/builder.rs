//! Turns a batch snapshot into rendered config text per target file.

use std::path::{Path, PathBuf};

use crate::batch::{ConfigBatch, path_token};
use crate::config::Config;
use crate::domain::classify::{custom_vhost_filename, vhost_filename};
use crate::domain::ssl::{alternate_ssl_port_suffix, has_managed_certificate, needs_renewal};
use crate::domain::template::{TemplateVars, substitute};
use crate::domain::{DomainRecord, SslListener};
use crate::input::{BatchInput, DirectoryProtection};

/// Opening of the vhost body used when no `vhost_template` is
/// configured; the builder appends the open_basedir line (apache) and
/// the closing tag.
const DEFAULT_VHOST_TEMPLATE: &str = r#"<VirtualHost {IP}:{PORT}>
	ServerName {DOMAIN}
	DocumentRoot "{DOCROOT}""#;

/// Build the full [`ConfigBatch`] for one pass.
///
/// Per domain, one vhost is rendered for the first plain listener and
/// one for the first SSL listener. Directory protections produce one
/// htpasswd file each plus, on apache, a matching diroptions block.
/// With a configured panel hostname, one infrastructure vhost is added
/// per listener.
pub fn build_batch(config: &Config, input: &BatchInput) -> ConfigBatch {
    let mut batch = ConfigBatch::new();

    let plain = input.listeners.iter().find(|listener| !listener.ssl);
    let ssl = input.listeners.iter().find(|listener| listener.ssl);

    for record in &input.domains {
        if let Some(listener) = plain {
            add_domain_vhost(&mut batch, config, record, listener, false);
        }
        if let Some(listener) = ssl {
            add_domain_vhost(&mut batch, config, record, listener, true);
        }
    }

    for protection in &input.protections {
        add_protection(&mut batch, config, protection);
    }

    if !config.panel_hostname.is_empty() {
        for listener in &input.listeners {
            add_panel_vhost(&mut batch, config, input, listener);
        }
    }

    batch
}

fn add_domain_vhost(
    batch: &mut ConfigBatch,
    config: &Config,
    record: &DomainRecord,
    listener: &SslListener,
    ssl: bool,
) {
    let filename = vhost_filename(&config.vhost_path, &config.vendor, record, ssl);
    let vars = TemplateVars::for_domain(record, &listener.ip, listener.port, ssl);

    let content = if config.vhost_template.is_empty() {
        let mut body = substitute(DEFAULT_VHOST_TEMPLATE, &vars);
        if config.is_apache() {
            body.push_str(&format!(
                "\n\tphp_admin_value open_basedir \"{}\"",
                open_basedir_value(record, config)
            ));
        }
        if !record.specialsettings.is_empty() {
            body.push('\n');
            body.push_str(&substitute(&record.specialsettings, &vars));
        }
        body.push_str("\n</VirtualHost>");
        body
    } else {
        // Admin-supplied templates own the whole body; special settings
        // follow it at file scope.
        let mut body = substitute(&config.vhost_template, &vars);
        if !record.specialsettings.is_empty() {
            body.push('\n');
            body.push_str(&substitute(&record.specialsettings, &vars));
        }
        body
    };

    batch.add_vhost(filename, content);
}

fn add_protection(batch: &mut ConfigBatch, config: &Config, protection: &DirectoryProtection) {
    let token = path_token(&protection.path);
    let htpasswd_file =
        config.htpasswd_dir.join(format!("{}-{token}.htpasswd", protection.loginname));

    batch.add_htpasswd(htpasswd_file.clone(), protection.credentials.join("\n"));

    // Directory-scoped auth blocks are a directive-style concept; other
    // servers wire the htpasswd file up inside their vhost config.
    if config.is_apache() {
        let filename = diroption_filename(config, &token);
        let content = format!(
            "<Directory \"{}\">\n\tAuthType Basic\n\tAuthName \"{}\"\n\tAuthUserFile {}\n\tRequire valid-user\n</Directory>",
            protection.path.display(),
            protection.auth_name,
            htpasswd_file.display(),
        );
        batch.add_diroption(filename, content);
    }
}

fn diroption_filename(config: &Config, token: &str) -> PathBuf {
    config.diroptions_path.join(format!("40_{}_diroption_{token}.conf", config.vendor))
}

/// One infrastructure vhost for the panel itself, per IP:port bind.
///
/// Plain binds redirect to the SSL binding once a managed certificate
/// is deployed — unless that certificate is due for renewal, in which
/// case the plain vhost keeps serving so the ACME http challenge stays
/// reachable.
fn add_panel_vhost(
    batch: &mut ConfigBatch,
    config: &Config,
    input: &BatchInput,
    listener: &SslListener,
) {
    if listener.ssl && !has_managed_certificate(input.panel_certificate.as_ref()) {
        return;
    }

    let filename = custom_vhost_filename(
        &config.vhost_path,
        &config.vendor,
        "01",
        "ipandport",
        Some(&format!("{}:{}", listener.ip, listener.port)),
    );

    let docroot = panel_docroot(&listener.docroot, config);
    let mut content = format!(
        "<VirtualHost {}:{}>\n\tServerName {}\n\tDocumentRoot \"{}\"",
        listener.ip,
        listener.port,
        config.panel_hostname,
        docroot.display(),
    );

    if !listener.ssl
        && has_managed_certificate(input.panel_certificate.as_ref())
        && !needs_renewal(input.panel_certificate.as_ref())
    {
        let suffix = alternate_ssl_port_suffix(&input.listeners);
        content.push_str(&format!(
            "\n\tRedirectMatch ^/(.*)$ https://{}{suffix}/$1",
            config.panel_hostname
        ));
    }

    content.push_str("\n</VirtualHost>");
    batch.add_vhost(filename, content);
}

/// Document root of the panel's own vhost.
///
/// A per-bind docroot wins; otherwise the panel is served from its
/// installation path when reachable directly via hostname, or from the
/// directory above it when it lives under a `/panel`-style subpath.
pub fn panel_docroot(bind_docroot: &str, config: &Config) -> PathBuf {
    if !bind_docroot.is_empty() {
        return PathBuf::from(bind_docroot);
    }
    if config.panel_directly_via_hostname {
        config.panel_install_path.clone()
    } else {
        config
            .panel_install_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.panel_install_path.clone())
    }
}

/// Open-basedir value for one domain.
///
/// The base path is the customer root when the domain is flagged for
/// it or the docroot itself contains a `:`; the configured custom
/// append list follows, colon-separated.
pub fn open_basedir_value(record: &DomainRecord, config: &Config) -> String {
    let mut value = if record.openbasedir_to_customerroot || record.documentroot.contains(':') {
        record.customerroot.clone()
    } else {
        record.documentroot.clone()
    };

    for entry in config.php_append_open_basedir.split(':') {
        if !entry.is_empty() {
            value.push(':');
            value.push_str(entry);
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CertificateLifecycle;

    fn config() -> Config {
        toml::from_str(
            r#"
            vhost_path = "/etc/apache2/sites-enabled/"
            diroptions_path = "/etc/apache2/diroptions/"
            htpasswd_dir = "/etc/apache2/htpasswd/"
            webserver = "apache2"
            panel_install_path = "/var/www/panel"
            "#,
        )
        .unwrap()
    }

    fn domain(name: &str) -> DomainRecord {
        DomainRecord {
            id: 1,
            domain: name.to_string(),
            parent_domain_id: 0,
            is_std_subdomain: false,
            is_main_but_subto: 0,
            main_to_sub_exists: false,
            documentroot: format!("/var/customers/webs/alice/{name}"),
            customerroot: "/var/customers/webs/alice".to_string(),
            loginname: "alice".to_string(),
            openbasedir_to_customerroot: false,
            specialsettings: String::new(),
        }
    }

    fn listener(port: u16, ssl: bool) -> SslListener {
        SslListener {
            ip: "203.0.113.4".to_string(),
            port,
            ssl,
            ssl_cert_file: String::new(),
            docroot: String::new(),
        }
    }

    #[test]
    fn renders_normal_and_ssl_vhosts_per_domain() {
        let config = config();
        let input = BatchInput {
            domains: vec![domain("example.com")],
            listeners: vec![listener(80, false), listener(443, true)],
            panel_certificate: None,
            protections: vec![],
        };

        let batch = build_batch(&config, &input);
        let filenames: Vec<String> =
            batch.vhosts().keys().map(|k| k.display().to_string()).collect();
        assert_eq!(
            filenames,
            vec![
                "/etc/apache2/sites-enabled/35_vhostgen_normal_vhost_example.com.conf",
                "/etc/apache2/sites-enabled/35_vhostgen_ssl_vhost_example.com.conf",
            ]
        );

        let normal = &batch.vhosts()[&PathBuf::from(&filenames[0])];
        assert!(normal.contains("<VirtualHost 203.0.113.4:80>"), "{normal}");
        assert!(normal.contains("ServerName example.com"), "{normal}");
        assert!(
            normal.contains("open_basedir \"/var/customers/webs/alice/example.com\""),
            "{normal}"
        );
    }

    #[test]
    fn specialsettings_are_substituted_and_appended() {
        let config = config();
        let mut record = domain("example.com");
        record.specialsettings = "Redirect / {SCHEME}://{DOMAIN}/".to_string();
        let input = BatchInput {
            domains: vec![record],
            listeners: vec![listener(80, false)],
            panel_certificate: None,
            protections: vec![],
        };

        let batch = build_batch(&config, &input);
        let content = batch.vhosts().values().next().unwrap();
        assert!(
            content.ends_with("Redirect / http://example.com/\n</VirtualHost>"),
            "{content}"
        );
    }

    #[test]
    fn protections_produce_htpasswd_and_apache_diroption() {
        let config = config();
        let input = BatchInput {
            domains: vec![],
            listeners: vec![],
            panel_certificate: None,
            protections: vec![DirectoryProtection {
                loginname: "alice".to_string(),
                path: PathBuf::from("/var/customers/webs/alice/secret"),
                auth_name: "Members".to_string(),
                credentials: vec!["alice:$apr1$x$y".to_string()],
            }],
        };

        let batch = build_batch(&config, &input);
        assert_eq!(batch.htpasswds().len(), 1);
        assert_eq!(batch.diroptions().len(), 1);

        let diroption = batch.diroptions().values().next().unwrap();
        assert!(diroption.contains("AuthName \"Members\""), "{diroption}");
        assert!(diroption.contains("alice-var_customers_webs_alice_secret.htpasswd"), "{diroption}");
    }

    #[test]
    fn nginx_gets_htpasswd_but_no_diroption_blocks() {
        let mut config = config();
        config.webserver = "nginx".to_string();
        let input = BatchInput {
            domains: vec![],
            listeners: vec![],
            panel_certificate: None,
            protections: vec![DirectoryProtection {
                loginname: "alice".to_string(),
                path: PathBuf::from("/var/customers/webs/alice/secret"),
                auth_name: "Members".to_string(),
                credentials: vec!["alice:$apr1$x$y".to_string()],
            }],
        };

        let batch = build_batch(&config, &input);
        assert_eq!(batch.htpasswds().len(), 1);
        assert!(batch.diroptions().is_empty());
    }

    #[test]
    fn panel_vhosts_redirect_to_alternate_ssl_port_once_certified() {
        let mut config = config();
        config.panel_hostname = "panel.example.net".to_string();
        let mut certified = listener(8443, true);
        certified.ssl_cert_file = "/etc/ssl/panel.crt".to_string();
        let input = BatchInput {
            domains: vec![],
            listeners: vec![listener(80, false), certified],
            panel_certificate: Some(CertificateLifecycle {
                ssl_cert_file: "/etc/ssl/panel.crt".to_string(),
                expirationdate: Some(chrono::Utc::now() + chrono::Duration::days(60)),
            }),
            protections: vec![],
        };

        let batch = build_batch(&config, &input);
        assert_eq!(batch.vhosts().len(), 2);

        let plain = &batch.vhosts()[&PathBuf::from(
            "/etc/apache2/sites-enabled/01_vhostgen_ipandport_203.0.113.4:80.conf",
        )];
        assert!(
            plain.contains("https://panel.example.net:8443/"),
            "missing redirect: {plain}"
        );
    }

    #[test]
    fn renewal_due_panel_certificate_suppresses_the_redirect() {
        let mut config = config();
        config.panel_hostname = "panel.example.net".to_string();
        let input = BatchInput {
            domains: vec![],
            listeners: vec![listener(80, false)],
            panel_certificate: Some(CertificateLifecycle {
                ssl_cert_file: "/etc/ssl/panel.crt".to_string(),
                expirationdate: None,
            }),
            protections: vec![],
        };

        let batch = build_batch(&config, &input);
        let plain = batch.vhosts().values().next().unwrap();
        assert!(!plain.contains("https://"), "unexpected redirect: {plain}");
    }

    #[test]
    fn ssl_panel_vhost_requires_a_managed_certificate() {
        let mut config = config();
        config.panel_hostname = "panel.example.net".to_string();
        let input = BatchInput {
            domains: vec![],
            listeners: vec![listener(8443, true)],
            panel_certificate: None,
            protections: vec![],
        };

        let batch = build_batch(&config, &input);
        assert!(batch.vhosts().is_empty());
    }

    #[test]
    fn panel_docroot_resolution_order() {
        let mut config = config();
        assert_eq!(panel_docroot("/srv/override", &config), PathBuf::from("/srv/override"));
        assert_eq!(panel_docroot("", &config), PathBuf::from("/var/www"));
        config.panel_directly_via_hostname = true;
        assert_eq!(panel_docroot("", &config), PathBuf::from("/var/www/panel"));
    }

    #[test]
    fn open_basedir_uses_docroot_by_default() {
        let config = config();
        let record = domain("example.com");
        assert_eq!(open_basedir_value(&record, &config), "/var/customers/webs/alice/example.com");
    }

    #[test]
    fn open_basedir_flag_and_colon_docroot_switch_to_customerroot() {
        let config = config();
        let mut flagged = domain("example.com");
        flagged.openbasedir_to_customerroot = true;
        assert_eq!(open_basedir_value(&flagged, &config), "/var/customers/webs/alice");

        let mut odd = domain("example.com");
        odd.documentroot = "phar://weird".to_string();
        assert_eq!(open_basedir_value(&odd, &config), "/var/customers/webs/alice");
    }

    #[test]
    fn open_basedir_appends_custom_list() {
        let mut config = config();
        config.php_append_open_basedir = "/usr/share/php:/tmp".to_string();
        let record = domain("example.com");
        assert_eq!(
            open_basedir_value(&record, &config),
            "/var/customers/webs/alice/example.com:/usr/share/php:/tmp"
        );
    }
}
