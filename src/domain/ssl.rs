//! SSL listener selection and managed-certificate lifecycle checks.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Default HTTPS port; never offered as an *alternate* SSL binding.
const DEFAULT_SSL_PORT: u16 = 443;

/// Days before expiry at which a managed certificate is due for renewal.
const RENEWAL_WINDOW_DAYS: i64 = 30;

/// One configured IP:port listener, as recorded in the panel.
#[derive(Debug, Clone, Deserialize)]
pub struct SslListener {
    #[serde(default)]
    pub ip: String,
    pub port: u16,
    #[serde(default)]
    pub ssl: bool,
    /// Path of an already-deployed certificate, if any.
    #[serde(default)]
    pub ssl_cert_file: String,
    /// Per-bind docroot override for the panel vhost.
    #[serde(default)]
    pub docroot: String,
}

/// Certificate lifecycle record for the panel's own vhost.
///
/// Customer certificates are handled elsewhere; this record is the one
/// with domain scope 0 in the panel database.
#[derive(Debug, Clone, Deserialize)]
pub struct CertificateLifecycle {
    #[serde(default)]
    pub ssl_cert_file: String,
    /// Unset means the expiry was never recorded, which counts as due.
    #[serde(default)]
    pub expirationdate: Option<DateTime<Utc>>,
}

/// Pick the alternate SSL port offered in generated redirect templates.
///
/// Considers SSL listeners on non-default ports only, preferring ones
/// that already carry a certificate, then the lowest port. `None` means
/// no alternate binding exists and templates omit the port suffix.
pub fn alternate_ssl_port(listeners: &[SslListener]) -> Option<u16> {
    listeners
        .iter()
        .filter(|listener| listener.ssl && listener.port != DEFAULT_SSL_PORT)
        .min_by_key(|listener| (listener.ssl_cert_file.is_empty(), listener.port))
        .map(|listener| listener.port)
}

/// Port suffix for URL templates: `":8443"` or empty.
pub fn alternate_ssl_port_suffix(listeners: &[SslListener]) -> String {
    match alternate_ssl_port(listeners) {
        Some(port) => format!(":{port}"),
        None => String::new(),
    }
}

/// Whether the panel vhost already has a managed certificate deployed.
pub fn has_managed_certificate(record: Option<&CertificateLifecycle>) -> bool {
    record.is_some_and(|cert| !cert.ssl_cert_file.is_empty())
}

/// Whether the panel certificate is due for renewal at `now`.
///
/// Due when the expiry is inside the renewal window or was never
/// recorded. Independent of [`has_managed_certificate`]: a certificate
/// can exist and be due at the same time.
pub fn needs_renewal_at(record: Option<&CertificateLifecycle>, now: DateTime<Utc>) -> bool {
    let Some(cert) = record else {
        return false;
    };
    if cert.ssl_cert_file.is_empty() {
        return false;
    }
    match cert.expirationdate {
        None => true,
        Some(expiry) => expiry < now + Duration::days(RENEWAL_WINDOW_DAYS),
    }
}

/// [`needs_renewal_at`] against the current wall clock.
pub fn needs_renewal(record: Option<&CertificateLifecycle>) -> bool {
    needs_renewal_at(record, Utc::now())
}
