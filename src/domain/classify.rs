use std::path::{Path, PathBuf};

use super::DomainRecord;

/// Load-order tier encoded into vhost filenames.
///
/// Webservers load vhost files in lexical filename order, so the tier
/// prefix makes deeper (narrower) definitions load before broader ones:
/// subdomains sort below promoted subdomains (`30`), which sort below
/// real apex domains (`35`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VhostPriority(String);

impl VhostPriority {
    /// Compute the tier for one domain record.
    ///
    /// True subdomains get `30 - dots + 1`, one tier per nesting level.
    /// Domains with more than 30 label separators produce a negative
    /// tier; that value is emitted as-is, matching the historical
    /// filename scheme.
    pub fn for_domain(record: &DomainRecord) -> Self {
        if record.is_apex() && !record.is_std_subdomain && !record.is_promoted() {
            return VhostPriority("35".to_string());
        }
        if record.is_apex() && !record.is_std_subdomain && record.is_promoted() {
            return VhostPriority("30".to_string());
        }
        let dots = record.domain.matches('.').count() as i32;
        VhostPriority((30 - dots + 1).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Filename for a domain's vhost file under the configured vhost path.
///
/// `{tier}_{vendor}_{normal|ssl}_vhost_{domain}.conf` — the tier prefix
/// carries the load order, the `normal`/`ssl` segment keeps the plain
/// and TLS definitions for one domain apart.
pub fn vhost_filename(
    vhost_dir: &Path,
    vendor: &str,
    record: &DomainRecord,
    ssl: bool,
) -> PathBuf {
    let tier = VhostPriority::for_domain(record);
    let kind = if ssl { "ssl" } else { "normal" };
    vhost_dir.join(format!("{}_{}_{}_vhost_{}.conf", tier.as_str(), vendor, kind, record.domain))
}

/// Filename for a fixed infrastructure vhost entry, e.g. one per
/// IP:port bind: `{number}_{vendor}_{type}[_{content}].conf`.
pub fn custom_vhost_filename(
    vhost_dir: &Path,
    vendor: &str,
    number: &str,
    kind: &str,
    content: Option<&str>,
) -> PathBuf {
    let suffix = match content {
        Some(content) if !content.is_empty() => format!("_{content}"),
        _ => String::new(),
    };
    vhost_dir.join(format!("{number}_{vendor}_{kind}{suffix}.conf"))
}
