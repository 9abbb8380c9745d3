//! Placeholder substitution for admin-supplied config fragments.
//!
//! "Special settings" fragments are free-form webserver directives with
//! `{NAME}` placeholders. Only the documented names are substituted;
//! anything else — including unknown placeholders and stray braces — is
//! copied through verbatim. Administrators rely on that passthrough for
//! forward compatibility, so an unknown name is never an error.

use std::collections::BTreeMap;

use super::DomainRecord;

/// Resolved placeholder values for one domain/ip/port combination.
#[derive(Debug, Clone)]
pub struct TemplateVars {
    vars: BTreeMap<&'static str, String>,
}

impl TemplateVars {
    /// Build the documented placeholder set:
    /// `DOMAIN`, `CUSTOMER`, `IP`, `PORT`, `SCHEME`, `DOCROOT`.
    pub fn for_domain(record: &DomainRecord, ip: &str, port: u16, ssl: bool) -> Self {
        let mut vars = BTreeMap::new();
        vars.insert("DOMAIN", record.domain.clone());
        vars.insert("CUSTOMER", record.loginname.clone());
        vars.insert("IP", ip.to_string());
        vars.insert("PORT", port.to_string());
        vars.insert("SCHEME", if ssl { "https" } else { "http" }.to_string());
        vars.insert("DOCROOT", record.documentroot.clone());
        Self { vars }
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

/// Substitute `{NAME}` placeholders in a template fragment.
///
/// Single left-to-right scan; a `{...}` span is replaced only when the
/// enclosed name resolves, otherwise the span is emitted unchanged.
pub fn substitute(template: &str, vars: &TemplateVars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        match after_open.find('}') {
            Some(close) => {
                let name = &after_open[..close];
                match vars.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after_open[close + 1..];
            }
            None => {
                // Unclosed brace, keep the tail as-is.
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}
