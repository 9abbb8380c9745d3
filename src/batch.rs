//! Accumulates generated config text per target filename for one pass.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One config category: target filename mapped to rendered text.
///
/// `BTreeMap` keeps entries in ascending filename order, which is the
/// load order the tier-prefixed filenames encode.
pub type CategoryEntries = BTreeMap<PathBuf, String>;

/// Generated output of one pass, prior to write-out.
///
/// Built by the caller, then handed by value to
/// [`crate::writer::write_configs`]; nothing here touches the
/// filesystem.
#[derive(Debug, Default)]
pub struct ConfigBatch {
    vhosts: CategoryEntries,
    diroptions: CategoryEntries,
    htpasswds: CategoryEntries,
}

impl ConfigBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one vhost file. Filenames must be unique within a batch; a
    /// duplicate is a bug in the calling builder, so it fails loudly in
    /// every build profile rather than silently dropping an entry.
    pub fn add_vhost(&mut self, filename: PathBuf, content: String) {
        let previous = self.vhosts.insert(filename.clone(), content);
        assert!(previous.is_none(), "duplicate vhost filename: {}", filename.display());
    }

    pub fn add_diroption(&mut self, filename: PathBuf, content: String) {
        self.diroptions.insert(filename, content);
    }

    /// Add htpasswd lines for a file. Entries for the same file are
    /// appended; duplicates are filtered at write time.
    pub fn add_htpasswd(&mut self, filename: PathBuf, lines: String) {
        self.htpasswds
            .entry(filename)
            .and_modify(|existing| {
                if !existing.ends_with('\n') {
                    existing.push('\n');
                }
                existing.push_str(&lines);
            })
            .or_insert(lines);
    }

    pub fn vhosts(&self) -> &CategoryEntries {
        &self.vhosts
    }

    pub fn diroptions(&self) -> &CategoryEntries {
        &self.diroptions
    }

    pub fn htpasswds(&self) -> &CategoryEntries {
        &self.htpasswds
    }

    pub fn is_empty(&self) -> bool {
        self.vhosts.is_empty() && self.diroptions.is_empty() && self.htpasswds.is_empty()
    }
}

/// Concatenate a category's entries in ascending filename order,
/// separated by blank lines, for aggregated-mode output.
pub fn aggregate(entries: &CategoryEntries) -> String {
    let mut out = String::new();
    for content in entries.values() {
        out.push_str(content);
        out.push_str("\n\n");
    }
    out
}

/// Deduplicate htpasswd lines, preserving first-seen order.
pub fn dedup_lines(content: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for line in content.split('\n') {
        if !seen.contains(&line) {
            seen.push(line);
        }
    }
    seen.join("\n")
}

/// Sanitized path token used in per-entity filenames derived from a
/// protected directory path.
pub fn path_token(path: &Path) -> String {
    path.display()
        .to_string()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}
