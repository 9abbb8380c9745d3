//! Aggregated-file versus one-file-per-entity target layouts.

use std::path::Path;

/// How a config category is materialized on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetLayout {
    /// All entries concatenated into one file at the configured path.
    Aggregated,
    /// One file per entry inside the configured directory.
    PerEntity,
}

/// Decide the layout for a configured destination path.
///
/// A path that already is a directory holds per-entity files; a path
/// that does not exist yet counts as a directory only when it is
/// spelled with a trailing separator. Anything else is a single
/// aggregated file at exactly that path.
pub fn resolve(path: &Path) -> TargetLayout {
    if path.is_dir() {
        return TargetLayout::PerEntity;
    }
    if !path.exists() && path.as_os_str().to_string_lossy().ends_with('/') {
        return TargetLayout::PerEntity;
    }
    TargetLayout::Aggregated
}
