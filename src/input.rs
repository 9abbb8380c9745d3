//! Batch input file: the read-only data snapshot for one pass.
//!
//! The surrounding panel exports domain records, listeners, the panel
//! certificate record and directory protections into one TOML file;
//! this module only deserializes it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{AppError, CertificateLifecycle, DomainRecord, SslListener};

/// Everything one generation pass reads.
#[derive(Debug, Default, Deserialize)]
pub struct BatchInput {
    #[serde(default)]
    pub domains: Vec<DomainRecord>,
    #[serde(default)]
    pub listeners: Vec<SslListener>,
    /// Certificate lifecycle record for the panel's own vhost.
    #[serde(default)]
    pub panel_certificate: Option<CertificateLifecycle>,
    #[serde(default)]
    pub protections: Vec<DirectoryProtection>,
}

/// Basic-auth protection for one directory of one customer.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryProtection {
    pub loginname: String,
    pub path: PathBuf,
    #[serde(default = "default_auth_name")]
    pub auth_name: String,
    /// `user:hash` pairs; duplicates are filtered at write time.
    pub credentials: Vec<String>,
}

fn default_auth_name() -> String {
    "Restricted Area".to_string()
}

impl BatchInput {
    /// Load a batch snapshot from a TOML file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.is_file() {
            return Err(AppError::BatchMissing(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
