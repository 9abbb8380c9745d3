use serde::Deserialize;

/// One hosting-account domain as it exists in the panel database.
///
/// Records are an immutable snapshot for a single generation pass; the
/// batch file carries them already joined with their owning customer.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainRecord {
    /// Panel-internal domain id.
    pub id: u32,
    /// Fully qualified domain name.
    pub domain: String,
    /// Id of the parent domain, 0 for apex domains.
    #[serde(default)]
    pub parent_domain_id: u32,
    /// Whether this is an auto-created standard subdomain of a customer.
    #[serde(default)]
    pub is_std_subdomain: bool,
    /// Id of the domain this one is promoted under, 0 if not promoted.
    #[serde(default)]
    pub is_main_but_subto: u32,
    /// Whether the promoted relation target still exists in the batch.
    #[serde(default)]
    pub main_to_sub_exists: bool,
    /// Document root served for this domain.
    pub documentroot: String,
    /// Home directory of the owning customer.
    pub customerroot: String,
    /// Login name of the owning customer.
    pub loginname: String,
    /// Restrict open_basedir to the customer root instead of the docroot.
    #[serde(default)]
    pub openbasedir_to_customerroot: bool,
    /// Free-form admin-supplied config fragment, substituted per vhost.
    #[serde(default)]
    pub specialsettings: String,
}

impl DomainRecord {
    /// An apex domain is one without a parent domain.
    pub fn is_apex(&self) -> bool {
        self.parent_domain_id == 0
    }

    /// A promoted subdomain behaves as an apex for ordering purposes
    /// while its relation to the real main domain still exists.
    pub fn is_promoted(&self) -> bool {
        self.is_main_but_subto > 0 && self.main_to_sub_exists
    }
}
