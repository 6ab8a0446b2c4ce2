//! Anchor (known issuer) metadata

use serde::{Deserialize, Serialize};

/// Display metadata for a known issuer, keyed by its account id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorEntry {
    /// Account identifier of the anchor
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Logo image URL
    pub logo_url: Option<String>,
    /// Home domain
    pub domain: Option<String>,
}

impl AnchorEntry {
    /// Create an entry with only a name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            logo_url: None,
            domain: None,
        }
    }

    /// Set the logo URL
    pub fn with_logo(mut self, logo_url: impl Into<String>) -> Self {
        self.logo_url = Some(logo_url.into());
        self
    }

    /// Set the home domain
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}
