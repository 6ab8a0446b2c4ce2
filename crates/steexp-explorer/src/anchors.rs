//! Static registry of known anchors (asset issuers)
//!
//! The registry is built once, from a flat JSON object keyed by account id:
//!
//! ```json
//! { "GA5Z...": { "name": "Centre", "logo": "https://...", "domain": "centre.io" } }
//! ```
//!
//! It is never mutated after construction. A missing or malformed table
//! degrades to an empty registry; absence of a key is the common case.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use steexp_types::AnchorEntry;

use crate::error::{ExplorerError, Result};

const BUNDLED_ANCHORS: &str = include_str!("../data/anchors.json");

static BUNDLED: OnceLock<Arc<AnchorRegistry>> = OnceLock::new();

#[derive(Debug, Deserialize)]
struct AnchorSource {
    name: String,
    #[serde(default, alias = "img", alias = "logo_url")]
    logo: Option<String>,
    #[serde(default, alias = "website")]
    domain: Option<String>,
}

/// Read-only lookup table from account id to anchor metadata
#[derive(Debug, Clone, Default)]
pub struct AnchorRegistry {
    entries: HashMap<String, AnchorEntry>,
}

impl AnchorRegistry {
    /// A registry that knows no anchors
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from entries; a later entry with the same id replaces an earlier one
    pub fn from_entries(entries: impl IntoIterator<Item = AnchorEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.id.clone(), e)).collect(),
        }
    }

    /// Parse a JSON anchor table
    pub fn from_json(source: &str) -> Result<Self> {
        let raw: HashMap<String, AnchorSource> = serde_json::from_str(source)?;
        Ok(Self::from_entries(raw.into_iter().map(|(id, anchor)| AnchorEntry {
            id,
            name: anchor.name,
            logo_url: anchor.logo,
            domain: anchor.domain,
        })))
    }

    /// Parse a JSON anchor table, degrading to an empty registry
    pub fn from_json_or_empty(source: &str) -> Self {
        match Self::from_json(source) {
            Ok(registry) => {
                tracing::info!(anchors = registry.len(), "Anchor registry loaded");
                registry
            }
            Err(err) => {
                tracing::warn!(error = %err, "Anchor table unusable, starting with no anchors");
                Self::empty()
            }
        }
    }

    /// Read and parse an anchor table file, degrading to an empty registry
    pub fn load_or_empty(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(source) => Self::from_json_or_empty(&source),
            Err(source) => {
                let err = ExplorerError::AnchorFile {
                    path: path.to_path_buf(),
                    source,
                };
                tracing::warn!(error = %err, "Anchor table unusable, starting with no anchors");
                Self::empty()
            }
        }
    }

    /// The process-wide registry built from the table compiled into the binary
    pub fn bundled() -> Arc<Self> {
        Arc::clone(BUNDLED.get_or_init(|| Arc::new(Self::from_json_or_empty(BUNDLED_ANCHORS))))
    }

    /// Look up an account id
    pub fn lookup(&self, account_id: &str) -> Option<&AnchorEntry> {
        self.entries.get(account_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, ordered by name then id
    pub fn iter(&self) -> impl Iterator<Item = &AnchorEntry> {
        let mut entries: Vec<&AnchorEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        entries.into_iter()
    }
}
