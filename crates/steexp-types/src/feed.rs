//! Requests handed to the paginated history list collaborators

use serde::{Deserialize, Serialize};

/// Which history feed of an account a list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Operations,
    Transactions,
}

impl FeedKind {
    /// Path segment of the feed under an account resource
    pub fn path(&self) -> &'static str {
        match self {
            Self::Operations => "operations",
            Self::Transactions => "transactions",
        }
    }
}

/// What the account view passes to one paginated sub-list
///
/// The sub-list owns its own pagination state; this is only its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRequest {
    pub kind: FeedKind,
    pub account_id: String,
    pub page_size: u32,
    pub paging_enabled: bool,
}

impl FeedRequest {
    pub fn new(kind: FeedKind, account_id: impl Into<String>, page_size: u32, paging_enabled: bool) -> Self {
        Self {
            kind,
            account_id: account_id.into(),
            page_size,
            paging_enabled,
        }
    }
}
