//! History feed records for the operations and transactions sub-lists

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page of a history feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    /// Cursor for the following page, when paging is enabled and more may exist
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub(crate) fn from_records(records: Vec<T>, page_size: u32, paging_enabled: bool, token: impl Fn(&T) -> &str) -> Self {
        let next_cursor = if paging_enabled && records.len() >= page_size as usize {
            records.last().map(|r| token(r).to_string())
        } else {
            None
        };
        Self { records, next_cursor }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Summary row of an operation in an account's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSummary {
    pub id: String,
    pub paging_token: String,
    #[serde(rename = "type")]
    pub operation_type: String,
    pub created_at: DateTime<Utc>,
    pub transaction_hash: String,
    pub source_account: String,
}

/// Summary row of a transaction in an account's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub id: String,
    pub paging_token: String,
    pub hash: String,
    pub created_at: DateTime<Utc>,
    pub source_account: String,
    pub operation_count: u32,
    #[serde(default = "default_successful")]
    pub successful: bool,
}

fn default_successful() -> bool {
    true
}
