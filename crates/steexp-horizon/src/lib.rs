//! Steexp Horizon - Data provider client for the ledger explorer
//!
//! This crate is the I/O boundary of the explorer. It retrieves one account's
//! full record by identifier and classifies every failure into a
//! [`FetchError`]:
//!
//! - `404`/`400` → [`FetchError::NotFound`]
//! - other HTTP failures, connect errors and timeouts → [`FetchError::Transport`]
//! - bodies that are not a valid account record → [`FetchError::MalformedResponse`]
//!
//! It also serves the two history feeds (operations, transactions) that the
//! account view hands off to paginated sub-lists.
//!
//! # Quick Start
//!
//! ```ignore
//! use steexp_horizon::{AccountRecordFetcher, HorizonClient};
//! use steexp_types::Network;
//!
//! let horizon = HorizonClient::for_network(Network::Testnet)?;
//! let record = horizon.fetch("GABC...").await?;
//! println!("{} balances", record.balances.len());
//! ```
//!
//! There is no caching and no retry: every call is a single attempt.

mod client;
mod feed;
mod wire;

pub use client::{HorizonClient, HorizonConfig, HorizonError};
pub use feed::{OperationSummary, Page, TransactionSummary};

use async_trait::async_trait;
use steexp_types::{AccountRecord, FetchResult};

pub use steexp_types::FetchError;

/// Async retrieval of one account's full record
#[async_trait]
pub trait AccountRecordFetcher: Send + Sync {
    /// Fetch the current record for `account_id`; a single attempt
    async fn fetch(&self, account_id: &str) -> FetchResult<AccountRecord>;
}
