//! HTTP client for a Horizon server

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use steexp_types::{AccountRecord, FeedKind, FeedRequest, FetchError, FetchResult, Network};

use crate::feed::{OperationSummary, Page, TransactionSummary};
use crate::wire::{HorizonAccount, HorizonPage, Problem};
use crate::AccountRecordFetcher;

// ============================================================================
// Error Types
// ============================================================================

/// Errors building a client
#[derive(Debug, thiserror::Error)]
pub enum HorizonError {
    #[error("Invalid Horizon URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

// ============================================================================
// Configuration
// ============================================================================

/// Client configuration
#[derive(Debug, Clone)]
pub struct HorizonConfig {
    /// Horizon base URL
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self::for_network(Network::default())
    }
}

impl HorizonConfig {
    /// Configuration pointing at a network's public Horizon
    pub fn for_network(network: Network) -> Self {
        Self {
            base_url: network.horizon_url().to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client for one Horizon server
#[derive(Debug, Clone)]
pub struct HorizonClient {
    base_url: Url,
    client: Client,
}

impl HorizonClient {
    /// Create a client from configuration
    pub fn new(config: HorizonConfig) -> Result<Self, HorizonError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| HorizonError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(HorizonError::InvalidUrl {
                url: config.base_url,
                reason: "not a base URL".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("steexp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { base_url, client })
    }

    /// Create a client for a network's public Horizon
    pub fn for_network(network: Network) -> Result<Self, HorizonError> {
        Self::new(HorizonConfig::for_network(network))
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// URL of the raw JSON account resource
    pub fn account_url(&self, account_id: &str) -> String {
        self.endpoint(&["accounts", account_id]).to_string()
    }

    /// Fetch one page of an account's operations
    pub async fn operations(
        &self,
        request: &FeedRequest,
        cursor: Option<&str>,
    ) -> FetchResult<Page<OperationSummary>> {
        self.feed_page(FeedKind::Operations, request, cursor, |op: &OperationSummary| {
            op.paging_token.as_str()
        })
        .await
    }

    /// Fetch one page of an account's transactions
    pub async fn transactions(
        &self,
        request: &FeedRequest,
        cursor: Option<&str>,
    ) -> FetchResult<Page<TransactionSummary>> {
        self.feed_page(FeedKind::Transactions, request, cursor, |tx: &TransactionSummary| {
            tx.paging_token.as_str()
        })
        .await
    }

    async fn feed_page<T: DeserializeOwned>(
        &self,
        kind: FeedKind,
        request: &FeedRequest,
        cursor: Option<&str>,
        token: impl Fn(&T) -> &str,
    ) -> FetchResult<Page<T>> {
        let mut url = self.endpoint(&["accounts", &request.account_id, kind.path()]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &request.page_size.to_string());
            query.append_pair("order", "desc");
            if let Some(cursor) = cursor {
                query.append_pair("cursor", cursor);
            }
        }

        let page: HorizonPage<T> = self.get_json(url, &request.account_id).await?;
        Ok(Page::from_records(
            page.embedded.records,
            request.page_size,
            request.paging_enabled,
            token,
        ))
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, account_id: &str) -> FetchResult<T> {
        tracing::debug!(url = %url, "Horizon request");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            return Err(FetchError::NotFound {
                account_id: account_id.to_string(),
            });
        }
        if !status.is_success() {
            let problem: Problem = resp.json().await.unwrap_or_default();
            let message = problem
                .detail
                .or(problem.title)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(FetchError::Transport {
                status: Some(status.as_u16()),
                message,
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| FetchError::malformed(e.to_string()))
    }
}

#[async_trait]
impl AccountRecordFetcher for HorizonClient {
    async fn fetch(&self, account_id: &str) -> FetchResult<AccountRecord> {
        let url = self.endpoint(&["accounts", account_id]);
        let account: HorizonAccount = self.get_json(url, account_id).await?;
        Ok(account.into_record()?)
    }
}
