//! Error types for Steexp
//!
//! Fetch failures are classified once, at the data provider boundary, and
//! passed upward unmodified.

use thiserror::Error;

use crate::account::AssetType;

/// Result type for account fetches
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Classified failure of one account fetch attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The identifier does not name an existing account
    #[error("Account {account_id} not found")]
    NotFound { account_id: String },

    /// Network, timeout or server-side failure
    #[error("Transport error{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Transport { status: Option<u16>, message: String },

    /// The provider returned data that is not a valid account record
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },
}

impl FetchError {
    /// Transport error without an HTTP status
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Malformed response with a reason
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Whether this is a definitive "no such account"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<InvariantViolation> for FetchError {
    fn from(violation: InvariantViolation) -> Self {
        Self::malformed(violation.to_string())
    }
}

/// A broken account record shape invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("account id is empty")]
    EmptyAccountId,

    #[error("native balance carries an asset code or issuer")]
    NativeWithIssuer,

    #[error("{asset_type} balance is missing its asset code or issuer")]
    CreditWithoutIssuer { asset_type: AssetType },

    #[error("liquidity pool share balance is missing its pool id")]
    PoolWithoutId,

    #[error("{field} is not a decimal: {value:?}")]
    InvalidDecimal { field: &'static str, value: String },

    #[error("signer {public_key} listed more than once")]
    DuplicateSigner { public_key: String },
}
