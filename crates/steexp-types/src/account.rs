//! Account snapshot types
//!
//! An [`AccountRecord`] is the full current state of one ledger account as
//! returned by the data provider. Records are immutable once fetched; a new
//! identifier always produces a wholly new record.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::InvariantViolation;

// ============================================================================
// Account Record
// ============================================================================

/// Full current state of a ledger account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account identifier (public key)
    pub id: String,
    /// Asset balances, in provider order
    pub balances: Vec<Balance>,
    /// Keys authorized to sign for the account, in provider order
    pub signers: Vec<Signer>,
    /// Weight sums required per operation sensitivity
    pub thresholds: Thresholds,
    /// Provider-defined account flags
    pub flags: FlagSet,
}

impl AccountRecord {
    /// Check the shape invariants every record must satisfy before assembly
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if self.id.trim().is_empty() {
            return Err(InvariantViolation::EmptyAccountId);
        }

        for balance in &self.balances {
            balance.validate()?;
        }

        let mut seen = HashSet::with_capacity(self.signers.len());
        for signer in &self.signers {
            if !seen.insert(signer.public_key.as_str()) {
                return Err(InvariantViolation::DuplicateSigner {
                    public_key: signer.public_key.clone(),
                });
            }
        }

        Ok(())
    }
}

// ============================================================================
// Balances
// ============================================================================

/// Kind of asset held in a balance line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    /// The ledger's base currency
    Native,
    /// Issued asset with a 1-4 character code
    CreditAlphanum4,
    /// Issued asset with a 5-12 character code
    CreditAlphanum12,
    /// Shares in a liquidity pool, identified by pool id
    LiquidityPoolShares,
}

impl AssetType {
    /// Whether this is the ledger's base currency
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }

    /// Wire name of the asset type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::CreditAlphanum4 => "credit_alphanum4",
            Self::CreditAlphanum12 => "credit_alphanum12",
            Self::LiquidityPoolShares => "liquidity_pool_shares",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One balance line of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub asset_type: AssetType,
    /// Asset code; absent for the native asset
    pub asset_code: Option<String>,
    /// Issuing account; absent for the native asset
    pub asset_issuer: Option<String>,
    /// Pool identifier; only for liquidity pool shares
    pub liquidity_pool_id: Option<String>,
    /// Decimal string, as returned by the provider
    pub balance: String,
    /// Trustline limit; absent for the native asset
    pub limit: Option<String>,
}

impl Balance {
    /// A native asset balance
    pub fn native(balance: impl Into<String>) -> Self {
        Self {
            asset_type: AssetType::Native,
            asset_code: None,
            asset_issuer: None,
            liquidity_pool_id: None,
            balance: balance.into(),
            limit: None,
        }
    }

    /// An issued asset balance; the asset type follows from the code length
    pub fn credit(
        code: impl Into<String>,
        issuer: impl Into<String>,
        balance: impl Into<String>,
        limit: Option<String>,
    ) -> Self {
        let code = code.into();
        let asset_type = if code.len() <= 4 {
            AssetType::CreditAlphanum4
        } else {
            AssetType::CreditAlphanum12
        };
        Self {
            asset_type,
            asset_code: Some(code),
            asset_issuer: Some(issuer.into()),
            liquidity_pool_id: None,
            balance: balance.into(),
            limit,
        }
    }

    /// Check the asset/amount invariants of this line
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let has_code = self.asset_code.as_deref().is_some_and(|c| !c.is_empty());
        let has_issuer = self.asset_issuer.as_deref().is_some_and(|i| !i.is_empty());

        match self.asset_type {
            AssetType::Native => {
                if self.asset_code.is_some() || self.asset_issuer.is_some() {
                    return Err(InvariantViolation::NativeWithIssuer);
                }
            }
            AssetType::CreditAlphanum4 | AssetType::CreditAlphanum12 => {
                if !has_code || !has_issuer {
                    return Err(InvariantViolation::CreditWithoutIssuer {
                        asset_type: self.asset_type,
                    });
                }
            }
            AssetType::LiquidityPoolShares => {
                if self.liquidity_pool_id.as_deref().map_or(true, str::is_empty) {
                    return Err(InvariantViolation::PoolWithoutId);
                }
            }
        }

        check_decimal("balance", &self.balance)?;
        if let Some(limit) = &self.limit {
            check_decimal("limit", limit)?;
        }

        Ok(())
    }
}

fn check_decimal(field: &'static str, value: &str) -> Result<(), InvariantViolation> {
    Decimal::from_str(value)
        .map(|_| ())
        .map_err(|_| InvariantViolation::InvalidDecimal {
            field,
            value: value.to_string(),
        })
}

// ============================================================================
// Signing
// ============================================================================

/// A key authorized to sign for the account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signer {
    pub public_key: String,
    pub weight: u32,
    /// Provider-defined key type (e.g. `ed25519_public_key`)
    #[serde(rename = "type")]
    pub signer_type: String,
}

/// Weight sums required to authorize low/medium/high operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub low: u8,
    pub medium: u8,
    pub high: u8,
}

// ============================================================================
// Flags
// ============================================================================

/// Value of a single account flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{}", value),
            Self::Int(value) => write!(f, "{}", value),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Open, provider-defined set of flags keyed by name
///
/// Keys are not known in advance; iteration follows the provider's order.
pub type FlagSet = IndexMap<String, FlagValue>;
