//! Account section assembly
//!
//! [`assemble`] is a pure, total transformation of a validated
//! [`AccountRecord`] (plus an optional anchor registry hit) into the typed
//! sections of the account page. It never fails: empty balances, signers or
//! flags produce empty sections, and unknown flag keys are rendered like any
//! other.

use serde::Serialize;
use steexp_types::{AccountRecord, AnchorEntry, AssetType, Balance, NATIVE_ASSET_CODE};

/// Every section of the account page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSections {
    pub identity: IdentitySection,
    pub balances: Vec<BalanceRow>,
    /// Signer rows; rendered in one panel next to `thresholds`
    pub signing: Vec<SignerRow>,
    pub thresholds: ThresholdsSection,
    pub flags: Vec<FlagRow>,
}

/// Who the account is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentitySection {
    pub account_id: String,
    /// Anchor name when known, otherwise the account id
    pub label: String,
    pub anchor: Option<AnchorBadge>,
}

/// Anchor metadata shown in the identity section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorBadge {
    pub name: String,
    pub logo_url: Option<String>,
    pub domain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceRow {
    /// Stable row key: asset code, native code, or pool id
    pub key: String,
    /// Display label of the asset
    pub asset: String,
    pub asset_type: AssetType,
    pub issuer: Option<String>,
    pub balance: String,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignerRow {
    pub public_key: String,
    pub weight: u32,
    pub signer_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThresholdsSection {
    pub low: u8,
    pub medium: u8,
    pub high: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagRow {
    pub name: String,
    /// `true`/`false` for booleans, decimal text for integers
    pub value: String,
}

/// Decompose a record into display sections
pub fn assemble(record: &AccountRecord, anchor: Option<&AnchorEntry>) -> AccountSections {
    AccountSections {
        identity: identity(&record.id, anchor),
        balances: record.balances.iter().map(balance_row).collect(),
        signing: record
            .signers
            .iter()
            .map(|s| SignerRow {
                public_key: s.public_key.clone(),
                weight: s.weight,
                signer_type: s.signer_type.clone(),
            })
            .collect(),
        thresholds: ThresholdsSection {
            low: record.thresholds.low,
            medium: record.thresholds.medium,
            high: record.thresholds.high,
        },
        flags: record
            .flags
            .iter()
            .map(|(name, value)| FlagRow {
                name: name.clone(),
                value: value.to_string(),
            })
            .collect(),
    }
}

/// Shorten a key or hash for narrow columns
pub fn short_key(key: &str) -> String {
    match key.char_indices().nth(12) {
        Some((idx, _)) => format!("{}...", &key[..idx]),
        None => key.to_string(),
    }
}

fn identity(account_id: &str, anchor: Option<&AnchorEntry>) -> IdentitySection {
    let badge = anchor.map(|a| AnchorBadge {
        name: a.name.clone(),
        logo_url: a.logo_url.clone(),
        domain: a.domain.clone(),
    });
    IdentitySection {
        account_id: account_id.to_string(),
        label: badge
            .as_ref()
            .map_or_else(|| account_id.to_string(), |b| b.name.clone()),
        anchor: badge,
    }
}

fn balance_row(balance: &Balance) -> BalanceRow {
    let asset = match balance.asset_type {
        AssetType::Native => NATIVE_ASSET_CODE.to_string(),
        AssetType::LiquidityPoolShares => balance.liquidity_pool_id.clone().unwrap_or_default(),
        AssetType::CreditAlphanum4 | AssetType::CreditAlphanum12 => {
            balance.asset_code.clone().unwrap_or_default()
        }
    };
    // Validated records never reach here with an empty label.
    let asset = if asset.is_empty() {
        balance.asset_type.to_string()
    } else {
        asset
    };

    BalanceRow {
        key: asset.clone(),
        asset,
        asset_type: balance.asset_type,
        issuer: balance.asset_issuer.clone(),
        balance: balance.balance.clone(),
        limit: balance.limit.clone(),
    }
}
