//! Horizon JSON shapes and their mapping onto the canonical types

use serde::Deserialize;
use steexp_types::{AccountRecord, Balance, FlagSet, InvariantViolation, Signer, Thresholds};

/// Account resource as served by `GET /accounts/{id}`
#[derive(Debug, Deserialize)]
pub(crate) struct HorizonAccount {
    pub id: String,
    pub balances: Vec<Balance>,
    pub signers: Vec<HorizonSigner>,
    pub thresholds: HorizonThresholds,
    pub flags: FlagSet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HorizonSigner {
    #[serde(alias = "public_key")]
    pub key: String,
    pub weight: u32,
    #[serde(rename = "type")]
    pub signer_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HorizonThresholds {
    pub low_threshold: u8,
    pub med_threshold: u8,
    pub high_threshold: u8,
}

impl HorizonAccount {
    /// Convert into a validated record; never partially assembled
    pub fn into_record(self) -> Result<AccountRecord, InvariantViolation> {
        let record = AccountRecord {
            id: self.id,
            balances: self.balances,
            signers: self
                .signers
                .into_iter()
                .map(|s| Signer {
                    public_key: s.key,
                    weight: s.weight,
                    signer_type: s.signer_type,
                })
                .collect(),
            thresholds: Thresholds {
                low: self.thresholds.low_threshold,
                medium: self.thresholds.med_threshold,
                high: self.thresholds.high_threshold,
            },
            flags: self.flags,
        };
        record.validate()?;
        Ok(record)
    }
}

/// Collection resource envelope (`_embedded.records`)
#[derive(Debug, Deserialize)]
pub(crate) struct HorizonPage<T> {
    #[serde(rename = "_embedded")]
    pub embedded: Embedded<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Embedded<T> {
    pub records: Vec<T>,
}

/// Problem document returned with error statuses
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Problem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}
