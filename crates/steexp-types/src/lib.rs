//! Steexp Types - Canonical account types for the ledger explorer
//!
//! This crate contains the foundational types shared by every Steexp crate,
//! with zero dependencies on other steexp crates:
//!
//! - Account snapshot types (AccountRecord, Balance, Signer, Thresholds, FlagSet)
//! - Anchor (known issuer) metadata
//! - Network selection for the remote data provider
//! - Requests for the paginated history feeds
//! - The classified fetch error surfaced to presentation layers
//!
//! # Invariants
//!
//! An [`AccountRecord`] that passes [`AccountRecord::validate`] is safe to hand
//! to the section assembler: every balance has a well-formed asset, every
//! signer key is unique, and every flag is a boolean or an integer.

pub mod account;
pub mod anchor;
pub mod network;
pub mod feed;
pub mod error;

pub use account::*;
pub use anchor::*;
pub use network::*;
pub use feed::*;
pub use error::*;

/// Display code of the ledger's base currency
pub const NATIVE_ASSET_CODE: &str = "XLM";
