//! Steexp Explorer - Account snapshot acquisition and presentation assembly
//!
//! This crate is the core of the account page of the ledger explorer:
//!
//! ```text
//! account id ──▶ AccountLoader ──▶ AccountRecordFetcher ──▶ AccountRecord
//!                                                               │
//!                       AnchorRegistry ──▶ assemble() ◀─────────┘
//!                                              │
//!                                              ▼
//!                     AccountView { sections, operations, transactions }
//! ```
//!
//! - [`AnchorRegistry`]: static, shared, read-only table of known issuers
//! - [`AccountLoader`]: fetch lifecycle with stale-result protection
//! - [`assemble`]: pure, total decomposition of a record into sections
//! - [`AccountView`] / [`AccountExplorer`]: the composed page and the facade
//!   a presentation layer drives
//!
//! Layout, string lookup, routing and the paginated history lists are left to
//! presentation layers.

pub mod anchors;
pub mod assembler;
pub mod config;
pub mod error;
pub mod loader;
pub mod view;

pub use anchors::AnchorRegistry;
pub use assembler::{
    assemble, short_key, AccountSections, AnchorBadge, BalanceRow, FlagRow, IdentitySection, SignerRow,
    ThresholdsSection,
};
pub use config::{AnchorSettings, ExplorerConfig, HorizonSettings, LoggingConfig};
pub use error::{ExplorerError, Result};
pub use loader::{AccountLoader, LoadState, RequestToken};
pub use view::{AccountExplorer, AccountView, ListSettings, Screen};
