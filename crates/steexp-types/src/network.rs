//! Network selection for the remote data provider

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ledger network whose Horizon instance serves account data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Public,
    Testnet,
    Futurenet,
    /// A Horizon instance on the local machine
    Local,
}

impl Network {
    /// Base URL of the network's Horizon server
    pub fn horizon_url(&self) -> &'static str {
        match self {
            Self::Public => "https://horizon.stellar.org",
            Self::Testnet => "https://horizon-testnet.stellar.org",
            Self::Futurenet => "https://horizon-futurenet.stellar.org",
            Self::Local => "http://localhost:8000",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Testnet => "testnet",
            Self::Futurenet => "futurenet",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" | "pubnet" | "mainnet" => Ok(Self::Public),
            "testnet" | "test" => Ok(Self::Testnet),
            "futurenet" => Ok(Self::Futurenet),
            "local" | "localhost" => Ok(Self::Local),
            other => Err(format!("unknown network: {}", other)),
        }
    }
}
