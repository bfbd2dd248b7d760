use anyhow::Result;
use serde::{Deserialize, Serialize};

/// NetworkId identifies which of the two chain deployments the SDK is bound to.
///
/// The tag doubles as the path segment of explorer REST endpoints, so
/// `Display` renders the lowercase wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    Mainnet,
    Testnet,
}

impl Default for NetworkId {
    fn default() -> Self {
        Self::Mainnet
    }
}

impl std::str::FromStr for NetworkId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            _ => anyhow::bail!("Unknown network '{}'. Available options: mainnet, testnet", s),
        }
    }
}

impl std::fmt::Display for NetworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
        }
    }
}
