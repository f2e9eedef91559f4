//! Network identification for VeChainThor.

use std::fmt;
use std::str::FromStr;

/// The Thor network the client is connected to.
///
/// Used to pick the default node URL and the token registry list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// VeChainThor mainnet.
    Main,
    /// VeChainThor testnet.
    #[default]
    Test,
    /// Local solo node for development.
    Solo,
    /// Custom node with no known token registry.
    Custom,
}

impl Network {
    /// Returns true if this is mainnet.
    pub fn is_main(&self) -> bool {
        matches!(self, Network::Main)
    }

    /// Returns true if this is testnet.
    pub fn is_test(&self) -> bool {
        matches!(self, Network::Test)
    }

    /// Returns the network identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Test => "test",
            Network::Solo => "solo",
            Network::Custom => "custom",
        }
    }

    /// The token registry list name (`{name}.json`), if the network has one.
    pub fn registry_name(&self) -> Option<&'static str> {
        match self {
            Network::Main => Some("main"),
            Network::Test => Some("test"),
            Network::Solo | Network::Custom => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "main" | "mainnet" => Ok(Network::Main),
            "test" | "testnet" => Ok(Network::Test),
            "solo" => Ok(Network::Solo),
            other => Err(format!("unknown network '{other}'")),
        }
    }
}
