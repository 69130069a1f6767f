use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Solana cluster a client talks to.
///
/// Program addresses can be overridden per cluster, so the cluster is resolved once at
/// client construction and never changes afterwards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Cluster {
    #[strum(to_string = "mainnet-beta", serialize = "mainnet")]
    #[serde(rename = "mainnet-beta", alias = "mainnet")]
    MainnetBeta,
    Devnet,
    Testnet,
    Localnet,
    #[default]
    Custom,
}

impl Cluster {
    /// Best-effort guess of the cluster from an RPC endpoint URL.
    pub fn from_rpc_url(url: &str) -> Self {
        let url = url.to_lowercase();

        if url.contains("devnet") {
            Cluster::Devnet
        } else if url.contains("testnet") {
            Cluster::Testnet
        } else if url.contains("mainnet") {
            Cluster::MainnetBeta
        } else if url.contains("localhost") || url.contains("127.0.0.1") {
            Cluster::Localnet
        } else {
            Cluster::Custom
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_from_rpc_url() {
        assert_eq!(
            Cluster::from_rpc_url("https://api.devnet.solana.com"),
            Cluster::Devnet
        );
        assert_eq!(
            Cluster::from_rpc_url("https://api.mainnet-beta.solana.com"),
            Cluster::MainnetBeta
        );
        assert_eq!(
            Cluster::from_rpc_url("http://127.0.0.1:8899"),
            Cluster::Localnet
        );
        assert_eq!(
            Cluster::from_rpc_url("https://rpc.example.org"),
            Cluster::Custom
        );
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(Cluster::from_str("devnet").unwrap(), Cluster::Devnet);
        assert_eq!(Cluster::from_str("MAINNET").unwrap(), Cluster::MainnetBeta);
        assert_eq!(Cluster::MainnetBeta.to_string(), "mainnet-beta");
        assert!(Cluster::from_str("moon").is_err());
    }
}
