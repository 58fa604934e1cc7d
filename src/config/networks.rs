//! Static SDK and network constants
//!
//! The relayer SDK is fetched from a versioned CDN location and only a fixed
//! set of chains is wired for encrypted inputs. Any chain id outside
//! [`SUPPORTED_NETWORKS`] is served by the mock path only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Versioned CDN location of the relayer SDK bundle
pub const SDK_CDN_URL: &str = "https://cdn.zama.ai/relayer-sdk-js/0.1.2/relayer-sdk-js.umd.cjs";

/// Global property the SDK bundle installs itself under
pub const SDK_GLOBAL_NAME: &str = "relayerSDK";

/// Chain id type used throughout the crate
pub type NetworkId = u64;

pub const SEPOLIA_CHAIN_ID: NetworkId = 11155111;
pub const HARDHAT_CHAIN_ID: NetworkId = 31337;
pub const LOCALHOST_CHAIN_ID: NetworkId = 1337;

/// Chains with FHEVM support
pub const SUPPORTED_NETWORKS: &[NetworkId] = &[
    SEPOLIA_CHAIN_ID,  // Sepolia Testnet
    HARDHAT_CHAIN_ID,  // Hardhat Network
    LOCALHOST_CHAIN_ID, // Localhost
];

/// Returns true if `chain_id` is one of [`SUPPORTED_NETWORKS`]
pub fn is_supported_network(chain_id: NetworkId) -> bool {
    SUPPORTED_NETWORKS.contains(&chain_id)
}

/// Human readable name for a chain id
pub fn network_name(chain_id: NetworkId) -> &'static str {
    match chain_id {
        SEPOLIA_CHAIN_ID => "Sepolia Testnet",
        HARDHAT_CHAIN_ID => "Hardhat Network",
        LOCALHOST_CHAIN_ID => "Localhost",
        _ => "Unknown Network",
    }
}

/// How the SDK instance for a network is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstancePreset {
    /// Use the SDK's built-in Sepolia preset merged with the public key
    Sepolia,
    /// Pass the connection itself as the provider argument
    Provider,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub chain_id: NetworkId,
    pub name: String,
    pub rpc_url: String,
    pub preset: InstancePreset,
}

impl NetworkInfo {
    pub fn sepolia() -> Self {
        NetworkInfo {
            chain_id: SEPOLIA_CHAIN_ID,
            name: network_name(SEPOLIA_CHAIN_ID).to_string(),
            rpc_url: std::env::var("SEPOLIA_RPC_URL")
                .unwrap_or_else(|_| "https://sepolia.infura.io/v3/YOUR_INFURA_KEY".to_string()),
            preset: InstancePreset::Sepolia,
        }
    }

    pub fn hardhat() -> Self {
        NetworkInfo {
            chain_id: HARDHAT_CHAIN_ID,
            name: network_name(HARDHAT_CHAIN_ID).to_string(),
            rpc_url: "http://127.0.0.1:8545".to_string(),
            preset: InstancePreset::Provider,
        }
    }

    pub fn localhost() -> Self {
        NetworkInfo {
            chain_id: LOCALHOST_CHAIN_ID,
            name: network_name(LOCALHOST_CHAIN_ID).to_string(),
            rpc_url: "http://localhost:8545".to_string(),
            preset: InstancePreset::Provider,
        }
    }
}

/// Lookup table over the supported networks
pub struct NetworkRegistry {
    networks: BTreeMap<NetworkId, NetworkInfo>,
}

impl NetworkRegistry {
    pub fn new() -> Self {
        let mut networks = BTreeMap::new();
        for info in [
            NetworkInfo::sepolia(),
            NetworkInfo::hardhat(),
            NetworkInfo::localhost(),
        ] {
            networks.insert(info.chain_id, info);
        }

        NetworkRegistry { networks }
    }

    pub fn get(&self, chain_id: NetworkId) -> Option<&NetworkInfo> {
        self.networks.get(&chain_id)
    }

    pub fn is_supported(&self, chain_id: NetworkId) -> bool {
        self.networks.contains_key(&chain_id)
    }

    pub fn list(&self) -> impl Iterator<Item = &NetworkInfo> {
        self.networks.values()
    }
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::new()
    }
}
