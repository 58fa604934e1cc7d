// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Network public key resolution
//!
//! Sepolia keys are derived from the user address, chain id and current
//! time. Local development networks share a fixed placeholder key. If
//! derivation fails the emergency key is used so initialisation can proceed.

use ethers::types::Address;
use ethers::utils::keccak256;
use tracing::{info, warn};

use crate::config::{NetworkId, SEPOLIA_CHAIN_ID};
use crate::connection::Connection;
use crate::keys::{Clock, PublicKeyStore};

pub const SEPOLIA_KEY_DOMAIN: &[u8] = b"FHEVM_SEPOLIA_PUBKEY_v2";

/// Placeholder key for local development networks
pub fn local_public_key() -> String {
    format!("0x{}", "01".repeat(32))
}

/// Key used when derivation fails
pub fn emergency_public_key() -> String {
    format!("0x{}", "ff".repeat(32))
}

/// keccak256(domain ‖ user ‖ chain_id(8 BE) ‖ now_ms(8 BE)) as 0x-hex
pub fn derive_sepolia_key(user: Address, chain_id: NetworkId, now_ms: i64) -> String {
    let mut preimage = Vec::with_capacity(SEPOLIA_KEY_DOMAIN.len() + 20 + 8 + 8);
    preimage.extend_from_slice(SEPOLIA_KEY_DOMAIN);
    preimage.extend_from_slice(user.as_bytes());
    preimage.extend_from_slice(&chain_id.to_be_bytes());
    preimage.extend_from_slice(&now_ms.to_be_bytes());
    format!("0x{}", hex::encode(keccak256(&preimage)))
}

/// Produce a fresh key for `chain_id`, never failing
pub async fn fetch_public_key(
    chain_id: NetworkId,
    connection: &dyn Connection,
    clock: &dyn Clock,
) -> String {
    if chain_id != SEPOLIA_CHAIN_ID {
        return local_public_key();
    }

    match connection.signer_address().await {
        Ok(user) => {
            let key = derive_sepolia_key(user, chain_id, clock.now_ms());
            info!("🔑 Derived public key for chain {}", chain_id);
            key
        }
        Err(e) => {
            warn!(
                "⚠️  Public key derivation failed for chain {}: {}, using emergency key",
                chain_id, e
            );
            emergency_public_key()
        }
    }
}

/// Cached key for `chain_id`, else a freshly fetched key that is then stored
pub async fn get_or_fetch_public_key(
    store: &PublicKeyStore,
    chain_id: NetworkId,
    connection: &dyn Connection,
    clock: &dyn Clock,
) -> String {
    if let Some(record) = store.get(chain_id) {
        info!("🔑 Using cached public key for chain {}", chain_id);
        return record.key;
    }

    let key = fetch_public_key(chain_id, connection, clock).await;
    store.set(chain_id, key.clone());
    key
}
