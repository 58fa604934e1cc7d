// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Connection / provider collaborator
//!
//! An encryption client is bound to one connection. It asks the connection
//! for the active chain id and for the address of the current signer, and
//! hands the connection to the SDK as its provider on non-Sepolia networks.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ethers::prelude::*;
use ethers::providers::{Http, Provider};
use std::sync::Arc;
use tracing::debug;

use crate::config::NetworkId;

#[async_trait]
pub trait Connection: Send + Sync {
    /// Active network id
    async fn chain_id(&self) -> Result<NetworkId>;

    /// Address of the current signer/account
    async fn signer_address(&self) -> Result<Address>;

    /// Endpoint the connection talks to, if it has one
    fn rpc_url(&self) -> Option<String> {
        None
    }
}

/// JSON-RPC connection backed by an ethers HTTP provider
///
/// The signer is the local wallet when a private key was supplied, otherwise
/// the first account the node reports.
pub struct EthersConnection {
    provider: Arc<Provider<Http>>,
    wallet: Option<LocalWallet>,
    rpc_url: String,
}

impl EthersConnection {
    pub fn new(rpc_url: &str, private_key: Option<&str>) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| anyhow!("Failed to create provider: {}", e))?;

        let wallet = match private_key {
            Some(key) => Some(
                key.trim_start_matches("0x")
                    .parse::<LocalWallet>()
                    .map_err(|e| anyhow!("Invalid private key: {}", e))?,
            ),
            None => None,
        };

        Ok(Self {
            provider: Arc::new(provider),
            wallet,
            rpc_url: rpc_url.to_string(),
        })
    }
}

#[async_trait]
impl Connection for EthersConnection {
    async fn chain_id(&self) -> Result<NetworkId> {
        let chain_id = self
            .provider
            .get_chainid()
            .await
            .map_err(|e| anyhow!("Failed to connect to RPC: {}", e))?;
        Ok(chain_id.as_u64())
    }

    async fn signer_address(&self) -> Result<Address> {
        if let Some(wallet) = &self.wallet {
            return Ok(wallet.address());
        }

        let accounts = self.provider.get_accounts().await?;
        debug!("Node reported {} accounts", accounts.len());
        accounts
            .first()
            .copied()
            .ok_or_else(|| anyhow!("No signer available: node has no unlocked accounts"))
    }

    fn rpc_url(&self) -> Option<String> {
        Some(self.rpc_url.clone())
    }
}

/// Connection with a fixed chain id and signer
#[derive(Debug, Clone)]
pub struct StaticConnection {
    pub chain_id: NetworkId,
    pub signer: Address,
}

impl StaticConnection {
    pub fn new(chain_id: NetworkId, signer: Address) -> Self {
        Self { chain_id, signer }
    }
}

#[async_trait]
impl Connection for StaticConnection {
    async fn chain_id(&self) -> Result<NetworkId> {
        Ok(self.chain_id)
    }

    async fn signer_address(&self) -> Result<Address> {
        Ok(self.signer)
    }
}
