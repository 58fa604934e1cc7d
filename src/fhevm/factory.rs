// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client construction
//!
//! The factory owns the shared key cache and SDK loader and is the only
//! supported way to obtain an initialised [`EncryptionClient`].

use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tracing::info;

use super::client::EncryptionClient;
use super::metrics::ClientMetrics;
use crate::config::FhevmConfig;
use crate::connection::Connection;
use crate::keys::{Clock, PublicKeyStore, SystemClock};
use crate::sdk::{ScriptHost, SdkLoader};
use crate::storage::FileStorage;

#[derive(Clone)]
pub struct ClientFactory {
    keys: Arc<PublicKeyStore>,
    loader: Arc<SdkLoader>,
    clock: Arc<dyn Clock>,
    metrics: ClientMetrics,
    force_mock: bool,
}

impl ClientFactory {
    pub fn new(keys: Arc<PublicKeyStore>, loader: Arc<SdkLoader>, clock: Arc<dyn Clock>) -> Self {
        Self {
            keys,
            loader,
            clock,
            metrics: ClientMetrics::new(),
            force_mock: false,
        }
    }

    /// Wire a factory from configuration: file-backed key cache, system
    /// clock and a loader bound to `host`
    pub fn from_config(config: &FhevmConfig, host: Option<Arc<dyn ScriptHost>>) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow!("Invalid FHEVM configuration: {}", e))?;

        let storage = Arc::new(FileStorage::new(&config.key_cache_dir));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let keys = Arc::new(PublicKeyStore::load_with_ttl(
            storage,
            clock.clone(),
            config.key_ttl(),
        ));
        let loader = Arc::new(SdkLoader::new(host, config));

        Ok(Self::new(keys, loader, clock).with_force_mock(config.force_mock))
    }

    pub fn with_force_mock(mut self, force_mock: bool) -> Self {
        self.force_mock = force_mock;
        self
    }

    pub fn keys(&self) -> &Arc<PublicKeyStore> {
        &self.keys
    }

    pub fn loader(&self) -> &Arc<SdkLoader> {
        &self.loader
    }

    /// Counters shared by every client this factory creates
    pub fn metrics(&self) -> &ClientMetrics {
        &self.metrics
    }

    /// Bind `connection` to its active network and initialise a client
    pub async fn create(&self, connection: Arc<dyn Connection>) -> Result<EncryptionClient> {
        let chain_id = connection
            .chain_id()
            .await
            .context("Failed to read active network")?;

        let client = EncryptionClient::new(
            connection,
            chain_id,
            self.keys.clone(),
            self.loader.clone(),
            self.clock.clone(),
        )
        .with_force_mock(self.force_mock)
        .with_metrics(self.metrics.clone());

        client.initialize().await;
        let mode = client.mode().await;
        info!(
            "✅ Encryption client ready for chain {} (mode: {})",
            chain_id, mode
        );
        Ok(client)
    }
}
