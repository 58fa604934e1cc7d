// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wallet-session management
//!
//! A session owns the factory (and with it the shared key cache and SDK
//! loader) and keeps at most one client, bound to the current connection.
//! The client is replaced whenever the connection or its network changes.

use anyhow::Result;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::client::EncryptionClient;
use super::factory::ClientFactory;
use crate::connection::Connection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Loading,
    Ready,
    Error(String),
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Idle => write!(f, "idle"),
            SessionStatus::Loading => write!(f, "loading"),
            SessionStatus::Ready => write!(f, "ready"),
            SessionStatus::Error(msg) => write!(f, "error: {}", msg),
        }
    }
}

pub struct FhevmSession {
    factory: ClientFactory,
    connection: Option<Arc<dyn Connection>>,
    client: Option<Arc<EncryptionClient>>,
    status: SessionStatus,
}

impl FhevmSession {
    pub fn new(factory: ClientFactory) -> Self {
        Self {
            factory,
            connection: None,
            client: None,
            status: SessionStatus::Idle,
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn client(&self) -> Option<Arc<EncryptionClient>> {
        self.client.clone()
    }

    pub fn factory(&self) -> &ClientFactory {
        &self.factory
    }

    /// Bind a new connection and build its client
    pub async fn connect(&mut self, connection: Arc<dyn Connection>) -> &SessionStatus {
        self.connection = Some(connection);
        self.initialize_client().await;
        &self.status
    }

    /// Rebuild the client for the current connection
    pub async fn reinitialize(&mut self) -> &SessionStatus {
        info!("🔄 Reinitializing FHEVM client...");
        self.initialize_client().await;
        &self.status
    }

    /// Rebuild the client only if the connection's network changed
    ///
    /// Returns true when a new client was built.
    pub async fn refresh(&mut self) -> Result<bool> {
        let Some(connection) = self.connection.clone() else {
            return Ok(false);
        };
        let chain_id = connection.chain_id().await?;

        let current = self.client.as_ref().map(|client| client.chain_id());
        if current == Some(chain_id) {
            return Ok(false);
        }

        info!(
            "🔄 Network changed from {:?} to {}, rebuilding client",
            current, chain_id
        );
        self.initialize_client().await;
        Ok(true)
    }

    /// Drop every cached public key
    pub fn clear_cache(&self) {
        match &self.client {
            Some(client) => {
                info!("🗑️  Clearing FHEVM cache...");
                client.clear_all_public_key_cache();
            }
            None => warn!("⚠️  No FHEVM client, nothing to clear"),
        }
    }

    /// Forget the connection and its client
    pub fn disconnect(&mut self) {
        self.connection = None;
        self.client = None;
        self.status = SessionStatus::Idle;
        info!("👋 FHEVM session disconnected");
    }

    async fn initialize_client(&mut self) {
        let Some(connection) = self.connection.clone() else {
            self.client = None;
            self.status = SessionStatus::Error("No provider available".to_string());
            return;
        };

        self.status = SessionStatus::Loading;
        info!("🔧 Initializing FHEVM client...");

        match self.factory.create(connection).await {
            Ok(client) => {
                self.client = Some(Arc::new(client));
                self.status = SessionStatus::Ready;
            }
            Err(e) => {
                error!("❌ Failed to initialize FHEVM client: {:#}", e);
                self.client = None;
                self.status = SessionStatus::Error(e.to_string());
            }
        }
    }
}
