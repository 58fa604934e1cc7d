// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Encryption client
//!
//! Per-(connection, network) facade that turns plaintext values into
//! encrypted inputs. When an SDK-backed engine is available the payload
//! comes from the engine, otherwise (or when the engine misbehaves) the
//! mock encoder produces it. Callers always get a payload.

use anyhow::{anyhow, bail};
use ethers::types::{Address, H256};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::error::{EncryptionError, EncryptionResult};
use super::input::{EncryptedInput, EncryptedKind, EncryptionMode, EncryptionOutcome};
use super::metrics::ClientMetrics;
use super::mock::MockEncoder;
use super::public_key::get_or_fetch_public_key;
use crate::config::{
    is_supported_network, network_name, InstancePreset, NetworkId, NetworkRegistry,
};
use crate::connection::Connection;
use crate::keys::{Clock, PublicKeyStore};
use crate::sdk::{FhevmInstance, InstanceConfig, SdkLoader};

pub struct EncryptionClient {
    connection: Arc<dyn Connection>,
    chain_id: NetworkId,
    keys: Arc<PublicKeyStore>,
    loader: Arc<SdkLoader>,
    clock: Arc<dyn Clock>,
    mock: MockEncoder,
    force_mock: bool,
    engine: RwLock<Option<Arc<dyn FhevmInstance>>>,
    metrics: ClientMetrics,
}

impl EncryptionClient {
    /// Build an uninitialised client; [`super::ClientFactory`] is the public path
    pub(crate) fn new(
        connection: Arc<dyn Connection>,
        chain_id: NetworkId,
        keys: Arc<PublicKeyStore>,
        loader: Arc<SdkLoader>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connection,
            chain_id,
            keys,
            loader,
            mock: MockEncoder::new(clock.clone()),
            clock,
            force_mock: false,
            engine: RwLock::new(None),
            metrics: ClientMetrics::new(),
        }
    }

    pub(crate) fn with_force_mock(mut self, force_mock: bool) -> Self {
        self.force_mock = force_mock;
        self
    }

    pub(crate) fn with_metrics(mut self, metrics: ClientMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Set up the SDK-backed engine, falling back to mock mode on any failure
    pub async fn initialize(&self) {
        if !is_supported_network(self.chain_id) {
            info!(
                "ℹ️  Chain {} ({}) does not support FHEVM, using mock encryption",
                self.chain_id,
                network_name(self.chain_id)
            );
            return;
        }

        self.metrics.record_init_attempt();
        info!(
            "🔧 Initializing FHEVM for {} (chain {})",
            network_name(self.chain_id),
            self.chain_id
        );

        if self.force_mock {
            info!("ℹ️  Mock encryption forced by configuration");
            self.metrics.record_init_failure();
            return;
        }

        match self.create_engine().await {
            Ok(engine) => {
                *self.engine.write().await = Some(engine);
                info!("✅ FHEVM instance ready for chain {}", self.chain_id);
            }
            Err(e) => {
                warn!(
                    "⚠️  FHEVM initialization failed for chain {}: {:#}, using mock encryption",
                    self.chain_id, e
                );
                self.metrics.record_init_failure();
                *self.engine.write().await = None;
            }
        }
    }

    async fn create_engine(&self) -> anyhow::Result<Arc<dyn FhevmInstance>> {
        self.loader.load().await?;
        let handle = self
            .loader
            .sdk_handle()
            .ok_or_else(|| anyhow!("relayer SDK is not bound in this environment"))?;
        let sdk = handle.sdk();

        let public_key = get_or_fetch_public_key(
            &self.keys,
            self.chain_id,
            self.connection.as_ref(),
            self.clock.as_ref(),
        )
        .await;

        if !sdk.is_initialized() {
            debug!("Initializing relayer SDK");
            sdk.init_sdk().await?;
            sdk.mark_initialized();
        }

        let preset = NetworkRegistry::new()
            .get(self.chain_id)
            .map(|network| network.preset)
            .unwrap_or(InstancePreset::Provider);
        let config = match preset {
            InstancePreset::Sepolia => {
                InstanceConfig::preset_with_key(sdk.sepolia_config(), &public_key)
            }
            InstancePreset::Provider => InstanceConfig::Provider {
                chain_id: self.chain_id,
                public_key,
                provider: self.connection.clone(),
            },
        };
        debug!("Creating FHEVM instance with {:?}", config);

        let instance = sdk.create_instance(config).await?;
        if !instance.has_encrypted_input() {
            bail!("FHEVM instance does not support createEncryptedInput");
        }
        Ok(instance)
    }

    /// Encrypt `value`, reporting which path produced the payload
    pub async fn encrypt(
        &self,
        contract: Address,
        value: u32,
        kind: EncryptedKind,
    ) -> EncryptionOutcome {
        let engine = self.engine.read().await.clone();

        if let Some(engine) = engine {
            if is_supported_network(self.chain_id) {
                match self.encrypt_real(engine.as_ref(), contract, value, kind).await {
                    Ok(input) => {
                        self.metrics.record_real();
                        return EncryptionOutcome::Real(input);
                    }
                    Err(e) => {
                        warn!("⚠️  Real encryption failed: {}, falling back to mock", e);
                        self.metrics.record_fallback();
                    }
                }
            }
        }

        let user = match self.connection.signer_address().await {
            Ok(user) => user,
            Err(e) => {
                debug!("Signer unavailable for mock encryption: {}", e);
                Address::zero()
            }
        };
        let input = self.mock.encode(contract, user, value, kind);
        self.metrics.record_mock();
        debug!(
            "🎭 Mock {} input for {:?}: handle {:?}",
            kind, contract, input.handle
        );
        EncryptionOutcome::Mock(input)
    }

    async fn encrypt_real(
        &self,
        engine: &dyn FhevmInstance,
        contract: Address,
        value: u32,
        kind: EncryptedKind,
    ) -> EncryptionResult<EncryptedInput> {
        let user = self
            .connection
            .signer_address()
            .await
            .map_err(|e| EncryptionError::SignerUnavailable {
                reason: e.to_string(),
            })?;

        let mut builder = engine.create_encrypted_input(contract, user).map_err(|e| {
            EncryptionError::BuilderFailed {
                reason: e.to_string(),
            }
        })?;
        match kind {
            EncryptedKind::Uint32 => builder.add32(value),
            EncryptedKind::Bool => builder.add_bool(value != 0),
        }

        let payload = builder
            .encrypt()
            .await
            .map_err(|e| EncryptionError::EncryptFailed {
                reason: e.to_string(),
            })?;

        let handle = payload
            .handles
            .first()
            .ok_or(EncryptionError::MissingHandle)?;
        if payload.input_proof.is_empty() {
            return Err(EncryptionError::EmptyProof);
        }
        if handle.len() != 32 {
            return Err(EncryptionError::InvalidHandleLength { len: handle.len() });
        }

        Ok(EncryptedInput {
            handle: H256::from_slice(handle),
            proof: payload.input_proof,
        })
    }

    /// Encrypt `value` as the given kind
    pub async fn create_encrypted_input(
        &self,
        contract: Address,
        value: u32,
        kind: EncryptedKind,
    ) -> EncryptedInput {
        self.encrypt(contract, value, kind).await.into_input()
    }

    pub async fn create_encrypted_bool_input(&self, contract: Address, value: bool) -> EncryptedInput {
        self.create_encrypted_input(contract, u32::from(value), EncryptedKind::Bool)
            .await
    }

    /// A constructed client can always produce an input by some path
    pub fn is_ready(&self) -> bool {
        true
    }

    pub fn is_fhevm_supported(&self, chain_id: NetworkId) -> bool {
        is_supported_network(chain_id)
    }

    pub fn chain_id(&self) -> NetworkId {
        self.chain_id
    }

    /// Path the next encryption will try first
    pub async fn mode(&self) -> EncryptionMode {
        if self.engine.read().await.is_some() && is_supported_network(self.chain_id) {
            EncryptionMode::Real
        } else {
            EncryptionMode::Mock
        }
    }

    pub fn metrics(&self) -> &ClientMetrics {
        &self.metrics
    }

    /// Drop this network's cached public key
    pub fn clear_public_key_cache(&self) {
        self.keys.clear(self.chain_id);
    }

    /// Drop every cached public key
    pub fn clear_all_public_key_cache(&self) {
        self.keys.clear_all();
    }
}
