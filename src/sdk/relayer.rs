// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Typed view of the relayer SDK
//!
//! Once the SDK global passes shape validation the host binds it to these
//! traits. Only the documented method signatures are relied on; the
//! encryption scheme itself stays opaque.

use async_trait::async_trait;
use ethers::types::{Address, Bytes};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use super::value::HostValue;
use crate::config::NetworkId;
use crate::connection::Connection;

/// Output of an encrypted-input builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    pub handles: Vec<Bytes>,
    pub input_proof: Bytes,
}

/// Argument passed to `createInstance`
#[derive(Clone)]
pub enum InstanceConfig {
    /// The SDK's Sepolia preset with `publicKey` merged in
    Preset(Map<String, Value>),
    /// Chain id, key and the connection used as provider
    Provider {
        chain_id: NetworkId,
        public_key: String,
        provider: Arc<dyn Connection>,
    },
}

impl InstanceConfig {
    /// Merge `public_key` into a copy of the SDK preset
    pub fn preset_with_key(preset: Map<String, Value>, public_key: &str) -> Self {
        let mut merged = preset;
        merged.insert("publicKey".to_string(), Value::String(public_key.to_string()));
        InstanceConfig::Preset(merged)
    }

    pub fn chain_id(&self) -> Option<NetworkId> {
        match self {
            InstanceConfig::Preset(map) => map.get("chainId").and_then(Value::as_u64),
            InstanceConfig::Provider { chain_id, .. } => Some(*chain_id),
        }
    }

    pub fn public_key(&self) -> Option<&str> {
        match self {
            InstanceConfig::Preset(map) => map.get("publicKey").and_then(Value::as_str),
            InstanceConfig::Provider { public_key, .. } => Some(public_key),
        }
    }

    pub fn has_provider(&self) -> bool {
        matches!(self, InstanceConfig::Provider { .. })
    }

    /// Endpoint of the provider connection, when it exposes one
    pub fn provider_url(&self) -> Option<String> {
        match self {
            InstanceConfig::Preset(_) => None,
            InstanceConfig::Provider { provider, .. } => provider.rpc_url(),
        }
    }
}

impl fmt::Debug for InstanceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceConfig")
            .field("chain_id", &self.chain_id())
            .field("has_public_key", &self.public_key().is_some())
            .field("has_provider", &self.has_provider())
            .field("provider_url", &self.provider_url())
            .finish()
    }
}

/// The loaded relayer SDK
#[async_trait]
pub trait RelayerSdk: Send + Sync {
    /// One-time SDK initialisation (wasm/bootstrap)
    async fn init_sdk(&self) -> anyhow::Result<()>;

    /// Build an encryption engine for one network
    async fn create_instance(&self, config: InstanceConfig)
        -> anyhow::Result<Arc<dyn FhevmInstance>>;

    /// Built-in Sepolia network preset
    fn sepolia_config(&self) -> Map<String, Value>;

    /// The `__initialized__` flag
    fn is_initialized(&self) -> bool;

    fn mark_initialized(&self);
}

/// An SDK-backed encryption engine
pub trait FhevmInstance: Send + Sync {
    /// Whether the instance exposes `createEncryptedInput`
    fn has_encrypted_input(&self) -> bool {
        true
    }

    /// Start an encrypted input scoped to `(contract, user)`
    fn create_encrypted_input(
        &self,
        contract: Address,
        user: Address,
    ) -> anyhow::Result<Box<dyn EncryptedInputBuilder>>;
}

/// Accumulates plaintext values, then encrypts them in one step
#[async_trait]
pub trait EncryptedInputBuilder: Send {
    fn add32(&mut self, value: u32);

    fn add_bool(&mut self, value: bool);

    async fn encrypt(&mut self) -> anyhow::Result<EncryptedPayload>;
}

/// Structural description of an SDK as its host global would expose it
pub fn describe_sdk(sdk: &dyn RelayerSdk) -> HostValue {
    HostValue::object()
        .function("initSDK")
        .function("createInstance")
        .prop("SepoliaConfig", Value::Object(sdk.sepolia_config()).into())
        .prop("__initialized__", HostValue::Bool(sdk.is_initialized()))
        .build()
}

/// A validated, bound relayer SDK
#[derive(Clone)]
pub struct SdkHandle {
    sdk: Arc<dyn RelayerSdk>,
    source_url: String,
}

impl SdkHandle {
    pub fn new(sdk: Arc<dyn RelayerSdk>, source_url: impl Into<String>) -> Self {
        Self {
            sdk,
            source_url: source_url.into(),
        }
    }

    pub fn sdk(&self) -> &Arc<dyn RelayerSdk> {
        &self.sdk
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }
}

impl fmt::Debug for SdkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkHandle")
            .field("source_url", &self.source_url)
            .field("initialized", &self.sdk.is_initialized())
            .finish()
    }
}
