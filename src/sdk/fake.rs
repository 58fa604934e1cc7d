// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-process relayer SDK
//!
//! Stands in for the real bundle inside a [`super::MemoryHost`]. The
//! "encryption" is a keccak hash of the inputs; what matters is that the
//! SDK contract (init, instance creation, builder, encrypt) is honoured and
//! that failures can be scripted.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ethers::types::{Address, Bytes};
use ethers::utils::keccak256;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::relayer::{
    EncryptedInputBuilder, EncryptedPayload, FhevmInstance, InstanceConfig, RelayerSdk,
};
use crate::config::SEPOLIA_CHAIN_ID;

/// What the fake engine's `encrypt` returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FakeOutput {
    #[default]
    Valid,
    NoHandles,
    EmptyProof,
    ShortHandle,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct FakeBehavior {
    pub fail_init: bool,
    pub fail_create_instance: bool,
    pub without_encrypted_input: bool,
    pub output: FakeOutput,
}

#[derive(Default)]
pub struct FakeRelayerSdk {
    behavior: Mutex<FakeBehavior>,
    initialized: AtomicBool,
    init_calls: AtomicUsize,
    configs: Mutex<Vec<InstanceConfig>>,
}

impl FakeRelayerSdk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: FakeBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            ..Self::default()
        }
    }

    pub fn set_behavior(&self, behavior: FakeBehavior) {
        *self.behavior.lock().unwrap_or_else(PoisonError::into_inner) = behavior;
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    /// Every config passed to `create_instance`, oldest first
    pub fn instance_configs(&self) -> Vec<InstanceConfig> {
        self.configs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn behavior(&self) -> FakeBehavior {
        self.behavior
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RelayerSdk for FakeRelayerSdk {
    async fn init_sdk(&self) -> Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.behavior().fail_init {
            return Err(anyhow!("wasm bootstrap failed"));
        }
        Ok(())
    }

    async fn create_instance(&self, config: InstanceConfig) -> Result<Arc<dyn FhevmInstance>> {
        self.configs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(config);

        let behavior = self.behavior();
        if behavior.fail_create_instance {
            return Err(anyhow!("relayer unreachable"));
        }
        Ok(Arc::new(FakeInstance {
            capable: !behavior.without_encrypted_input,
            output: behavior.output,
        }))
    }

    fn sepolia_config(&self) -> Map<String, Value> {
        let preset = json!({
            "chainId": SEPOLIA_CHAIN_ID,
            "relayerUrl": "https://relayer.testnet.zama.cloud",
            "network": "https://eth-sepolia.public.blastapi.io",
        });
        match preset {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    fn mark_initialized(&self) {
        self.initialized.store(true, Ordering::SeqCst);
    }
}

struct FakeInstance {
    capable: bool,
    output: FakeOutput,
}

impl FhevmInstance for FakeInstance {
    fn has_encrypted_input(&self) -> bool {
        self.capable
    }

    fn create_encrypted_input(
        &self,
        contract: Address,
        user: Address,
    ) -> Result<Box<dyn EncryptedInputBuilder>> {
        Ok(Box::new(FakeBuilder {
            contract,
            user,
            values: Vec::new(),
            output: self.output,
        }))
    }
}

struct FakeBuilder {
    contract: Address,
    user: Address,
    values: Vec<u8>,
    output: FakeOutput,
}

#[async_trait]
impl EncryptedInputBuilder for FakeBuilder {
    fn add32(&mut self, value: u32) {
        self.values.push(32);
        self.values.extend_from_slice(&value.to_be_bytes());
    }

    fn add_bool(&mut self, value: bool) {
        self.values.push(1);
        self.values.push(u8::from(value));
    }

    async fn encrypt(&mut self) -> Result<EncryptedPayload> {
        let mut preimage = self.contract.as_bytes().to_vec();
        preimage.extend_from_slice(self.user.as_bytes());
        preimage.extend_from_slice(&self.values);
        let handle = keccak256(&preimage);

        let handles = match self.output {
            FakeOutput::Error => return Err(anyhow!("encryption rejected by relayer")),
            FakeOutput::NoHandles => Vec::new(),
            FakeOutput::ShortHandle => vec![Bytes::from(handle[..8].to_vec())],
            _ => vec![Bytes::from(handle.to_vec())],
        };
        let input_proof = match self.output {
            FakeOutput::EmptyProof => Bytes::new(),
            _ => Bytes::from(keccak256(handle).to_vec()),
        };

        Ok(EncryptedPayload {
            handles,
            input_proof,
        })
    }
}
