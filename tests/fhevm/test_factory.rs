// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client factory: network binding and shared state

use super::helpers::{wallet, MockWallet, TestEnv};
use anyhow::anyhow;
use fhevm_client::config::{HARDHAT_CHAIN_ID, SEPOLIA_CHAIN_ID};
use fhevm_client::fhevm::EncryptionMode;
use fhevm_client::sdk::LoaderState;
use std::sync::Arc;

#[tokio::test]
async fn test_client_bound_to_active_network() {
    let env = TestEnv::with_sdk();
    let client = env.factory.create(wallet(HARDHAT_CHAIN_ID)).await.unwrap();

    assert_eq!(client.chain_id(), HARDHAT_CHAIN_ID);
    assert!(client.is_fhevm_supported(HARDHAT_CHAIN_ID));
}

#[tokio::test]
async fn test_network_read_failure_is_reported() {
    let env = TestEnv::with_sdk();
    let mut broken = MockWallet::new();
    broken
        .expect_chain_id()
        .returning(|| Err(anyhow!("provider disconnected")));

    let err = env.factory.create(Arc::new(broken)).await.err().unwrap();
    assert!(format!("{:#}", err).contains("provider disconnected"));
}

#[tokio::test]
async fn test_clients_share_loader_and_keys() {
    let env = TestEnv::with_sdk();

    let first = env.factory.create(wallet(SEPOLIA_CHAIN_ID)).await.unwrap();
    let second = env.factory.create(wallet(HARDHAT_CHAIN_ID)).await.unwrap();

    assert_eq!(first.mode().await, EncryptionMode::Real);
    assert_eq!(second.mode().await, EncryptionMode::Real);
    assert_eq!(env.host.injection_count(), 1, "SDK loaded once per process");
    assert_eq!(env.factory.loader().state().await, LoaderState::Loaded);
    assert_eq!(env.sdk.init_calls(), 1);
    assert_eq!(env.keys.len(), 2);

    let snap = env.factory.metrics().snapshot();
    assert_eq!(snap.init_attempts, 2);
    assert_eq!(snap.init_failures, 0);
}

#[tokio::test]
async fn test_force_mock_never_loads() {
    let env = TestEnv::with_sdk();
    let factory = env.factory.clone().with_force_mock(true);

    let client = factory.create(wallet(SEPOLIA_CHAIN_ID)).await.unwrap();
    assert_eq!(client.mode().await, EncryptionMode::Mock);
    assert_eq!(env.host.injection_count(), 0);
}
