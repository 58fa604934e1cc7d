// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Encryption client: network policy, real path and mock fallback

use super::helpers::{contract, locked_wallet, user, wallet, MockWallet, TestEnv};
use ethers::types::{Address, H256};
use ethers::utils::keccak256;
use fhevm_client::config::{HARDHAT_CHAIN_ID, LOCALHOST_CHAIN_ID, SEPOLIA_CHAIN_ID};
use fhevm_client::fhevm::{local_public_key, EncryptedKind, EncryptionMode};
use fhevm_client::sdk::{FakeBehavior, FakeOutput, InstanceConfig};
use std::sync::Arc;

/// Handle the fake SDK produces for a single uint32
fn fake_handle(value: u32) -> H256 {
    let mut preimage = contract().as_bytes().to_vec();
    preimage.extend_from_slice(user().as_bytes());
    preimage.push(32);
    preimage.extend_from_slice(&value.to_be_bytes());
    H256::from(keccak256(&preimage))
}

#[tokio::test]
async fn test_unsupported_network_never_loads_sdk() {
    let env = TestEnv::with_sdk();
    let client = env.factory.create(wallet(1)).await.unwrap();

    assert!(!client.is_fhevm_supported(1));
    assert_eq!(client.mode().await, EncryptionMode::Mock);
    assert_eq!(env.host.injection_count(), 0, "No SDK load for unsupported network");
    assert!(env.keys.is_empty());

    let outcome = client.encrypt(contract(), 5, EncryptedKind::Uint32).await;
    assert!(outcome.is_mock());
}

#[tokio::test]
async fn test_sepolia_load_failure_falls_back_to_mock() {
    let env = TestEnv::unreachable_sdk();
    let client = env.factory.create(wallet(SEPOLIA_CHAIN_ID)).await.unwrap();

    assert!(client.is_ready());
    assert_eq!(client.mode().await, EncryptionMode::Mock);
    assert_eq!(env.factory.metrics().snapshot().init_failures, 1);

    let input = client
        .create_encrypted_input(contract(), 5, EncryptedKind::Uint32)
        .await;
    assert_ne!(input.handle, H256::zero());
    assert_eq!(input.proof.len(), 6 * 32);
}

#[tokio::test]
async fn test_sepolia_real_path() {
    let env = TestEnv::with_sdk();
    let client = env.factory.create(wallet(SEPOLIA_CHAIN_ID)).await.unwrap();
    assert_eq!(client.mode().await, EncryptionMode::Real);

    let outcome = client.encrypt(contract(), 5, EncryptedKind::Uint32).await;
    assert_eq!(outcome.mode(), EncryptionMode::Real);
    assert_eq!(outcome.input().handle, fake_handle(5));
    assert!(!outcome.input().proof.is_empty());

    // SDK initialised once, before the instance was created
    assert_eq!(env.sdk.init_calls(), 1);

    // Sepolia gets the SDK preset with the cached public key merged in
    let configs = env.sdk.instance_configs();
    assert_eq!(configs.len(), 1);
    let cached = env.keys.get(SEPOLIA_CHAIN_ID).expect("key should be cached");
    assert!(matches!(configs[0], InstanceConfig::Preset(_)));
    assert_eq!(configs[0].public_key(), Some(cached.key.as_str()));
    assert_eq!(configs[0].chain_id(), Some(SEPOLIA_CHAIN_ID));
}

#[tokio::test]
async fn test_local_network_passes_connection_as_provider() {
    let env = TestEnv::with_sdk();
    let client = env.factory.create(wallet(HARDHAT_CHAIN_ID)).await.unwrap();
    assert_eq!(client.mode().await, EncryptionMode::Real);

    let configs = env.sdk.instance_configs();
    assert!(configs[0].has_provider());
    assert_eq!(configs[0].chain_id(), Some(HARDHAT_CHAIN_ID));
    assert_eq!(configs[0].public_key(), Some(local_public_key().as_str()));
    assert_eq!(configs[0].provider_url(), None);
}

#[tokio::test]
async fn test_provider_config_reports_endpoint() {
    let env = TestEnv::with_sdk();
    let mut node = MockWallet::new();
    node.expect_chain_id().returning(|| Ok(HARDHAT_CHAIN_ID));
    node.expect_signer_address().returning(|| Ok(user()));
    node.expect_rpc_url()
        .returning(|| Some("http://127.0.0.1:8545".to_string()));

    env.factory.create(Arc::new(node)).await.unwrap();

    let configs = env.sdk.instance_configs();
    assert_eq!(
        configs[0].provider_url().as_deref(),
        Some("http://127.0.0.1:8545")
    );
    assert!(format!("{:?}", configs[0]).contains("127.0.0.1:8545"));
}

#[tokio::test]
async fn test_cached_key_is_reused() {
    let env = TestEnv::with_sdk();
    env.keys.set(SEPOLIA_CHAIN_ID, "0xcafe");

    env.factory.create(wallet(SEPOLIA_CHAIN_ID)).await.unwrap();

    let configs = env.sdk.instance_configs();
    assert_eq!(configs[0].public_key(), Some("0xcafe"));
}

#[tokio::test]
async fn test_initialized_sdk_is_not_reinitialized() {
    let env = TestEnv::with_sdk();
    fhevm_client::sdk::RelayerSdk::mark_initialized(env.sdk.as_ref());

    env.factory.create(wallet(SEPOLIA_CHAIN_ID)).await.unwrap();
    assert_eq!(env.sdk.init_calls(), 0);
}

#[tokio::test]
async fn test_engine_failures_fall_back_to_mock() {
    let behaviors = [
        FakeBehavior {
            fail_init: true,
            ..FakeBehavior::default()
        },
        FakeBehavior {
            fail_create_instance: true,
            ..FakeBehavior::default()
        },
        FakeBehavior {
            without_encrypted_input: true,
            ..FakeBehavior::default()
        },
    ];

    for behavior in behaviors {
        let env = TestEnv::with_behavior(behavior.clone());
        let client = env.factory.create(wallet(SEPOLIA_CHAIN_ID)).await.unwrap();

        assert_eq!(
            client.mode().await,
            EncryptionMode::Mock,
            "behavior {:?}",
            behavior
        );
        let outcome = client.encrypt(contract(), 1, EncryptedKind::Uint32).await;
        assert!(outcome.is_mock());
    }
}

#[tokio::test]
async fn test_malformed_real_output_falls_back_to_mock() {
    for output in [
        FakeOutput::NoHandles,
        FakeOutput::EmptyProof,
        FakeOutput::ShortHandle,
        FakeOutput::Error,
    ] {
        let env = TestEnv::with_behavior(FakeBehavior {
            output,
            ..FakeBehavior::default()
        });
        let client = env.factory.create(wallet(LOCALHOST_CHAIN_ID)).await.unwrap();
        assert_eq!(client.mode().await, EncryptionMode::Real);

        let outcome = client.encrypt(contract(), 9, EncryptedKind::Uint32).await;
        assert!(outcome.is_mock(), "output {:?} should fall back", output);
        assert!(!outcome.input().proof.is_empty());

        let snap = env.factory.metrics().snapshot();
        assert_eq!(snap.fallbacks, 1);
        assert_eq!(snap.mock_encryptions, 1);
        assert_eq!(snap.real_encryptions, 0);
    }
}

#[tokio::test]
async fn test_mock_payload_shape_for_all_kinds() {
    let env = TestEnv::unreachable_sdk();
    let client = env.factory.create(wallet(SEPOLIA_CHAIN_ID)).await.unwrap();

    for kind in [EncryptedKind::Uint32, EncryptedKind::Bool] {
        for value in [0, 1, 42, u32::MAX] {
            let input = client.create_encrypted_input(contract(), value, kind).await;
            assert_eq!(input.handle.as_bytes().len(), 32);
            assert!(!input.proof.is_empty(), "{} {}", kind, value);
        }
    }
}

#[tokio::test]
async fn test_mock_is_not_idempotent() {
    let env = TestEnv::unreachable_sdk();
    let client = env.factory.create(wallet(SEPOLIA_CHAIN_ID)).await.unwrap();

    let first = client
        .create_encrypted_input(contract(), 7, EncryptedKind::Uint32)
        .await;
    env.clock.advance_ms(1_000);
    let second = client
        .create_encrypted_input(contract(), 7, EncryptedKind::Uint32)
        .await;

    assert_ne!(first.handle, second.handle);
}

#[tokio::test]
async fn test_bool_input_wrapper() {
    let env = TestEnv::with_sdk();
    let client = env.factory.create(wallet(SEPOLIA_CHAIN_ID)).await.unwrap();

    let input = client.create_encrypted_bool_input(contract(), true).await;

    let mut preimage = contract().as_bytes().to_vec();
    preimage.extend_from_slice(user().as_bytes());
    preimage.extend_from_slice(&[1, 1]);
    assert_eq!(input.handle, H256::from(keccak256(&preimage)));
}

#[tokio::test]
async fn test_locked_signer_uses_zero_address_in_mock() {
    let env = TestEnv::with_sdk();
    let client = env.factory.create(locked_wallet(HARDHAT_CHAIN_ID)).await.unwrap();

    // Real path needs the signer, so this falls back
    let outcome = client.encrypt(contract(), 3, EncryptedKind::Uint32).await;
    assert!(outcome.is_mock());

    let proof = &outcome.input().proof;
    assert_eq!(&proof[76..96], Address::zero().as_bytes());
}

#[tokio::test]
async fn test_clear_public_key_caches() {
    let env = TestEnv::with_sdk();
    let sepolia = env.factory.create(wallet(SEPOLIA_CHAIN_ID)).await.unwrap();
    let hardhat = env.factory.create(wallet(HARDHAT_CHAIN_ID)).await.unwrap();
    assert_eq!(env.keys.len(), 2);

    sepolia.clear_public_key_cache();
    assert!(env.keys.get(SEPOLIA_CHAIN_ID).is_none());
    assert!(env.keys.get(HARDHAT_CHAIN_ID).is_some());

    hardhat.clear_all_public_key_cache();
    assert!(env.keys.get(HARDHAT_CHAIN_ID).is_none());
    assert!(env.keys.is_empty());
}
