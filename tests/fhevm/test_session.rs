// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wallet-session lifecycle

use super::helpers::{wallet, MockWallet, SwitchableConnection, TestEnv};
use anyhow::anyhow;
use fhevm_client::config::{HARDHAT_CHAIN_ID, SEPOLIA_CHAIN_ID};
use fhevm_client::fhevm::{EncryptionMode, FhevmSession, SessionStatus};
use std::sync::Arc;

#[tokio::test]
async fn test_connect_builds_ready_client() {
    let env = TestEnv::with_sdk();
    let mut session = FhevmSession::new(env.factory.clone());
    assert_eq!(session.status(), &SessionStatus::Idle);

    let status = session.connect(wallet(SEPOLIA_CHAIN_ID)).await.clone();
    assert_eq!(status, SessionStatus::Ready);

    let client = session.client().expect("client after connect");
    assert_eq!(client.mode().await, EncryptionMode::Real);
}

#[tokio::test]
async fn test_unsupported_network_is_still_ready() {
    let env = TestEnv::with_sdk();
    let mut session = FhevmSession::new(env.factory.clone());

    session.connect(wallet(1)).await;
    assert_eq!(session.status(), &SessionStatus::Ready);
    assert_eq!(
        session.client().unwrap().mode().await,
        EncryptionMode::Mock
    );
}

#[tokio::test]
async fn test_reinitialize_without_connection() {
    let env = TestEnv::with_sdk();
    let mut session = FhevmSession::new(env.factory.clone());

    let status = session.reinitialize().await.clone();
    assert_eq!(
        status,
        SessionStatus::Error("No provider available".to_string())
    );
    assert!(session.client().is_none());
}

#[tokio::test]
async fn test_connect_failure_sets_error() {
    let env = TestEnv::with_sdk();
    let mut session = FhevmSession::new(env.factory.clone());

    let mut broken = MockWallet::new();
    broken
        .expect_chain_id()
        .returning(|| Err(anyhow!("provider disconnected")));
    session.connect(Arc::new(broken)).await;

    assert!(matches!(session.status(), SessionStatus::Error(_)));
    assert!(session.client().is_none());
}

#[tokio::test]
async fn test_refresh_rebuilds_on_network_change() {
    let env = TestEnv::with_sdk();
    let mut session = FhevmSession::new(env.factory.clone());
    let connection = Arc::new(SwitchableConnection::new(SEPOLIA_CHAIN_ID));

    session.connect(connection.clone()).await;
    assert!(!session.refresh().await.unwrap(), "same network, no rebuild");

    connection.switch_to(HARDHAT_CHAIN_ID);
    assert!(session.refresh().await.unwrap());
    assert_eq!(session.client().unwrap().chain_id(), HARDHAT_CHAIN_ID);
    assert_eq!(session.status(), &SessionStatus::Ready);
}

#[tokio::test]
async fn test_clear_cache_and_disconnect() {
    let env = TestEnv::with_sdk();
    let mut session = FhevmSession::new(env.factory.clone());
    session.connect(wallet(SEPOLIA_CHAIN_ID)).await;
    assert!(!env.keys.is_empty());

    session.clear_cache();
    assert!(env.keys.get(SEPOLIA_CHAIN_ID).is_none());

    session.disconnect();
    assert_eq!(session.status(), &SessionStatus::Idle);
    assert!(session.client().is_none());
    assert!(!session.refresh().await.unwrap());
}
