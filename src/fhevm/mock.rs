// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Mock encrypted-input encoding
//!
//! Used whenever the real engine is unavailable. The layout is:
//!
//! ```text
//! handle = keccak256(tag ‖ contract(20) ‖ user(20) ‖ value(32 BE) ‖ ts(8 BE) ‖ nonce(8 BE))
//! proof  = abi.encode(bytes32 handle, address contract, address user,
//!                     uint32|bool value, uint256 ts, bytes32 inner)
//! inner  = keccak256("mock_proof_{v}_{ts}_{nonce}")       // uint32
//!        | keccak256("mock_bool_proof_{v}_{ts}_{nonce}")  // bool
//! ```
//!
//! `ts` is unix seconds and `nonce` is drawn from `[0, 1_000_000)`, so two
//! calls with the same arguments yield different handles.

use ethers::abi::{encode, Token};
use ethers::types::{Address, Bytes, H256, U256};
use ethers::utils::keccak256;
use rand::Rng;
use std::sync::Arc;

use super::input::{EncryptedInput, EncryptedKind};
use crate::keys::Clock;

pub const MOCK_EUINT32_TAG: &[u8] = b"MOCK_FHEVM_EUINT32";
pub const MOCK_EBOOL_TAG: &[u8] = b"MOCK_FHEVM_EBOOL";

/// Exclusive upper bound of the random nonce
pub const MOCK_NONCE_RANGE: u64 = 1_000_000;

pub struct MockEncoder {
    clock: Arc<dyn Clock>,
}

impl MockEncoder {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Encode with the current time and a fresh nonce
    pub fn encode(
        &self,
        contract: Address,
        user: Address,
        value: u32,
        kind: EncryptedKind,
    ) -> EncryptedInput {
        let timestamp = self.clock.now_secs().max(0) as u64;
        let nonce = rand::thread_rng().gen_range(0..MOCK_NONCE_RANGE);
        encode_mock_input(contract, user, value, kind, timestamp, nonce)
    }
}

/// Deterministic mock encoding for explicit timestamp and nonce
pub fn encode_mock_input(
    contract: Address,
    user: Address,
    value: u32,
    kind: EncryptedKind,
    timestamp: u64,
    nonce: u64,
) -> EncryptedInput {
    let (tag, plain, inner_label, value_token) = match kind {
        EncryptedKind::Uint32 => (
            MOCK_EUINT32_TAG,
            value,
            format!("mock_proof_{}_{}_{}", value, timestamp, nonce),
            Token::Uint(U256::from(value)),
        ),
        EncryptedKind::Bool => {
            let flag = value != 0;
            // Label carries the flag as 1/0
            let bit = u32::from(flag);
            (
                MOCK_EBOOL_TAG,
                bit,
                format!("mock_bool_proof_{}_{}_{}", bit, timestamp, nonce),
                Token::Bool(flag),
            )
        }
    };

    let mut preimage = Vec::with_capacity(tag.len() + 20 + 20 + 32 + 8 + 8);
    preimage.extend_from_slice(tag);
    preimage.extend_from_slice(contract.as_bytes());
    preimage.extend_from_slice(user.as_bytes());
    let mut value_bytes = [0u8; 32];
    value_bytes[28..].copy_from_slice(&plain.to_be_bytes());
    preimage.extend_from_slice(&value_bytes);
    preimage.extend_from_slice(&timestamp.to_be_bytes());
    preimage.extend_from_slice(&nonce.to_be_bytes());

    let handle = keccak256(&preimage);
    let inner = keccak256(inner_label.as_bytes());

    let proof = encode(&[
        Token::FixedBytes(handle.to_vec()),
        Token::Address(contract),
        Token::Address(user),
        value_token,
        Token::Uint(U256::from(timestamp)),
        Token::FixedBytes(inner.to_vec()),
    ]);

    EncryptedInput {
        handle: H256::from(handle),
        proof: Bytes::from(proof),
    }
}
