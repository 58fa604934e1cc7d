// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Encryption error types
//!
//! These never reach callers of the encryption client; every variant is
//! collapsed into a mock payload and logged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncryptionError {
    /// Signer address could not be resolved
    #[error("Failed to resolve signer address: {reason}")]
    SignerUnavailable { reason: String },

    /// Engine rejected the encrypted-input request
    #[error("Failed to create encrypted input: {reason}")]
    BuilderFailed { reason: String },

    /// The encrypt step itself failed
    #[error("Encryption failed: {reason}")]
    EncryptFailed { reason: String },

    /// SDK returned no handles
    #[error("Invalid encryption result: no handles returned")]
    MissingHandle,

    /// SDK returned an empty proof
    #[error("Invalid encryption result: empty input proof")]
    EmptyProof,

    /// First handle is not 32 bytes
    #[error("Invalid encryption result: handle is {len} bytes, expected 32")]
    InvalidHandleLength { len: usize },
}

pub type EncryptionResult<T> = std::result::Result<T, EncryptionError>;
