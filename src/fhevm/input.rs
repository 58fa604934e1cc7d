//! Encrypted input payloads

use ethers::types::{Bytes, H256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Handle + proof pair embedded in a contract call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedInput {
    /// bytes32 handle
    pub handle: H256,
    /// Variable-length input proof
    pub proof: Bytes,
}

/// Plaintext type of an encrypted input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncryptedKind {
    Uint32,
    Bool,
}

impl fmt::Display for EncryptedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncryptedKind::Uint32 => write!(f, "uint32"),
            EncryptedKind::Bool => write!(f, "bool"),
        }
    }
}

impl FromStr for EncryptedKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uint32" | "euint32" => Ok(EncryptedKind::Uint32),
            "bool" | "ebool" => Ok(EncryptedKind::Bool),
            other => Err(format!("unknown encrypted kind: {}", other)),
        }
    }
}

/// Which path produced a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncryptionMode {
    Real,
    Mock,
}

impl fmt::Display for EncryptionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncryptionMode::Real => write!(f, "real"),
            EncryptionMode::Mock => write!(f, "mock"),
        }
    }
}

/// Result of one encryption, tagged with its path
///
/// Both variants carry the same payload shape; callers that only need the
/// payload use [`EncryptionOutcome::into_input`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptionOutcome {
    Real(EncryptedInput),
    Mock(EncryptedInput),
}

impl EncryptionOutcome {
    pub fn mode(&self) -> EncryptionMode {
        match self {
            EncryptionOutcome::Real(_) => EncryptionMode::Real,
            EncryptionOutcome::Mock(_) => EncryptionMode::Mock,
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, EncryptionOutcome::Mock(_))
    }

    pub fn input(&self) -> &EncryptedInput {
        match self {
            EncryptionOutcome::Real(input) | EncryptionOutcome::Mock(input) => input,
        }
    }

    pub fn into_input(self) -> EncryptedInput {
        match self {
            EncryptionOutcome::Real(input) | EncryptionOutcome::Mock(input) => input,
        }
    }
}
