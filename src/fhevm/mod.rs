// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Encrypted-input subsystem
//!
//! ## Module Structure
//!
//! - `client`: `EncryptionClient` with the real/mock dual path
//! - `factory`: `ClientFactory`, the construction path for clients
//! - `session`: `FhevmSession`, one client per wallet connection
//! - `mock`: deterministic mock handle/proof encoding
//! - `public_key`: per-network public key derivation and caching
//! - `input`: payload and outcome types
//! - `metrics`: real/mock path counters
//! - `error`: `EncryptionError`
//!
//! ## Example
//!
//! ```ignore
//! let factory = ClientFactory::from_config(&FhevmConfig::from_env(), None)?;
//! let client = factory.create(connection).await?;
//! let input = client.create_encrypted_input(contract, 5, EncryptedKind::Uint32).await;
//! ```

pub mod client;
pub mod error;
pub mod factory;
pub mod input;
pub mod metrics;
pub mod mock;
pub mod public_key;
pub mod session;

pub use client::EncryptionClient;
pub use error::{EncryptionError, EncryptionResult};
pub use factory::ClientFactory;
pub use input::{EncryptedInput, EncryptedKind, EncryptionMode, EncryptionOutcome};
pub use metrics::{ClientMetrics, MetricsSnapshot};
pub use mock::{encode_mock_input, MockEncoder};
pub use public_key::{emergency_public_key, get_or_fetch_public_key, local_public_key};
pub use session::{FhevmSession, SessionStatus};
