// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Public key caching
//!
//! - **Clock**: injectable wall-clock source
//! - **Store**: per-network public key cache with a 24h TTL, persisted through
//!   a [`crate::storage::KeyValueStorage`] backend

pub mod clock;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{PublicKeyRecord, PublicKeyStore};
