// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Public Key Storage
//!
//! TTL-bounded cache of FHE public keys, one per network, persisted through a
//! [`KeyValueStorage`] backend so keys survive across sessions.
//!
//! A record is valid while `now - timestamp < ttl`. Expired records are
//! treated as absent and evicted on the next `get` or `purge_expired`.
//!
//! The persisted form is a JSON array of `[networkId, record]` pairs stored
//! under [`PUBLIC_KEY_STORAGE_KEY`]. Malformed persisted data loads as an empty
//! cache; persistence failures are logged and never surface to callers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::clock::Clock;
use crate::config::{NetworkId, PUBLIC_KEY_STORAGE_KEY, PUBLIC_KEY_TTL};
use crate::storage::KeyValueStorage;

/// A cached public key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyRecord {
    /// Hex encoded key material (0x-prefixed)
    pub key: String,
    /// Acquisition time in unix milliseconds
    pub timestamp: i64,
    #[serde(alias = "chainId")]
    pub network_id: NetworkId,
}

impl PublicKeyRecord {
    /// Milliseconds elapsed since acquisition
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.timestamp)
    }

    /// Records stamped before the epoch or in the future count as expired
    pub fn is_expired(&self, now_ms: i64, ttl: Duration) -> bool {
        if self.timestamp < 0 || self.timestamp > now_ms {
            return true;
        }
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        self.age_ms(now_ms) >= ttl_ms
    }

    fn key_preview(&self) -> String {
        let preview: String = self.key.chars().take(20).collect();
        format!("{}...", preview)
    }
}

/// Persisted cache layout
type PersistedCache = Vec<(NetworkId, PublicKeyRecord)>;

/// Durable, TTL-bounded public key cache
///
/// # Example
///
/// ```ignore
/// let store = PublicKeyStore::load(Arc::new(MemoryStorage::new()), Arc::new(SystemClock));
/// store.set(11155111, "0xabc...");
/// let record = store.get(11155111);
/// store.clear_all();
/// ```
pub struct PublicKeyStore {
    cache: RwLock<BTreeMap<NetworkId, PublicKeyRecord>>,
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl PublicKeyStore {
    /// Create a store with the default 24h TTL, loading any persisted cache
    pub fn load(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        Self::load_with_ttl(storage, clock, PUBLIC_KEY_TTL)
    }

    pub fn load_with_ttl(
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        let cache = Self::load_from_storage(storage.as_ref());
        Self {
            cache: RwLock::new(cache),
            storage,
            clock,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up the key for `network_id`, evicting it if expired
    pub fn get(&self, network_id: NetworkId) -> Option<PublicKeyRecord> {
        let now = self.clock.now_ms();
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            match cache.get(&network_id) {
                None => return None,
                Some(record) if !record.is_expired(now, self.ttl) => return Some(record.clone()),
                Some(_) => {}
            }
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        // Re-check under the write lock, a concurrent set may have refreshed it
        match cache.get(&network_id) {
            Some(record) if !record.is_expired(now, self.ttl) => Some(record.clone()),
            Some(_) => {
                cache.remove(&network_id);
                self.save_to_storage(&cache);
                debug!("⏱️  Public key for chain {} expired", network_id);
                None
            }
            None => None,
        }
    }

    /// Store `key` for `network_id` with the current time
    pub fn set(&self, network_id: NetworkId, key: impl Into<String>) -> PublicKeyRecord {
        let record = PublicKeyRecord {
            key: key.into(),
            timestamp: self.clock.now_ms(),
            network_id,
        };

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache.insert(network_id, record.clone());
        self.save_to_storage(&cache);

        info!(
            "✅ Cached public key for chain {}: {} (acquired at {})",
            network_id,
            record.key_preview(),
            record.timestamp
        );
        record
    }

    /// Remove the key for `network_id`
    pub fn clear(&self, network_id: NetworkId) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if cache.remove(&network_id).is_some() {
            self.save_to_storage(&cache);
            info!("🗑️  Cleared cached public key for chain {}", network_id);
        }
    }

    /// Remove every cached key
    pub fn clear_all(&self) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let count = cache.len();
        cache.clear();
        if let Err(e) = self.storage.remove_item(PUBLIC_KEY_STORAGE_KEY) {
            warn!("⚠️  Failed to remove public key cache: {}", e);
        }
        info!("🗑️  Cleared all cached public keys (count: {})", count);
    }

    /// Remove every expired key, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let before = cache.len();
        cache.retain(|_, record| !record.is_expired(now, self.ttl));
        let removed = before - cache.len();

        if removed > 0 {
            self.save_to_storage(&cache);
            info!("🧹 Cleaned up {} expired public keys", removed);
        }
        removed
    }

    /// Snapshot of every record currently held, expired or not
    pub fn records(&self) -> Vec<PublicKeyRecord> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load_from_storage(storage: &dyn KeyValueStorage) -> BTreeMap<NetworkId, PublicKeyRecord> {
        let stored = match storage.get_item(PUBLIC_KEY_STORAGE_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => return BTreeMap::new(),
            Err(e) => {
                warn!("⚠️  Failed to read public key cache: {}", e);
                return BTreeMap::new();
            }
        };

        match serde_json::from_str::<PersistedCache>(&stored) {
            Ok(entries) => {
                info!("📥 Loaded public key cache ({} entries)", entries.len());
                entries.into_iter().collect()
            }
            Err(e) => {
                warn!("⚠️  Failed to load public key cache, starting empty: {}", e);
                BTreeMap::new()
            }
        }
    }

    fn save_to_storage(&self, cache: &BTreeMap<NetworkId, PublicKeyRecord>) {
        let entries: PersistedCache = cache
            .iter()
            .map(|(id, record)| (*id, record.clone()))
            .collect();

        let result = serde_json::to_string(&entries)
            .map_err(Into::into)
            .and_then(|json| self.storage.set_item(PUBLIC_KEY_STORAGE_KEY, &json));

        if let Err(e) = result {
            warn!("⚠️  Failed to save public key cache: {}", e);
        }
    }
}
