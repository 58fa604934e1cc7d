use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use std::sync::Arc;

use crate::config::{network_name, FhevmConfig, NetworkId};
use crate::keys::{Clock, PublicKeyStore, SystemClock};
use crate::storage::FileStorage;

/// Arguments for the cache command
#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show every cached key with its age
    List,

    /// Remove one network's key, or all keys
    Clear {
        /// Chain ID to clear (all networks when omitted)
        #[arg(long)]
        chain_id: Option<NetworkId>,
    },

    /// Remove expired keys
    Purge,
}

pub fn run(args: CacheArgs) -> Result<()> {
    let config = FhevmConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow!("Invalid FHEVM configuration: {}", e))?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = PublicKeyStore::load_with_ttl(
        Arc::new(FileStorage::new(&config.key_cache_dir)),
        clock.clone(),
        config.key_ttl(),
    );

    match args.action {
        CacheAction::List => list(&store, clock.now_ms()),
        CacheAction::Clear { chain_id: Some(id) } => {
            store.clear(id);
            println!("✅ Cleared key for chain {}", id);
        }
        CacheAction::Clear { chain_id: None } => {
            store.clear_all();
            println!("✅ Cleared all cached keys");
        }
        CacheAction::Purge => {
            let removed = store.purge_expired();
            println!("🧹 Removed {} expired keys", removed);
        }
    }
    Ok(())
}

fn list(store: &PublicKeyStore, now_ms: i64) {
    let records = store.records();
    if records.is_empty() {
        println!("No cached public keys");
        return;
    }

    for record in records {
        let age_secs = record.age_ms(now_ms) / 1000;
        let state = if record.is_expired(now_ms, store.ttl()) {
            "expired"
        } else {
            "valid"
        };
        println!(
            "{:>10}  {:<16} {:<8} age {:>6}s  {}",
            record.network_id,
            network_name(record.network_id),
            state,
            age_secs,
            record.key
        );
    }
}
