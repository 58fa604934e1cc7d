// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cache;
pub mod encrypt;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{NetworkRegistry, SDK_CDN_URL};

/// FHEVM encrypted-input CLI
#[derive(Parser, Debug)]
#[command(name = "fhevm-cli")]
#[command(version)]
#[command(about = "Tools for FHEVM encrypted inputs and the public key cache", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List networks with FHEVM support
    Networks,

    /// Inspect or maintain the persisted public key cache
    Cache(cache::CacheArgs),

    /// Build an encrypted input for a contract call
    Encrypt(encrypt::EncryptArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Networks => {
            list_networks();
            Ok(())
        }
        Commands::Cache(args) => cache::run(args),
        Commands::Encrypt(args) => encrypt::run(args).await,
    }
}

fn list_networks() {
    println!("SDK: {}", SDK_CDN_URL);
    println!();
    for network in NetworkRegistry::new().list() {
        println!(
            "{:>10}  {:<16} {:<9} {}",
            network.chain_id,
            network.name,
            format!("{:?}", network.preset).to_lowercase(),
            network.rpc_url
        );
    }
}
