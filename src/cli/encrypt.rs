use anyhow::{anyhow, Result};
use clap::Args;
use ethers::types::Address;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::config::FhevmConfig;
use crate::connection::EthersConnection;
use crate::fhevm::{ClientFactory, EncryptedKind};

/// Arguments for the encrypt command
#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// JSON-RPC endpoint of the target network
    #[arg(long, env = "FHEVM_RPC_URL")]
    pub rpc_url: String,

    /// Signer private key (defaults to the node's first account)
    #[arg(long, env = "FHEVM_PRIVATE_KEY")]
    pub private_key: Option<String>,

    /// Contract the input is scoped to
    #[arg(long)]
    pub contract: String,

    /// Plaintext value (non-zero is true for bool)
    #[arg(long)]
    pub value: u32,

    /// Encrypted type (uint32/bool)
    #[arg(long, default_value = "uint32")]
    pub kind: EncryptedKind,
}

pub async fn run(args: EncryptArgs) -> Result<()> {
    let contract = Address::from_str(&args.contract)
        .map_err(|e| anyhow!("Invalid contract address {}: {}", args.contract, e))?;

    let config = FhevmConfig::from_env();
    // No scripting host natively, payloads come from the mock path
    let factory = ClientFactory::from_config(&config, None)?;
    let connection = Arc::new(EthersConnection::new(
        &args.rpc_url,
        args.private_key.as_deref(),
    )?);

    let client = factory.create(connection).await?;
    info!(
        "Encrypting {} value for {:?} on chain {}",
        args.kind,
        contract,
        client.chain_id()
    );

    let outcome = client.encrypt(contract, args.value, args.kind).await;
    let mode = outcome.mode();
    let input = outcome.into_input();

    let output = json!({
        "mode": mode,
        "handle": input.handle,
        "proof": input.proof,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
