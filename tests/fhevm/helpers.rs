//! Shared fixtures for encryption client tests

use anyhow::anyhow;
use async_trait::async_trait;
use ethers::types::Address;
use fhevm_client::config::{FhevmConfig, NetworkId};
use fhevm_client::connection::Connection;
use fhevm_client::fhevm::ClientFactory;
use fhevm_client::keys::{ManualClock, PublicKeyStore};
use fhevm_client::sdk::{FakeBehavior, FakeRelayerSdk, HostedScript, MemoryHost, SdkLoader};
use fhevm_client::storage::MemoryStorage;
use mockall::mock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const T0: i64 = 1_700_000_000_000;

pub fn user() -> Address {
    Address::repeat_byte(0x0e)
}

pub fn contract() -> Address {
    Address::repeat_byte(0xc0)
}

mock! {
    pub Wallet {}

    #[async_trait]
    impl Connection for Wallet {
        async fn chain_id(&self) -> anyhow::Result<NetworkId>;
        async fn signer_address(&self) -> anyhow::Result<Address>;
        fn rpc_url(&self) -> Option<String>;
    }
}

/// Wallet on `chain_id` whose signer is [`user`]
pub fn wallet(chain_id: NetworkId) -> Arc<MockWallet> {
    let mut wallet = MockWallet::new();
    wallet.expect_chain_id().returning(move || Ok(chain_id));
    wallet.expect_signer_address().returning(|| Ok(user()));
    wallet.expect_rpc_url().returning(|| None);
    Arc::new(wallet)
}

/// Wallet on `chain_id` with a locked signer
pub fn locked_wallet(chain_id: NetworkId) -> Arc<MockWallet> {
    let mut wallet = MockWallet::new();
    wallet.expect_chain_id().returning(move || Ok(chain_id));
    wallet
        .expect_signer_address()
        .returning(|| Err(anyhow!("wallet locked")));
    wallet.expect_rpc_url().returning(|| None);
    Arc::new(wallet)
}

/// Connection whose active network can be switched
pub struct SwitchableConnection {
    chain_id: AtomicU64,
}

impl SwitchableConnection {
    pub fn new(chain_id: NetworkId) -> Self {
        Self {
            chain_id: AtomicU64::new(chain_id),
        }
    }

    pub fn switch_to(&self, chain_id: NetworkId) {
        self.chain_id.store(chain_id, Ordering::SeqCst);
    }
}

#[async_trait]
impl Connection for SwitchableConnection {
    async fn chain_id(&self) -> anyhow::Result<NetworkId> {
        Ok(self.chain_id.load(Ordering::SeqCst))
    }

    async fn signer_address(&self) -> anyhow::Result<Address> {
        Ok(user())
    }
}

pub struct TestEnv {
    pub host: Arc<MemoryHost>,
    pub sdk: Arc<FakeRelayerSdk>,
    pub clock: Arc<ManualClock>,
    pub keys: Arc<PublicKeyStore>,
    pub factory: ClientFactory,
}

impl TestEnv {
    /// Host that serves a working SDK
    pub fn with_sdk() -> Self {
        Self::with_behavior(FakeBehavior::default())
    }

    /// Host that serves an SDK with scripted failures
    pub fn with_behavior(behavior: FakeBehavior) -> Self {
        let env = Self::unreachable_sdk();
        env.host.serve(
            FhevmConfig::default().sdk_url,
            HostedScript::Sdk(env.sdk.clone()),
        );
        env.sdk.set_behavior(behavior);
        env
    }

    /// Host where fetching the SDK fails
    pub fn unreachable_sdk() -> Self {
        let host = Arc::new(MemoryHost::new());
        let sdk = Arc::new(FakeRelayerSdk::new());
        let clock = Arc::new(ManualClock::new(T0));
        let keys = Arc::new(PublicKeyStore::load(
            Arc::new(MemoryStorage::new()),
            clock.clone(),
        ));
        let loader = Arc::new(SdkLoader::new(
            Some(host.clone()),
            &FhevmConfig::default(),
        ));
        let factory = ClientFactory::new(keys.clone(), loader, clock.clone());

        Self {
            host,
            sdk,
            clock,
            keys,
            factory,
        }
    }
}
