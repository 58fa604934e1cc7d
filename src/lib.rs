// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod config;
pub mod connection;
pub mod fhevm;
pub mod keys;
pub mod sdk;
pub mod storage;

pub use config::{FhevmConfig, LoaderMode, NetworkId, NetworkRegistry};
pub use connection::{Connection, EthersConnection};
pub use fhevm::{
    ClientFactory, EncryptedInput, EncryptedKind, EncryptionClient, EncryptionError,
    EncryptionMode, EncryptionOutcome, FhevmSession, SessionStatus,
};
pub use keys::{Clock, PublicKeyRecord, PublicKeyStore, SystemClock};
pub use sdk::{EnvironmentError, LoadError, ScriptHost, SdkHandle, SdkLoader};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
