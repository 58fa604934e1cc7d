// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Relayer SDK Module
//!
//! Loads the third-party relayer SDK into a scripting host, validates its
//! shape and binds it to typed traits.
//!
//! ## Module Structure
//!
//! - `value`: structural view of host values (`typeof` semantics)
//! - `validation`: SDK shape checks with optional diagnostic tracing
//! - `host`: scripting host boundary and the in-process `MemoryHost`
//! - `relayer`: typed SDK, instance and encrypted-input builder traits
//! - `loader`: single-flight SDK loader
//! - `fake`: in-process SDK for hosts without the real bundle
//! - `error`: `EnvironmentError` and `LoadError`

pub mod error;
pub mod fake;
pub mod host;
pub mod loader;
pub mod relayer;
pub mod validation;
pub mod value;

pub use error::{EnvironmentError, LoadError};
pub use fake::{FakeBehavior, FakeOutput, FakeRelayerSdk};
pub use host::{HostedScript, MemoryHost, ScriptHost};
pub use loader::{LoaderState, SdkLoader};
pub use relayer::{
    describe_sdk, EncryptedInputBuilder, EncryptedPayload, FhevmInstance, InstanceConfig,
    RelayerSdk, SdkHandle,
};
pub use validation::{is_valid_sdk, SdkValidator, TraceFn};
pub use value::{HostType, HostValue};
