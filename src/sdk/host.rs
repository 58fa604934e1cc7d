// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scripting host abstraction
//!
//! The environment the SDK is loaded into: a global object that can be
//! probed, a set of script tags, and the ability to inject a new script that
//! resolves once the resource has loaded (or rejects if the fetch fails).
//!
//! [`MemoryHost`] is an in-process host. Resources are registered up front
//! with [`MemoryHost::serve`]; injecting an unregistered URL fails like a
//! network error would.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::debug;

use super::relayer::{describe_sdk, RelayerSdk};
use super::value::HostValue;
use crate::config::SDK_GLOBAL_NAME;

/// Execution environment the SDK lives in
#[async_trait]
pub trait ScriptHost: Send + Sync {
    /// Read a property of the global object; `None` when absent
    fn global_property(&self, name: &str) -> Option<HostValue>;

    /// Whether a script tag with this `src` already exists
    fn has_script(&self, src: &str) -> bool;

    /// Add a script tag for `src` and wait for it to load
    async fn inject_script(&self, src: &str) -> Result<()>;

    /// Remove the script tag for `src`, if present
    fn remove_script(&self, src: &str);

    /// Typed binding for the `relayerSDK` global, if the host has one
    fn relayer_sdk(&self) -> Option<Arc<dyn RelayerSdk>>;
}

/// What loading a served resource does to the global object
#[derive(Clone)]
pub enum HostedScript {
    /// Installs a working relayer SDK
    Sdk(Arc<dyn RelayerSdk>),
    /// Installs an arbitrary (possibly invalid) `relayerSDK` value
    Global(HostValue),
    /// Loads without touching the global object
    Empty,
}

#[derive(Default)]
struct HostState {
    globals: BTreeMap<String, HostValue>,
    scripts: Vec<String>,
    resources: HashMap<String, HostedScript>,
    sdk: Option<Arc<dyn RelayerSdk>>,
    injections: usize,
}

/// In-process scripting host
#[derive(Default)]
pub struct MemoryHost {
    state: RwLock<HostState>,
    load_delay: Option<Duration>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every script load, to widen concurrency windows
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = Some(delay);
        self
    }

    /// Register a resource that injection of `url` will load
    pub fn serve(&self, url: impl Into<String>, script: HostedScript) {
        self.write().resources.insert(url.into(), script);
    }

    /// Install an SDK as if its script had already run
    pub fn install_sdk(&self, sdk: Arc<dyn RelayerSdk>) {
        let mut state = self.write();
        state
            .globals
            .insert(SDK_GLOBAL_NAME.to_string(), describe_sdk(sdk.as_ref()));
        state.sdk = Some(sdk);
    }

    /// Set a raw global value
    pub fn set_global(&self, name: &str, value: HostValue) {
        self.write().globals.insert(name.to_string(), value);
    }

    /// Add a script tag without loading anything
    pub fn add_script_tag(&self, src: impl Into<String>) {
        self.write().scripts.push(src.into());
    }

    /// Number of `inject_script` calls so far
    pub fn injection_count(&self) -> usize {
        self.read().injections
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HostState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HostState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ScriptHost for MemoryHost {
    fn global_property(&self, name: &str) -> Option<HostValue> {
        let state = self.read();
        if name == SDK_GLOBAL_NAME {
            // Reflect live state such as the __initialized__ flag
            if let Some(sdk) = &state.sdk {
                return Some(describe_sdk(sdk.as_ref()));
            }
        }
        state.globals.get(name).cloned()
    }

    fn has_script(&self, src: &str) -> bool {
        self.read().scripts.iter().any(|s| s == src)
    }

    async fn inject_script(&self, src: &str) -> Result<()> {
        let resource = {
            let mut state = self.write();
            state.injections += 1;
            state.scripts.push(src.to_string());
            state.resources.get(src).cloned()
        };
        debug!("📜 Script added for {}", src);

        if let Some(delay) = self.load_delay {
            tokio::time::sleep(delay).await;
        }

        let resource = resource.ok_or_else(|| anyhow!("network error fetching {}", src))?;

        let mut state = self.write();
        match resource {
            HostedScript::Sdk(sdk) => {
                state
                    .globals
                    .insert(SDK_GLOBAL_NAME.to_string(), describe_sdk(sdk.as_ref()));
                state.sdk = Some(sdk);
            }
            HostedScript::Global(value) => {
                state.globals.insert(SDK_GLOBAL_NAME.to_string(), value);
                state.sdk = None;
            }
            HostedScript::Empty => {}
        }
        Ok(())
    }

    fn remove_script(&self, src: &str) {
        self.write().scripts.retain(|s| s != src);
    }

    fn relayer_sdk(&self) -> Option<Arc<dyn RelayerSdk>> {
        self.read().sdk.clone()
    }
}
