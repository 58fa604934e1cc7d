// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Relayer SDK loader
//!
//! Makes the relayer SDK available in the scripting host exactly once and
//! validates its shape before it is used.
//!
//! ## State machine
//!
//! ```text
//! NotChecked ──load ok──▶ Loaded
//!      │
//!      └──load err──▶ Failed ──load──▶ (retry)
//! ```
//!
//! `load` holds a single async lock for the whole attempt, so concurrent
//! first loads are serialised: later callers find the SDK already valid and
//! resolve without injecting the script a second time. A failed attempt
//! removes the tag it injected so the next `load` starts clean.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::error::{EnvironmentError, LoadError};
use super::host::ScriptHost;
use super::relayer::SdkHandle;
use super::validation::SdkValidator;
use super::value::HostValue;
use crate::config::{FhevmConfig, LoaderMode, SDK_GLOBAL_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    NotChecked,
    Loaded,
    Failed,
}

pub struct SdkLoader {
    host: Option<Arc<dyn ScriptHost>>,
    sdk_url: String,
    mode: LoaderMode,
    validator: SdkValidator,
    state: Mutex<LoaderState>,
}

impl SdkLoader {
    /// Loader bound to `host`; `None` means no scripting host is available
    pub fn new(host: Option<Arc<dyn ScriptHost>>, config: &FhevmConfig) -> Self {
        Self {
            host,
            sdk_url: config.sdk_url.clone(),
            mode: config.loader_mode,
            validator: SdkValidator::new(),
            state: Mutex::new(LoaderState::NotChecked),
        }
    }

    /// Loader for an environment without a scripting host
    pub fn detached(config: &FhevmConfig) -> Self {
        Self::new(None, config)
    }

    pub fn with_validator(mut self, validator: SdkValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn sdk_url(&self) -> &str {
        &self.sdk_url
    }

    pub fn mode(&self) -> LoaderMode {
        self.mode
    }

    pub async fn state(&self) -> LoaderState {
        *self.state.lock().await
    }

    fn host(&self) -> Result<&Arc<dyn ScriptHost>, EnvironmentError> {
        self.host.as_ref().ok_or(EnvironmentError)
    }

    /// Whether the host already exposes a valid SDK global
    pub fn is_loaded(&self) -> Result<bool, EnvironmentError> {
        let host = self.host()?;
        Ok(self
            .validator
            .is_valid_global(host.global_property(SDK_GLOBAL_NAME).as_ref()))
    }

    /// Structural check of an arbitrary candidate
    pub fn is_valid_sdk(&self, candidate: &HostValue) -> bool {
        self.validator.is_valid_sdk(candidate)
    }

    /// Whether the host's `relayerSDK` global passes validation
    ///
    /// Returns false when there is no host at all.
    pub fn has_environment_sdk(&self) -> bool {
        self.is_loaded().unwrap_or(false)
    }

    /// Ensure the SDK is present and valid
    pub async fn load(&self) -> Result<(), LoadError> {
        debug!("[RelayerSDKLoader] load...");
        let host = self.host()?;
        let mut state = self.state.lock().await;

        if self.has_environment_sdk() {
            *state = LoaderState::Loaded;
            return Ok(());
        }

        if host.has_script(&self.sdk_url) {
            return match self.mode {
                LoaderMode::Strict => {
                    *state = LoaderState::Failed;
                    Err(LoadError::InconsistentState {
                        url: self.sdk_url.clone(),
                    })
                }
                LoaderMode::Lenient => {
                    warn!(
                        "⚠️  Script for {} already present but relayerSDK is invalid, continuing",
                        self.sdk_url
                    );
                    *state = LoaderState::Loaded;
                    Ok(())
                }
            };
        }

        debug!("[RelayerSDKLoader] add script for {}", self.sdk_url);
        if let Err(e) = host.inject_script(&self.sdk_url).await {
            host.remove_script(&self.sdk_url);
            *state = LoaderState::Failed;
            return Err(LoadError::FetchFailed {
                url: self.sdk_url.clone(),
                reason: e.to_string(),
            });
        }

        if !self.has_environment_sdk() {
            host.remove_script(&self.sdk_url);
            *state = LoaderState::Failed;
            return Err(LoadError::InvalidSdk {
                url: self.sdk_url.clone(),
            });
        }

        *state = LoaderState::Loaded;
        info!("✅ Relayer SDK loaded from {}", self.sdk_url);
        Ok(())
    }

    /// Bind the validated SDK global, if there is one
    pub fn sdk_handle(&self) -> Option<SdkHandle> {
        if !self.has_environment_sdk() {
            return None;
        }
        let sdk = self.host.as_ref()?.relayer_sdk()?;
        Some(SdkHandle::new(sdk, self.sdk_url.clone()))
    }
}
