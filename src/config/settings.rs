// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client Configuration
//!
//! Provides configuration for SDK loading and key caching from environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::networks::SDK_CDN_URL;

/// Storage key the public key cache is persisted under
pub const PUBLIC_KEY_STORAGE_KEY: &str = "fhevm_public_keys";

/// Public key time-to-live (24 hours)
pub const PUBLIC_KEY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// How the loader treats a script tag that exists while the SDK global is invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoaderMode {
    /// Report the inconsistent state as a load failure
    #[default]
    Strict,
    /// Resolve anyway; the client then has no SDK handle and stays in mock mode
    Lenient,
}

impl FromStr for LoaderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(LoaderMode::Strict),
            "lenient" => Ok(LoaderMode::Lenient),
            other => Err(format!("unknown loader mode '{}'", other)),
        }
    }
}

/// FHEVM client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhevmConfig {
    /// Relayer SDK resource URL
    pub sdk_url: String,

    /// Directory backing the persisted key cache
    pub key_cache_dir: PathBuf,

    /// Public key time-to-live in seconds
    pub key_ttl_secs: u64,

    /// Inconsistent-state handling of the SDK loader
    pub loader_mode: LoaderMode,

    /// Never load the SDK; every encryption uses the mock path
    pub force_mock: bool,
}

impl Default for FhevmConfig {
    fn default() -> Self {
        Self {
            sdk_url: SDK_CDN_URL.to_string(),
            key_cache_dir: PathBuf::from("./.fhevm"),
            key_ttl_secs: PUBLIC_KEY_TTL.as_secs(),
            loader_mode: LoaderMode::Strict,
            force_mock: false,
        }
    }
}

impl FhevmConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `FHEVM_SDK_URL`: SDK resource URL
    /// - `FHEVM_KEY_CACHE_DIR`: Directory for the persisted key cache
    /// - `FHEVM_KEY_TTL_SECS`: Key TTL in seconds (default: 86400)
    /// - `FHEVM_LOADER_MODE`: strict/lenient (default: strict)
    /// - `FHEVM_FORCE_MOCK`: true/false (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            sdk_url: env::var("FHEVM_SDK_URL").unwrap_or(defaults.sdk_url),
            key_cache_dir: env::var("FHEVM_KEY_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.key_cache_dir),
            key_ttl_secs: env::var("FHEVM_KEY_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.key_ttl_secs),
            loader_mode: env::var("FHEVM_LOADER_MODE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.loader_mode),
            force_mock: env::var("FHEVM_FORCE_MOCK")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        let url = url::Url::parse(&self.sdk_url)
            .map_err(|e| format!("sdk_url is not a valid URL: {}", e))?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(format!("sdk_url must be http(s), got {}", url.scheme()));
        }

        if self.key_ttl_secs == 0 {
            return Err("key_ttl_secs must be > 0".to_string());
        }

        Ok(())
    }

    pub fn key_ttl(&self) -> Duration {
        Duration::from_secs(self.key_ttl_secs)
    }
}
