// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! SDK loading error types

use thiserror::Error;

/// No scripting host is available in the current execution environment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("RelayerSDKLoader: can only be used in a browser-like environment")]
pub struct EnvironmentError;

/// Errors surfaced by [`super::SdkLoader::load`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    /// The resource could not be fetched
    #[error("RelayerSDKLoader: Failed to load Relayer SDK from {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// The resource loaded but did not install a valid SDK global
    #[error(
        "RelayerSDKLoader: Relayer SDK script has been successfully loaded from {url}, \
         however, the relayerSDK global is invalid"
    )]
    InvalidSdk { url: String },

    /// A script tag for the SDK exists but the global is not (yet) valid
    #[error("RelayerSDKLoader: script for {url} is present but the relayerSDK global is not valid")]
    InconsistentState { url: String },
}

impl LoadError {
    /// URL of the resource involved, when there is one
    pub fn url(&self) -> Option<&str> {
        match self {
            LoadError::Environment(_) => None,
            LoadError::FetchFailed { url, .. }
            | LoadError::InvalidSdk { url }
            | LoadError::InconsistentState { url } => Some(url),
        }
    }
}
