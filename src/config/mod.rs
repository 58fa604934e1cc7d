// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod networks;
pub mod settings;

pub use networks::{
    is_supported_network, network_name, InstancePreset, NetworkId, NetworkInfo, NetworkRegistry,
    HARDHAT_CHAIN_ID, LOCALHOST_CHAIN_ID, SDK_CDN_URL, SDK_GLOBAL_NAME, SEPOLIA_CHAIN_ID,
    SUPPORTED_NETWORKS,
};
pub use settings::{FhevmConfig, LoaderMode, PUBLIC_KEY_STORAGE_KEY, PUBLIC_KEY_TTL};
