// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Structural validation of the relayer SDK global
//!
//! A candidate is a valid SDK iff it is a non-null object exposing
//! `initSDK` (function), `createInstance` (function) and `SepoliaConfig`
//! (object). An `__initialized__` property, when present, must be boolean.
//! Every rejection is traced; validation never fails loudly.

use std::sync::Arc;
use tracing::debug;

use super::value::{HostType, HostValue};

/// Diagnostic callback receiving each rejection reason
pub type TraceFn = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone, Default)]
pub struct SdkValidator {
    trace: Option<TraceFn>,
}

impl SdkValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace(trace: TraceFn) -> Self {
        Self { trace: Some(trace) }
    }

    fn trace(&self, message: &str) {
        debug!("{}", message);
        if let Some(trace) = &self.trace {
            trace(message);
        }
    }

    /// Check that `candidate` has the relayer SDK shape
    pub fn is_valid_sdk(&self, candidate: &HostValue) -> bool {
        match candidate {
            HostValue::Undefined => {
                self.trace("RelayerSDKLoader: relayerSDK is undefined");
                return false;
            }
            HostValue::Null => {
                self.trace("RelayerSDKLoader: relayerSDK is null");
                return false;
            }
            HostValue::Object(_) => {}
            _ => {
                self.trace("RelayerSDKLoader: relayerSDK is not an object");
                return false;
            }
        }

        if !self.has_property(candidate, "initSDK", HostType::Function) {
            self.trace("RelayerSDKLoader: relayerSDK.initSDK is invalid");
            return false;
        }
        if !self.has_property(candidate, "createInstance", HostType::Function) {
            self.trace("RelayerSDKLoader: relayerSDK.createInstance is invalid");
            return false;
        }
        if !self.has_property(candidate, "SepoliaConfig", HostType::Object) {
            self.trace("RelayerSDKLoader: relayerSDK.SepoliaConfig is invalid");
            return false;
        }
        if let Some(initialized) = candidate.get("__initialized__") {
            if !matches!(initialized, HostValue::Bool(_)) {
                self.trace("RelayerSDKLoader: relayerSDK.__initialized__ is invalid");
                return false;
            }
        }

        true
    }

    /// Check that the global object exposes a valid SDK under `relayerSDK`
    ///
    /// `global` is `None` when the property is absent altogether.
    pub fn is_valid_global(&self, global: Option<&HostValue>) -> bool {
        match global {
            None => {
                self.trace("RelayerSDKLoader: global object does not contain 'relayerSDK' property");
                false
            }
            Some(value) => self.is_valid_sdk(value),
        }
    }

    /// Check that `obj` has a non-nullish property `name` of type `expected`
    pub fn has_property(&self, obj: &HostValue, name: &str, expected: HostType) -> bool {
        if !matches!(obj, HostValue::Object(_)) {
            return false;
        }

        let value = match obj.get(name) {
            Some(value) => value,
            None => {
                self.trace(&format!("RelayerSDKLoader: missing {}.", name));
                return false;
            }
        };

        if value.is_nullish() {
            self.trace(&format!("RelayerSDKLoader: {} is null or undefined.", name));
            return false;
        }

        if value.type_of() != expected {
            self.trace(&format!("RelayerSDKLoader: {} is not a {}.", name, expected));
            return false;
        }

        true
    }
}

/// Shape check with the default (tracing-only) validator
pub fn is_valid_sdk(candidate: &HostValue) -> bool {
    SdkValidator::new().is_valid_sdk(candidate)
}
