//! SDK shape validation

use fhevm_client::sdk::{describe_sdk, is_valid_sdk, FakeRelayerSdk, HostValue, RelayerSdk};
use serde_json::json;

#[test]
fn test_rejects_undefined_null_and_non_objects() {
    assert!(!is_valid_sdk(&HostValue::Undefined));
    assert!(!is_valid_sdk(&HostValue::Null));
    assert!(!is_valid_sdk(&HostValue::from(json!(42))));
    assert!(!is_valid_sdk(&HostValue::from(json!("relayerSDK"))));
}

#[test]
fn test_rejects_missing_create_instance() {
    let candidate = HostValue::object()
        .function("initSDK")
        .prop("SepoliaConfig", HostValue::from(json!({"chainId": 11155111})))
        .build();
    assert!(!is_valid_sdk(&candidate));
}

#[test]
fn test_rejects_non_boolean_initialized() {
    let candidate = HostValue::object()
        .function("initSDK")
        .function("createInstance")
        .prop("SepoliaConfig", HostValue::object().build())
        .prop("__initialized__", HostValue::from(json!("true")))
        .build();
    assert!(!is_valid_sdk(&candidate));
}

#[test]
fn test_accepts_minimal_sdk() {
    let candidate = HostValue::object()
        .function("initSDK")
        .function("createInstance")
        .prop("SepoliaConfig", HostValue::object().build())
        .build();
    assert!(is_valid_sdk(&candidate));
}

#[test]
fn test_described_sdk_is_valid() {
    let sdk = FakeRelayerSdk::new();
    assert!(is_valid_sdk(&describe_sdk(&sdk)));

    sdk.mark_initialized();
    let described = describe_sdk(&sdk);
    assert_eq!(described.get("__initialized__"), Some(&HostValue::Bool(true)));
    assert!(is_valid_sdk(&described));
}
