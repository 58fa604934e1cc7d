//! Dynamic shape of values exposed by a scripting host
//!
//! The relayer SDK is delivered as untyped code at runtime, so before it is
//! bound to the typed [`super::RelayerSdk`] traits its global object is
//! checked structurally. [`HostValue`] is that structural view.

use std::collections::BTreeMap;

/// Result of a `typeof` probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostType {
    Undefined,
    Object,
    Boolean,
    Number,
    String,
    Function,
}

impl std::fmt::Display for HostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HostType::Undefined => "undefined",
            HostType::Object => "object",
            HostType::Boolean => "boolean",
            HostType::Number => "number",
            HostType::String => "string",
            HostType::Function => "function",
        };
        write!(f, "{}", name)
    }
}

/// A value as seen through the host's reflection
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Function,
    Object(BTreeMap<String, HostValue>),
}

impl HostValue {
    /// `typeof` semantics: null reports as an object
    pub fn type_of(&self) -> HostType {
        match self {
            HostValue::Undefined => HostType::Undefined,
            HostValue::Null | HostValue::Object(_) => HostType::Object,
            HostValue::Bool(_) => HostType::Boolean,
            HostValue::Number(_) => HostType::Number,
            HostValue::String(_) => HostType::String,
            HostValue::Function => HostType::Function,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, HostValue::Undefined | HostValue::Null)
    }

    /// Own property lookup; `None` when the property is absent or `self` is not an object
    pub fn get(&self, name: &str) -> Option<&HostValue> {
        match self {
            HostValue::Object(props) => props.get(name),
            _ => None,
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Start building an object value
    pub fn object() -> ObjectBuilder {
        ObjectBuilder::default()
    }
}

impl From<serde_json::Value> for HostValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => HostValue::Null,
            serde_json::Value::Bool(b) => HostValue::Bool(b),
            serde_json::Value::Number(n) => HostValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => HostValue::String(s),
            serde_json::Value::Array(items) => {
                // Arrays are objects keyed by index
                HostValue::Object(
                    items
                        .into_iter()
                        .enumerate()
                        .map(|(i, v)| (i.to_string(), v.into()))
                        .collect(),
                )
            }
            serde_json::Value::Object(map) => {
                HostValue::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ObjectBuilder {
    props: BTreeMap<String, HostValue>,
}

impl ObjectBuilder {
    pub fn prop(mut self, name: &str, value: HostValue) -> Self {
        self.props.insert(name.to_string(), value);
        self
    }

    pub fn function(self, name: &str) -> Self {
        self.prop(name, HostValue::Function)
    }

    pub fn build(self) -> HostValue {
        HostValue::Object(self.props)
    }
}
