//! <https://w3c.github.io/webdriver-bidi/#type-script-RemoteValue>

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::local_value::{LocalValue, MappingKey, RemoteObjectReference, RemoteReference, SharedReference};
use crate::browsing_context::BrowsingContext;

/// <https://w3c.github.io/webdriver-bidi/#type-script-Handle>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct Handle(pub String);

/// <https://w3c.github.io/webdriver-bidi/#type-script-InternalId>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct InternalId(pub String);

/// <https://w3c.github.io/webdriver-bidi/#type-script-SharedId>
///
/// For elements this is the same string the classic protocol uses as web element reference.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct SharedId(pub String);

/// <https://w3c.github.io/webdriver-bidi/#type-script-PrimitiveProtocolValue>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialNumber {
    NaN,
    #[serde(rename = "-0")]
    NegativeZero,
    Infinity,
    #[serde(rename = "-Infinity")]
    NegativeInfinity,
}

impl SpecialNumber {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NaN => "NaN",
            Self::NegativeZero => "-0",
            Self::Infinity => "Infinity",
            Self::NegativeInfinity => "-Infinity",
        }
    }

    #[must_use]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::NaN => f64::NAN,
            Self::NegativeZero => -0.0,
            Self::Infinity => f64::INFINITY,
            Self::NegativeInfinity => f64::NEG_INFINITY,
        }
    }
}

/// A JavaScript number. Values JSON cannot carry travel as [`SpecialNumber`] strings.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum Number {
    Special(SpecialNumber),
    Finite(f64),
}

impl Number {
    #[must_use]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Special(special) => special.as_f64(),
            Self::Finite(value) => value,
        }
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Self::Special(SpecialNumber::NaN)
        } else if value == f64::INFINITY {
            Self::Special(SpecialNumber::Infinity)
        } else if value == f64::NEG_INFINITY {
            Self::Special(SpecialNumber::NegativeInfinity)
        } else if value == 0.0 && value.is_sign_negative() {
            Self::Special(SpecialNumber::NegativeZero)
        } else {
            Self::Finite(value)
        }
    }
}

impl From<SpecialNumber> for Number {
    fn from(value: SpecialNumber) -> Self {
        Self::Special(value)
    }
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-RegExpValue>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct RegExpValue {
    pub pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub flags: Option<String>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-RemoteValue>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
pub enum RemoteValue {
    Undefined,
    Null,
    String {
        value: String,
    },
    Number {
        value: Number,
    },
    Boolean {
        value: bool,
    },
    #[serde(rename = "bigint")]
    BigInt {
        value: String,
    },
    Symbol(HandleOnlyRemoteValue),
    Array(ListRemoteValue),
    Object(MappingRemoteValue),
    Function(HandleOnlyRemoteValue),
    #[serde(rename = "regexp")]
    RegExp(RegExpRemoteValue),
    Date(DateRemoteValue),
    Map(MappingRemoteValue),
    Set(ListRemoteValue),
    #[serde(rename = "weakmap")]
    WeakMap(HandleOnlyRemoteValue),
    #[serde(rename = "weakset")]
    WeakSet(HandleOnlyRemoteValue),
    Generator(HandleOnlyRemoteValue),
    Error(HandleOnlyRemoteValue),
    Proxy(HandleOnlyRemoteValue),
    Promise(HandleOnlyRemoteValue),
    #[serde(rename = "typedarray")]
    TypedArray(HandleOnlyRemoteValue),
    #[serde(rename = "arraybuffer")]
    ArrayBuffer(HandleOnlyRemoteValue),
    #[serde(rename = "nodelist")]
    NodeList(ListRemoteValue),
    #[serde(rename = "htmlcollection")]
    HtmlCollection(ListRemoteValue),
    Node(NodeRemoteValue),
    #[serde(rename = "window")]
    WindowProxy(WindowProxyRemoteValue),
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-RemoteValue>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HandleOnlyRemoteValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub handle: Option<Handle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub internal_id: Option<InternalId>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-ListRemoteValue>
///
/// `value` is missing when the serialization depth was exhausted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListRemoteValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub handle: Option<Handle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub internal_id: Option<InternalId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub value: Option<Vec<RemoteValue>>,
}

/// Keys are strings for plain object properties, remote values otherwise.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RemoteMappingKey {
    String(String),
    Value(RemoteValue),
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-MappingRemoteValue>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MappingRemoteValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub handle: Option<Handle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub internal_id: Option<InternalId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub value: Option<Vec<(RemoteMappingKey, RemoteValue)>>,
}

impl MappingRemoteValue {
    /// Looks up a string key. Keys that are remote values never match.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RemoteValue> {
        self.value.as_ref()?.iter().find_map(|(k, v)| match k {
            RemoteMappingKey::String(k) if k == key => Some(v),
            RemoteMappingKey::Value(RemoteValue::String { value }) if value == key => Some(v),
            _ => None,
        })
    }
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-RegExpRemoteValue>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegExpRemoteValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub handle: Option<Handle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub internal_id: Option<InternalId>,
    pub value: RegExpValue,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-DateRemoteValue>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateRemoteValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub handle: Option<Handle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub internal_id: Option<InternalId>,
    pub value: String,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-NodeRemoteValue>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeRemoteValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub shared_id: Option<SharedId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub handle: Option<Handle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub internal_id: Option<InternalId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub value: Option<NodeProperties>,
}

impl NodeRemoteValue {
    /// The reference to pass this node back as an argument, e.g. as pointer origin.
    #[must_use]
    pub fn shared_reference(&self) -> Option<SharedReference> {
        self.shared_id.as_ref().map(|shared_id| SharedReference {
            shared_id: shared_id.clone(),
            handle: self.handle.clone(),
        })
    }

    #[must_use]
    pub fn local_name(&self) -> Option<&str> {
        self.value.as_ref()?.local_name.as_deref()
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.value
            .as_ref()?
            .attributes
            .as_ref()?
            .get(name)
            .map(String::as_str)
    }
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-NodeProperties>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperties {
    pub node_type: u64,
    pub child_node_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub attributes: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub children: Option<Vec<NodeRemoteValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub local_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub mode: Option<ShadowRootMode>,
    #[serde(rename = "namespaceURI")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub namespace_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub node_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub shadow_root: Option<Box<NodeRemoteValue>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ShadowRootMode {
    Open,
    Closed,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-WindowProxyRemoteValue>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WindowProxyRemoteValue {
    pub value: WindowProxyProperties,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub handle: Option<Handle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub internal_id: Option<InternalId>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-WindowProxyProperties>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WindowProxyProperties {
    pub context: BrowsingContext,
}

impl RemoteValue {
    /// Decodes a wire value. Unknown `type` discriminants are an error, never passed through.
    pub fn from_json(value: Value) -> crate::Result<Self> {
        Ok(serde_path_to_error::deserialize(value)?)
    }

    /// The wire discriminant, e.g. `"bigint"`.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::String { .. } => "string",
            Self::Number { .. } => "number",
            Self::Boolean { .. } => "boolean",
            Self::BigInt { .. } => "bigint",
            Self::Symbol(_) => "symbol",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Function(_) => "function",
            Self::RegExp(_) => "regexp",
            Self::Date(_) => "date",
            Self::Map(_) => "map",
            Self::Set(_) => "set",
            Self::WeakMap(_) => "weakmap",
            Self::WeakSet(_) => "weakset",
            Self::Generator(_) => "generator",
            Self::Error(_) => "error",
            Self::Proxy(_) => "proxy",
            Self::Promise(_) => "promise",
            Self::TypedArray(_) => "typedarray",
            Self::ArrayBuffer(_) => "arraybuffer",
            Self::NodeList(_) => "nodelist",
            Self::HtmlCollection(_) => "htmlcollection",
            Self::Node(_) => "node",
            Self::WindowProxy(_) => "window",
        }
    }

    /// Present only when the value was serialized with `ResultOwnership::Root`.
    #[must_use]
    pub const fn handle(&self) -> Option<&Handle> {
        match self {
            Self::Undefined
            | Self::Null
            | Self::String { .. }
            | Self::Number { .. }
            | Self::Boolean { .. }
            | Self::BigInt { .. } => None,
            Self::Symbol(v)
            | Self::Function(v)
            | Self::WeakMap(v)
            | Self::WeakSet(v)
            | Self::Generator(v)
            | Self::Error(v)
            | Self::Proxy(v)
            | Self::Promise(v)
            | Self::TypedArray(v)
            | Self::ArrayBuffer(v) => v.handle.as_ref(),
            Self::Array(v) | Self::Set(v) | Self::NodeList(v) | Self::HtmlCollection(v) => {
                v.handle.as_ref()
            }
            Self::Object(v) | Self::Map(v) => v.handle.as_ref(),
            Self::RegExp(v) => v.handle.as_ref(),
            Self::Date(v) => v.handle.as_ref(),
            Self::Node(v) => v.handle.as_ref(),
            Self::WindowProxy(v) => v.handle.as_ref(),
        }
    }

    #[must_use]
    pub const fn as_node(&self) -> Option<&NodeRemoteValue> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String { value } => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number { value } => Some(*value),
            _ => None,
        }
    }

    /// A reference usable as argument: shared id for nodes, handle for everything else.
    #[must_use]
    pub fn to_reference(&self) -> Option<RemoteReference> {
        if let Self::Node(node) = self {
            if let Some(reference) = node.shared_reference() {
                return Some(RemoteReference::Shared(reference));
            }
        }
        self.handle().map(|handle| {
            RemoteReference::Object(RemoteObjectReference {
                handle: handle.clone(),
                shared_id: None,
            })
        })
    }

    /// Turns a received value back into an argument. Serializable values are copied
    /// structurally; everything else needs a handle or shared id.
    pub fn to_local_value(&self) -> crate::Result<LocalValue> {
        let unsupported = || {
            self.to_reference().map(LocalValue::Reference).ok_or_else(|| {
                crate::Error::UnsupportedArgument(format!(
                    "a {} without handle or shared id can not be sent back",
                    self.type_name()
                ))
            })
        };
        Ok(match self {
            Self::Undefined => LocalValue::Undefined,
            Self::Null => LocalValue::Null,
            Self::String { value } => LocalValue::String {
                value: value.clone(),
            },
            Self::Number { value } => LocalValue::Number { value: *value },
            Self::Boolean { value } => LocalValue::Boolean { value: *value },
            Self::BigInt { value } => LocalValue::BigInt {
                value: value.clone(),
            },
            Self::Array(ListRemoteValue {
                value: Some(items), ..
            }) => LocalValue::Array {
                value: items
                    .iter()
                    .map(Self::to_local_value)
                    .collect::<crate::Result<_>>()?,
            },
            Self::Set(ListRemoteValue {
                value: Some(items), ..
            }) => LocalValue::Set {
                value: items
                    .iter()
                    .map(Self::to_local_value)
                    .collect::<crate::Result<_>>()?,
            },
            Self::Object(MappingRemoteValue {
                value: Some(entries),
                ..
            }) => LocalValue::Object {
                value: mapping_to_local(entries)?,
            },
            Self::Map(MappingRemoteValue {
                value: Some(entries),
                ..
            }) => LocalValue::Map {
                value: mapping_to_local(entries)?,
            },
            Self::Date(date) => LocalValue::Date {
                value: date.value.clone(),
            },
            Self::RegExp(regexp) => LocalValue::RegExp {
                value: regexp.value.clone(),
            },
            _ => unsupported()?,
        })
    }
}

fn mapping_to_local(
    entries: &[(RemoteMappingKey, RemoteValue)],
) -> crate::Result<Vec<(MappingKey, LocalValue)>> {
    entries
        .iter()
        .map(|(key, value)| {
            let key = match key {
                RemoteMappingKey::String(key) => MappingKey::String(key.clone()),
                RemoteMappingKey::Value(key) => MappingKey::Value(key.to_local_value()?),
            };
            Ok((key, value.to_local_value()?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn special_numbers_decode_to_their_literals() {
        for (literal, expected) in [
            ("NaN", SpecialNumber::NaN),
            ("-0", SpecialNumber::NegativeZero),
            ("Infinity", SpecialNumber::Infinity),
            ("-Infinity", SpecialNumber::NegativeInfinity),
        ] {
            let value = RemoteValue::from_json(json!({"type": "number", "value": literal})).unwrap();
            assert_eq!(
                value,
                RemoteValue::Number {
                    value: Number::Special(expected)
                }
            );
            assert_eq!(expected.as_str(), literal);
        }

        let value = RemoteValue::from_json(json!({"type": "number", "value": 3})).unwrap();
        assert_eq!(value.as_number(), Some(Number::Finite(3.0)));
    }

    #[test]
    fn unknown_type_fails_loudly() {
        let error = RemoteValue::from_json(json!({"type": "banana", "value": 1})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Codec);

        let error = RemoteValue::from_json(json!({"type": "number", "value": "one"})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Codec);
    }

    #[test]
    fn node_keeps_shared_id_and_attributes() {
        let value = RemoteValue::from_json(json!({
            "type": "node",
            "sharedId": "f.1.d.2.e.3",
            "value": {
                "nodeType": 1,
                "localName": "button",
                "namespaceURI": "http://www.w3.org/1999/xhtml",
                "childNodeCount": 1,
                "attributes": {"type": "submit", "class": "primary"},
                "shadowRoot": null,
            }
        }))
        .unwrap();

        let node = value.as_node().unwrap();
        assert_eq!(node.local_name(), Some("button"));
        assert_eq!(node.attribute("type"), Some("submit"));
        assert_eq!(node.value.as_ref().unwrap().child_node_count, 1);
        assert_eq!(
            value.to_reference(),
            Some(RemoteReference::Shared(SharedReference {
                shared_id: SharedId("f.1.d.2.e.3".to_owned()),
                handle: None,
            }))
        );
    }

    #[test]
    fn window_and_promise_decode() {
        let window = RemoteValue::from_json(json!({
            "type": "window",
            "value": {"context": "ctx-2"},
        }))
        .unwrap();
        assert!(matches!(
            window,
            RemoteValue::WindowProxy(WindowProxyRemoteValue { ref value, .. }) if value.context == BrowsingContext("ctx-2".to_owned())
        ));

        let promise =
            RemoteValue::from_json(json!({"type": "promise", "handle": "h-1"})).unwrap();
        assert_eq!(promise.handle(), Some(&Handle("h-1".to_owned())));
        assert!(matches!(
            promise.to_local_value().unwrap(),
            LocalValue::Reference(RemoteReference::Object(_))
        ));
    }

    #[test]
    fn nested_mapping_with_value_keys() {
        let value = RemoteValue::from_json(json!({
            "type": "map",
            "value": [
                [{"type": "number", "value": 1}, {"type": "string", "value": "one"}],
                ["two", {"type": "array", "value": [{"type": "boolean", "value": true}]}],
            ],
        }))
        .unwrap();
        let RemoteValue::Map(map) = &value else {
            panic!("expected a map, got {value:?}");
        };
        assert_eq!(
            map.get("two"),
            Some(&RemoteValue::Array(ListRemoteValue {
                value: Some(vec![RemoteValue::Boolean { value: true }]),
                ..ListRemoteValue::default()
            }))
        );
        assert_eq!(map.value.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn function_without_handle_can_not_be_sent_back() {
        let function = RemoteValue::from_json(json!({"type": "function"})).unwrap();
        let error = function.to_local_value().unwrap_err();
        assert!(matches!(error, crate::Error::UnsupportedArgument(_)));
    }

    #[test]
    fn number_from_f64_normalizes_specials() {
        assert_eq!(Number::from(-0.0), Number::Special(SpecialNumber::NegativeZero));
        assert_eq!(Number::from(0.0), Number::Finite(0.0));
        assert_eq!(Number::from(f64::NAN), Number::Special(SpecialNumber::NaN));
        assert_eq!(
            Number::from(f64::NEG_INFINITY),
            Number::Special(SpecialNumber::NegativeInfinity)
        );
        assert!(Number::from(f64::NAN).as_f64().is_nan());
    }
}
