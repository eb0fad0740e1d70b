//! <https://w3c.github.io/webdriver-bidi/#type-script-LocalValue>

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::remote_value::{Handle, Number, RegExpValue, SharedId, SpecialNumber};
use super::{ResultOwnership, SerializationOptions};

/// Largest integer a JavaScript number represents exactly.
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// <https://w3c.github.io/webdriver-bidi/#type-script-SharedReference>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct SharedReference {
    pub shared_id: SharedId,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub handle: Option<Handle>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-RemoteObjectReference>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct RemoteObjectReference {
    pub handle: Handle,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub shared_id: Option<SharedId>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-RemoteReference>
///
/// A lookup key understood by the realm that produced it. Holding one does not keep the
/// object alive; see `script.disown`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RemoteReference {
    Shared(SharedReference),
    Object(RemoteObjectReference),
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-Channel>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct Channel(pub String);

/// <https://w3c.github.io/webdriver-bidi/#type-script-ChannelValue>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct ChannelProperties {
    pub channel: Channel,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub serialization_options: Option<SerializationOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub ownership: Option<ResultOwnership>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-ChannelValue>
///
/// Preload scripts only accept channels as arguments.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
#[serde(rename = "channel")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct ChannelValue {
    pub value: ChannelProperties,
}

/// Keys of [`LocalValue::Object`] are bare strings; [`LocalValue::Map`] keys may be any value.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum MappingKey {
    String(String),
    Value(LocalValue),
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-LocalValue>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
pub enum LocalValue {
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
    Array {
        value: Vec<LocalValue>,
    },
    Date {
        value: String,
    },
    Map {
        value: Vec<(MappingKey, LocalValue)>,
    },
    Object {
        value: Vec<(MappingKey, LocalValue)>,
    },
    #[serde(rename = "regexp")]
    RegExp {
        value: RegExpValue,
    },
    Set {
        value: Vec<LocalValue>,
    },
    Channel {
        value: ChannelProperties,
    },
    #[serde(untagged)]
    Reference(RemoteReference),
}

impl LocalValue {
    #[must_use]
    pub const fn undefined() -> Self {
        Self::Undefined
    }

    #[must_use]
    pub const fn null() -> Self {
        Self::Null
    }

    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String {
            value: value.into(),
        }
    }

    /// NaN, the infinities and negative zero become their special number strings.
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Number {
            value: Number::from(value),
        }
    }

    #[must_use]
    pub const fn special_number(value: SpecialNumber) -> Self {
        Self::Number {
            value: Number::Special(value),
        }
    }

    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Boolean { value }
    }

    /// `value` is the decimal representation without the `n` suffix.
    #[must_use]
    pub fn bigint(value: impl Into<String>) -> Self {
        Self::BigInt {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn array(values: impl IntoIterator<Item = Self>) -> Self {
        Self::Array {
            value: values.into_iter().collect(),
        }
    }

    /// Kept in insertion order; duplicates are the remote end's business.
    #[must_use]
    pub fn set(values: impl IntoIterator<Item = Self>) -> Self {
        Self::Set {
            value: values.into_iter().collect(),
        }
    }

    /// Object keys stay bare strings on the wire.
    #[must_use]
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Object {
            value: entries
                .into_iter()
                .map(|(key, value)| (MappingKey::String(key.into()), value))
                .collect(),
        }
    }

    /// Map keys are always wrapped as string values.
    #[must_use]
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Map {
            value: entries
                .into_iter()
                .map(|(key, value)| (MappingKey::Value(Self::string(key)), value))
                .collect(),
        }
    }

    #[must_use]
    pub fn map_with_value_keys(entries: impl IntoIterator<Item = (Self, Self)>) -> Self {
        Self::Map {
            value: entries
                .into_iter()
                .map(|(key, value)| (MappingKey::Value(key), value))
                .collect(),
        }
    }

    /// `value` must be an ISO-8601 date time string.
    #[must_use]
    pub fn date(value: impl Into<String>) -> Self {
        Self::Date {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn regexp(pattern: impl Into<String>, flags: Option<String>) -> Self {
        Self::RegExp {
            value: RegExpValue {
                pattern: pattern.into(),
                flags,
            },
        }
    }

    #[must_use]
    pub const fn channel(value: ChannelProperties) -> Self {
        Self::Channel { value }
    }

    #[must_use]
    pub const fn reference(reference: RemoteReference) -> Self {
        Self::Reference(reference)
    }

    /// Integers must be exactly representable as JavaScript numbers; use [`Self::bigint`] otherwise.
    pub fn integer(value: i64) -> crate::Result<Self> {
        if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&value) {
            #[allow(clippy::cast_precision_loss)]
            Ok(Self::number(value as f64))
        } else {
            Err(crate::Error::UnsupportedArgument(format!(
                "{value} is outside the safe integer range, send it as bigint"
            )))
        }
    }

    /// Decodes the wire form, the inverse of serializing a [`LocalValue`]. Plain JSON goes
    /// through [`Self::try_from`] instead.
    pub fn from_wire(value: Value) -> crate::Result<Self> {
        Ok(serde_path_to_error::deserialize(value)?)
    }

    /// Encodes anything serde can turn into JSON. JSON objects become [`Self::Object`].
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> crate::Result<Self> {
        let value = serde_json::to_value(value)
            .map_err(|error| crate::Error::UnsupportedArgument(error.to_string()))?;
        Self::try_from(value)
    }
}

impl TryFrom<Value> for LocalValue {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        Ok(match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Boolean { value },
            Value::Number(number) => {
                if let Some(integer) = number.as_i64() {
                    Self::integer(integer)?
                } else if number.is_u64() {
                    return Err(crate::Error::UnsupportedArgument(format!(
                        "{number} is outside the safe integer range, send it as bigint"
                    )));
                } else {
                    let float = number.as_f64().ok_or_else(|| {
                        crate::Error::UnsupportedArgument(format!("{number} is not a number"))
                    })?;
                    Self::number(float)
                }
            }
            Value::String(value) => Self::String { value },
            Value::Array(values) => Self::Array {
                value: values
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<crate::Result<_>>()?,
            },
            Value::Object(entries) => Self::Object {
                value: entries
                    .into_iter()
                    .map(|(key, value)| Ok((MappingKey::String(key), Self::try_from(value)?)))
                    .collect::<crate::Result<_>>()?,
            },
        })
    }
}

impl From<&str> for LocalValue {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for LocalValue {
    fn from(value: String) -> Self {
        Self::String { value }
    }
}

impl From<bool> for LocalValue {
    fn from(value: bool) -> Self {
        Self::boolean(value)
    }
}

impl From<f64> for LocalValue {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<i32> for LocalValue {
    fn from(value: i32) -> Self {
        Self::number(f64::from(value))
    }
}

impl From<RemoteReference> for LocalValue {
    fn from(value: RemoteReference) -> Self {
        Self::Reference(value)
    }
}

impl From<SharedReference> for LocalValue {
    fn from(value: SharedReference) -> Self {
        Self::Reference(RemoteReference::Shared(value))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;
    use crate::script::remote_value::RemoteValue;

    fn wire(value: &LocalValue) -> Value {
        serde_json::to_value(value).unwrap()
    }

    #[test]
    fn primitives_have_exact_wire_shapes() {
        assert_eq!(wire(&LocalValue::undefined()), json!({"type": "undefined"}));
        assert_eq!(wire(&LocalValue::null()), json!({"type": "null"}));
        assert_eq!(
            wire(&LocalValue::string("foobar")),
            json!({"type": "string", "value": "foobar"})
        );
        assert_eq!(
            wire(&LocalValue::number(1.5)),
            json!({"type": "number", "value": 1.5})
        );
        assert_eq!(
            wire(&LocalValue::number(-0.0)),
            json!({"type": "number", "value": "-0"})
        );
        assert_eq!(
            wire(&LocalValue::special_number(SpecialNumber::Infinity)),
            json!({"type": "number", "value": "Infinity"})
        );
        assert_eq!(
            wire(&LocalValue::boolean(true)),
            json!({"type": "boolean", "value": true})
        );
        assert_eq!(
            wire(&LocalValue::bigint("42")),
            json!({"type": "bigint", "value": "42"})
        );
        assert_eq!(
            wire(&LocalValue::date("2022-05-31T13:47:29.000Z")),
            json!({"type": "date", "value": "2022-05-31T13:47:29.000Z"})
        );
        assert_eq!(
            wire(&LocalValue::regexp("ab+c", Some("i".to_owned()))),
            json!({"type": "regexp", "value": {"pattern": "ab+c", "flags": "i"}})
        );
    }

    #[test]
    fn map_wraps_keys_but_object_does_not() {
        let entries = || vec![("foobar", LocalValue::string("value"))];

        assert_eq!(
            wire(&LocalValue::map(entries())),
            json!({"type": "map", "value": [
                [{"type": "string", "value": "foobar"}, {"type": "string", "value": "value"}]
            ]})
        );
        assert_eq!(
            wire(&LocalValue::object(entries())),
            json!({"type": "object", "value": [
                ["foobar", {"type": "string", "value": "value"}]
            ]})
        );
    }

    #[test]
    fn composites_recurse_and_keep_order() {
        let value = LocalValue::array([
            LocalValue::set([LocalValue::number(2.0), LocalValue::number(1.0)]),
            LocalValue::map_with_value_keys([(LocalValue::number(1.0), LocalValue::null())]),
        ]);
        assert_eq!(
            wire(&value),
            json!({"type": "array", "value": [
                {"type": "set", "value": [
                    {"type": "number", "value": 2.0},
                    {"type": "number", "value": 1.0},
                ]},
                {"type": "map", "value": [
                    [{"type": "number", "value": 1.0}, {"type": "null"}],
                ]},
            ]})
        );
    }

    #[test]
    fn channel_and_references() {
        let channel = LocalValue::channel(ChannelProperties {
            channel: Channel("channel_name".to_owned()),
            serialization_options: None,
            ownership: Some(ResultOwnership::Root),
        });
        assert_eq!(
            wire(&channel),
            json!({"type": "channel", "value": {"channel": "channel_name", "ownership": "root"}})
        );

        let reference = LocalValue::from(SharedReference {
            shared_id: SharedId("abc".to_owned()),
            handle: None,
        });
        assert_eq!(wire(&reference), json!({"sharedId": "abc"}));
        let parsed: LocalValue = serde_json::from_value(json!({"sharedId": "abc"})).unwrap();
        assert_eq!(parsed, reference);
    }

    #[test]
    fn native_values_encode_without_coercion() {
        let mut native = BTreeMap::new();
        native.insert("a", json!([1, "two", null, true]));
        let value = LocalValue::from_serialize(&native).unwrap();
        assert_eq!(
            value,
            LocalValue::object([(
                "a",
                LocalValue::array([
                    LocalValue::number(1.0),
                    LocalValue::string("two"),
                    LocalValue::null(),
                    LocalValue::boolean(true),
                ])
            )])
        );

        assert!(matches!(
            LocalValue::try_from(json!(u64::MAX)),
            Err(crate::Error::UnsupportedArgument(_))
        ));
        assert!(matches!(
            LocalValue::integer(MAX_SAFE_INTEGER + 1),
            Err(crate::Error::UnsupportedArgument(_))
        ));

        let mut not_string_keys = BTreeMap::new();
        not_string_keys.insert(vec![1_u8], 1);
        assert!(matches!(
            LocalValue::from_serialize(&not_string_keys),
            Err(crate::Error::UnsupportedArgument(_))
        ));
    }

    /// The wire shapes of local and remote values coincide for everything serializable.
    fn samples() -> Vec<LocalValue> {
        vec![
            LocalValue::undefined(),
            LocalValue::null(),
            LocalValue::string("foo"),
            LocalValue::string(""),
            LocalValue::number(3.0),
            LocalValue::number(-0.0),
            LocalValue::number(f64::INFINITY),
            LocalValue::number(f64::NEG_INFINITY),
            LocalValue::number(f64::NAN),
            LocalValue::boolean(false),
            LocalValue::bigint("12345678901234567890"),
            LocalValue::array([]),
            LocalValue::array([LocalValue::string("a"), LocalValue::number(1.0)]),
            LocalValue::set([]),
            LocalValue::set([LocalValue::boolean(true), LocalValue::boolean(true)]),
            LocalValue::object(Vec::<(String, LocalValue)>::new()),
            LocalValue::object([("key", LocalValue::number(2.0))]),
            LocalValue::map(Vec::<(String, LocalValue)>::new()),
            LocalValue::map([("key", LocalValue::array([LocalValue::null()]))]),
            LocalValue::date("2024-01-01T00:00:00.000Z"),
            LocalValue::regexp("^a$", None),
            LocalValue::regexp("^a$", Some("gi".to_owned())),
        ]
    }

    #[test]
    fn decode_of_encode_is_identity() {
        let channel = LocalValue::channel(ChannelProperties {
            channel: Channel("c".to_owned()),
            serialization_options: None,
            ownership: Some(ResultOwnership::Root),
        });
        let bare_channel = LocalValue::channel(ChannelProperties {
            channel: Channel("c".to_owned()),
            serialization_options: None,
            ownership: None,
        });
        for value in samples().into_iter().chain([channel, bare_channel]) {
            assert_eq!(LocalValue::from_wire(wire(&value)).unwrap(), value, "{value:?}");
        }
    }

    /// What the remote end echoes back decodes to the value that was sent.
    #[test]
    fn remote_echo_is_identity() {
        for value in samples() {
            let decoded = RemoteValue::from_json(wire(&value)).unwrap();
            assert_eq!(decoded.to_local_value().unwrap(), value, "{value:?}");
        }
    }
}
