//! <https://w3c.github.io/webdriver-bidi/#protocol-definition>

use core::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorCode;

/// A command the local end can send. The implementing struct serializes to
/// `{"method": ..., "params": ...}`; the id is added by the dispatcher.
pub trait Command: Serialize + Debug + Send {
    type Result: DeserializeOwned + Send;
}

/// <https://w3c.github.io/webdriver-bidi/#protocol-definition>
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Extensible(pub serde_json::Map<String, Value>);

/// <https://w3c.github.io/webdriver-bidi/#protocol-definition>
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct EmptyParams {}

/// <https://w3c.github.io/webdriver-bidi/#protocol-definition>
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmptyResult {}

/// <https://w3c.github.io/webdriver-bidi/#protocol-definition>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub id: u64,
    pub result: Value,
}

/// <https://w3c.github.io/webdriver-bidi/#protocol-definition>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub id: Option<u64>,
    pub error: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub stacktrace: Option<String>,
}

/// Not decoded further here; the event registry decodes `method` and
/// `params` together into an `EventData`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// Everything the remote end may send. The optional `type` member
/// (`success`, `error`, `event`) is ignored; the shape decides.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum IncomingMessage {
    ErrorResponse(ErrorResponse),
    CommandResponse(CommandResponse),
    Event(EventMessage),
}

/// Serialize a command and attach `id`. Fails before anything touches the wire.
pub(crate) fn command_to_value<C: Command>(command: &C) -> crate::Result<Value> {
    let value = serde_json::to_value(command).map_err(crate::Error::Serialize)?;
    if value.get("method").and_then(Value::as_str).is_none() {
        return Err(crate::Error::UnsupportedArgument(format!(
            "command {command:?} did not serialize to an object with a method"
        )));
    }
    Ok(value)
}
