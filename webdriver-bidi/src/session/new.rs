//! <https://w3c.github.io/webdriver-bidi/#command-session-new>

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::CapabilitiesRequest;

/// <https://w3c.github.io/webdriver-bidi/#command-session-new>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "session.new")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: Parameters,
}

impl crate::protocol::Command for Command {
    type Result = Result;
}

/// <https://w3c.github.io/webdriver-bidi/#command-session-new>
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub capabilities: CapabilitiesRequest,
}

/// <https://w3c.github.io/webdriver-bidi/#command-session-new>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Result {
    pub session_id: String,
    pub capabilities: ResultCapabilities,
}

/// <https://w3c.github.io/webdriver-bidi/#command-session-new>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResultCapabilities {
    pub accept_insecure_certs: bool,
    pub browser_name: String,
    pub browser_version: String,
    pub platform_name: String,
    pub set_window_rect: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Vendor capabilities like `moz:profile`.
    #[serde(flatten)]
    pub extensible: serde_json::Map<String, Value>,
}
