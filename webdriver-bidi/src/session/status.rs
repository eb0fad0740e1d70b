//! <https://w3c.github.io/webdriver-bidi/#command-session-status>

use serde::{Deserialize, Serialize};

use crate::protocol::EmptyParams;

/// <https://w3c.github.io/webdriver-bidi/#command-session-status>
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(tag = "method")]
#[serde(rename = "session.status")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: EmptyParams,
}

impl crate::protocol::Command for Command {
    type Result = Result;
}

/// <https://w3c.github.io/webdriver-bidi/#command-session-status>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Result {
    pub ready: bool,
    pub message: String,
}
