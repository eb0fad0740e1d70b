//! <https://w3c.github.io/webdriver-bidi/#command-browser-getUserContexts>

use serde::{Deserialize, Serialize};

use super::UserContextInfo;
use crate::protocol::EmptyParams;

/// <https://w3c.github.io/webdriver-bidi/#command-browser-getUserContexts>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "browser.getUserContexts")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: EmptyParams,
}

impl crate::protocol::Command for Command {
    type Result = Result;
}

/// <https://w3c.github.io/webdriver-bidi/#command-browser-getUserContexts>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Result {
    pub user_contexts: Vec<UserContextInfo>,
}
