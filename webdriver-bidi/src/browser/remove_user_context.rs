//! <https://w3c.github.io/webdriver-bidi/#command-browser-removeUserContext>

use serde::{Deserialize, Serialize};

use super::UserContext;
use crate::protocol::EmptyResult;

/// <https://w3c.github.io/webdriver-bidi/#command-browser-removeUserContext>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "browser.removeUserContext")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: Parameters,
}

impl crate::protocol::Command for Command {
    type Result = EmptyResult;
}

/// <https://w3c.github.io/webdriver-bidi/#command-browser-removeUserContext>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub user_context: UserContext,
}
