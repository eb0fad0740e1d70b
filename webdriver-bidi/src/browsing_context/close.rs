//! <https://w3c.github.io/webdriver-bidi/#command-browsingContext-close>

use serde::{Deserialize, Serialize};

use super::BrowsingContext;
use crate::protocol::EmptyResult;

/// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-close>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "browsingContext.close")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: Parameters,
}

impl crate::protocol::Command for Command {
    type Result = EmptyResult;
}

/// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-close>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub context: BrowsingContext,
    /// Run `beforeunload` handlers, which may open a prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub prompt_unload: Option<bool>,
}
