//! <https://w3c.github.io/webdriver-bidi/#command-network-addIntercept>

use serde::{Deserialize, Serialize};

use super::{Intercept, InterceptPhase, UrlPattern};
use crate::browsing_context::BrowsingContext;

/// <https://w3c.github.io/webdriver-bidi/#command-network-addIntercept>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "network.addIntercept")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: Parameters,
}

impl crate::protocol::Command for Command {
    type Result = Result;
}

/// <https://w3c.github.io/webdriver-bidi/#command-network-addIntercept>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub phases: Vec<InterceptPhase>,
    /// Top-level contexts only.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub contexts: Option<Vec<BrowsingContext>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub url_patterns: Option<Vec<UrlPattern>>,
}

/// <https://w3c.github.io/webdriver-bidi/#command-network-addIntercept>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Result {
    pub intercept: Intercept,
}
