//! <https://w3c.github.io/webdriver-bidi/#command-browsingContext-reload>

use serde::{Deserialize, Serialize};

use super::{navigate, BrowsingContext, ReadinessState};

/// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-reload>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "browsingContext.reload")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: Parameters,
}

impl crate::protocol::Command for Command {
    type Result = navigate::Result;
}

/// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-reload>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub context: BrowsingContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub ignore_cache: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub wait: Option<ReadinessState>,
}
