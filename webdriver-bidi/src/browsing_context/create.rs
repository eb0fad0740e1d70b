//! <https://w3c.github.io/webdriver-bidi/#command-browsingContext-create>

use serde::{Deserialize, Serialize};

use super::{BrowsingContext, CreateType};
use crate::browser::UserContext;

/// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-create>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "browsingContext.create")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: Parameters,
}

impl crate::protocol::Command for Command {
    type Result = Result;
}

/// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-create>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub r#type: CreateType,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub reference_context: Option<BrowsingContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub background: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub user_context: Option<UserContext>,
}

/// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-create>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Result {
    pub context: BrowsingContext,
}
