//! <https://w3c.github.io/webdriver-bidi/#command-network-failRequest>

use serde::{Deserialize, Serialize};

use super::Request;
use crate::protocol::EmptyResult;

/// <https://w3c.github.io/webdriver-bidi/#command-network-failRequest>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "network.failRequest")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: Parameters,
}

impl crate::protocol::Command for Command {
    type Result = EmptyResult;
}

/// <https://w3c.github.io/webdriver-bidi/#command-network-failRequest>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub request: Request,
}
