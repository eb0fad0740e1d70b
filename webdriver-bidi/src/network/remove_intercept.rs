//! <https://w3c.github.io/webdriver-bidi/#command-network-removeIntercept>

use serde::{Deserialize, Serialize};

use super::Intercept;
use crate::protocol::EmptyResult;

/// <https://w3c.github.io/webdriver-bidi/#command-network-removeIntercept>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "network.removeIntercept")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: Parameters,
}

impl crate::protocol::Command for Command {
    type Result = EmptyResult;
}

/// <https://w3c.github.io/webdriver-bidi/#command-network-removeIntercept>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub intercept: Intercept,
}
