//! <https://w3c.github.io/webdriver-bidi/#command-network-continueRequest>

use serde::{Deserialize, Serialize};

use super::{BytesValue, CookieHeader, Header, Request};
use crate::protocol::EmptyResult;

/// <https://w3c.github.io/webdriver-bidi/#command-network-continueRequest>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "network.continueRequest")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: Parameters,
}

impl crate::protocol::Command for Command {
    type Result = EmptyResult;
}

/// Only valid in the `beforeRequestSent` phase. Fields left `None` keep the original value.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub request: Request,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub body: Option<BytesValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub cookies: Option<Vec<CookieHeader>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub headers: Option<Vec<Header>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub url: Option<String>,
}

impl Parameters {
    /// Continue unchanged.
    #[must_use]
    pub const fn new(request: Request) -> Self {
        Self {
            request,
            body: None,
            cookies: None,
            headers: None,
            method: None,
            url: None,
        }
    }
}
