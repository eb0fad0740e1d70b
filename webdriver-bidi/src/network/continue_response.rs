//! <https://w3c.github.io/webdriver-bidi/#command-network-continueResponse>

use serde::{Deserialize, Serialize};

use super::{AuthCredentials, Header, Request, SetCookieHeader};
use crate::protocol::EmptyResult;

/// <https://w3c.github.io/webdriver-bidi/#command-network-continueResponse>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "network.continueResponse")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: Parameters,
}

impl crate::protocol::Command for Command {
    type Result = EmptyResult;
}

/// Valid in the `responseStarted` and `authRequired` phases.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub request: Request,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub cookies: Option<Vec<SetCookieHeader>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub credentials: Option<AuthCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub headers: Option<Vec<Header>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub reason_phrase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub status_code: Option<u16>,
}

impl Parameters {
    #[must_use]
    pub const fn new(request: Request) -> Self {
        Self {
            request,
            cookies: None,
            credentials: None,
            headers: None,
            reason_phrase: None,
            status_code: None,
        }
    }
}
