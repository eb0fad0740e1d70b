//! <https://w3c.github.io/webdriver-bidi/#command-storage-setCookie>

use serde::{Deserialize, Serialize};

use super::{PartialCookie, PartitionDescriptor, PartitionKey};

/// <https://w3c.github.io/webdriver-bidi/#command-storage-setCookie>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "storage.setCookie")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: Parameters,
}

impl crate::protocol::Command for Command {
    type Result = Result;
}

/// <https://w3c.github.io/webdriver-bidi/#command-storage-setCookie>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub cookie: PartialCookie,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub partition: Option<PartitionDescriptor>,
}

/// <https://w3c.github.io/webdriver-bidi/#command-storage-setCookie>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Result {
    pub partition_key: PartitionKey,
}
