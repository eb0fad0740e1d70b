//! <https://w3c.github.io/webdriver-bidi/#command-storage-deleteCookies>

use serde::{Deserialize, Serialize};

use super::{CookieFilter, PartitionDescriptor, PartitionKey};

/// <https://w3c.github.io/webdriver-bidi/#command-storage-deleteCookies>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "storage.deleteCookies")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: Parameters,
}

impl crate::protocol::Command for Command {
    type Result = Result;
}

/// Without a filter every cookie of the partition is deleted.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub filter: Option<CookieFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub partition: Option<PartitionDescriptor>,
}

/// <https://w3c.github.io/webdriver-bidi/#command-storage-deleteCookies>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Result {
    pub partition_key: PartitionKey,
}
