//! <https://w3c.github.io/webdriver-bidi/#module-storage>

pub mod delete_cookies;
pub mod get_cookies;
pub mod set_cookie;

use serde::{Deserialize, Serialize};

use crate::browser::UserContext;
use crate::browsing_context::BrowsingContext;
use crate::network::{BytesValue, Cookie, SameSite};
use crate::webdriver::WebDriver;

/// <https://w3c.github.io/webdriver-bidi/#type-storage-PartitionDescriptor>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum PartitionDescriptor {
    /// The partition a context's document would use.
    Context { context: BrowsingContext },
    StorageKey {
        #[serde(rename = "userContext")]
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        user_context: Option<UserContext>,
        #[serde(rename = "sourceOrigin")]
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        source_origin: Option<String>,
    },
}

/// <https://w3c.github.io/webdriver-bidi/#type-storage-PartitionKey>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartitionKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub user_context: Option<UserContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub source_origin: Option<String>,
}

/// Every set field must match.
///
/// <https://w3c.github.io/webdriver-bidi/#type-storage-CookieFilter>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct CookieFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub value: Option<BytesValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub http_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub secure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub same_site: Option<SameSite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub expiry: Option<u64>,
}

impl CookieFilter {
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// <https://w3c.github.io/webdriver-bidi/#type-storage-PartialCookie>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct PartialCookie {
    pub name: String,
    pub value: BytesValue,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub http_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub secure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub same_site: Option<SameSite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub expiry: Option<u64>,
}

impl PartialCookie {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: BytesValue::String(value.into()),
            domain: domain.into(),
            path: None,
            http_only: None,
            secure: None,
            same_site: None,
            expiry: None,
        }
    }
}

/// Cookie access from the point of view of one browsing context. Calls without an explicit
/// partition use that context's partition.
#[derive(Debug, Clone)]
pub struct StorageModule {
    driver: WebDriver,
    context: BrowsingContext,
}

impl StorageModule {
    #[must_use]
    pub const fn new(driver: WebDriver, context: BrowsingContext) -> Self {
        Self { driver, context }
    }

    #[must_use]
    pub const fn context(&self) -> &BrowsingContext {
        &self.context
    }

    fn partition(&self, partition: Option<PartitionDescriptor>) -> PartitionDescriptor {
        partition.unwrap_or_else(|| PartitionDescriptor::Context {
            context: self.context.clone(),
        })
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-storage-getCookies>
    pub async fn get_cookies(
        &self,
        filter: Option<CookieFilter>,
        partition: Option<PartitionDescriptor>,
    ) -> crate::Result<get_cookies::Result> {
        self.driver
            .send_command(get_cookies::Command {
                params: get_cookies::Parameters {
                    filter,
                    partition: Some(self.partition(partition)),
                },
            })
            .await
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-storage-setCookie>
    pub async fn set_cookie(
        &self,
        cookie: PartialCookie,
        partition: Option<PartitionDescriptor>,
    ) -> crate::Result<PartitionKey> {
        let result = self
            .driver
            .send_command(set_cookie::Command {
                params: set_cookie::Parameters {
                    cookie,
                    partition: Some(self.partition(partition)),
                },
            })
            .await?;
        Ok(result.partition_key)
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-storage-deleteCookies>
    pub async fn delete_cookies(
        &self,
        filter: Option<CookieFilter>,
        partition: Option<PartitionDescriptor>,
    ) -> crate::Result<PartitionKey> {
        let result = self
            .driver
            .send_command(delete_cookies::Command {
                params: delete_cookies::Parameters {
                    filter,
                    partition: Some(self.partition(partition)),
                },
            })
            .await?;
        Ok(result.partition_key)
    }
}

/// Cookies as returned by `get_cookies`.
pub type Cookies = Vec<Cookie>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn partition_descriptors() {
        assert_eq!(
            serde_json::to_value(PartitionDescriptor::Context {
                context: BrowsingContext("ctx".to_owned())
            })
            .unwrap(),
            json!({"type": "context", "context": "ctx"})
        );
        assert_eq!(
            serde_json::to_value(PartitionDescriptor::StorageKey {
                user_context: Some(UserContext("default".to_owned())),
                source_origin: None,
            })
            .unwrap(),
            json!({"type": "storageKey", "userContext": "default"})
        );
    }

    #[test]
    fn filter_only_sends_set_fields() {
        assert_eq!(
            serde_json::to_value(CookieFilter::by_name("session")).unwrap(),
            json!({"name": "session"})
        );
    }
}
