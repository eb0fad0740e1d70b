//! <https://w3c.github.io/webdriver-bidi/#module-session>

use serde::{Deserialize, Serialize};

use crate::browsing_context::BrowsingContext;

pub mod end;
pub mod new;
pub mod status;
pub mod subscribe;
pub mod unsubscribe;

/// <https://w3c.github.io/webdriver-bidi/#type-session-SubscriptionRequest>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct SubscriptionRequest {
    /// Event methods or whole modules.
    pub events: Vec<String>,
    /// Global when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub contexts: Option<Vec<BrowsingContext>>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-session-UserPromptHandlerType>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum UserPromptHandlerType {
    Accept,
    Dismiss,
    Ignore,
}

/// <https://w3c.github.io/webdriver-bidi/#type-session-CapabilityRequest>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct CapabilityRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub accept_insecure_certs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub browser_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub browser_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub platform_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub unhandled_prompt_behavior: Option<UserPromptHandlerType>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-session-CapabilitiesRequest>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct CapabilitiesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub always_match: Option<CapabilityRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub first_match: Option<Vec<CapabilityRequest>>,
}
