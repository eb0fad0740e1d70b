use serde::{Deserialize, Serialize};

use super::{BrowsingContext, BrowsingContextModule, Info, NavigationInfo};
use crate::event::{listeners, ExtractBrowsingContext};
use crate::session::UserPromptHandlerType;

/// <https://w3c.github.io/webdriver-bidi/#event-browsingContext-downloadWillBegin>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadWillBeginParameters {
    #[serde(flatten)]
    pub navigation: NavigationInfo,
    pub suggested_filename: String,
}

impl ExtractBrowsingContext for DownloadWillBeginParameters {
    fn browsing_context(&self) -> Option<&BrowsingContext> {
        Some(&self.navigation.context)
    }
}

/// <https://w3c.github.io/webdriver-bidi/#event-browsingContext-userPromptClosed>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPromptClosedParameters {
    pub context: BrowsingContext,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub r#type: Option<UserPromptType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub user_text: Option<String>,
}

impl ExtractBrowsingContext for UserPromptClosedParameters {
    fn browsing_context(&self) -> Option<&BrowsingContext> {
        Some(&self.context)
    }
}

/// <https://w3c.github.io/webdriver-bidi/#event-browsingContext-userPromptOpened>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPromptOpenedParameters {
    pub context: BrowsingContext,
    pub r#type: UserPromptType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub handler: Option<UserPromptHandlerType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub default_value: Option<String>,
}

impl ExtractBrowsingContext for UserPromptOpenedParameters {
    fn browsing_context(&self) -> Option<&BrowsingContext> {
        Some(&self.context)
    }
}

/// <https://w3c.github.io/webdriver-bidi/#type-browsingContext-UserPromptType>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserPromptType {
    Alert,
    Beforeunload,
    Confirm,
    Prompt,
}

listeners! {
    BrowsingContextModule {
        context_created => ContextCreated(Info),
        context_destroyed => ContextDestroyed(Info),
        navigation_started => NavigationStarted(NavigationInfo),
        fragment_navigated => FragmentNavigated(NavigationInfo),
        dom_content_loaded => DomContentLoaded(NavigationInfo),
        load => Load(NavigationInfo),
        download_will_begin => DownloadWillBegin(DownloadWillBeginParameters),
        navigation_aborted => NavigationAborted(NavigationInfo),
        navigation_failed => NavigationFailed(NavigationInfo),
        user_prompt_opened => UserPromptOpened(UserPromptOpenedParameters),
        user_prompt_closed => UserPromptClosed(UserPromptClosedParameters),
    }
}
