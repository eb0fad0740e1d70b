use serde::{Deserialize, Serialize};

use super::{BaseParameters, Initiator, NetworkModule, ResponseData};
use crate::browsing_context::BrowsingContext;
use crate::event::{listeners, ExtractBrowsingContext};

/// <https://w3c.github.io/webdriver-bidi/#event-network-beforeRequestSent>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BeforeRequestSentParameters {
    #[serde(flatten)]
    pub base: BaseParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub initiator: Option<Initiator>,
}

/// Shared by `responseStarted`, `responseCompleted` and `authRequired`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseParameters {
    #[serde(flatten)]
    pub base: BaseParameters,
    pub response: ResponseData,
}

/// <https://w3c.github.io/webdriver-bidi/#event-network-fetchError>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FetchErrorParameters {
    #[serde(flatten)]
    pub base: BaseParameters,
    pub error_text: String,
}

impl ExtractBrowsingContext for BaseParameters {
    fn browsing_context(&self) -> Option<&BrowsingContext> {
        self.context.as_ref()
    }
}

impl ExtractBrowsingContext for BeforeRequestSentParameters {
    fn browsing_context(&self) -> Option<&BrowsingContext> {
        self.base.browsing_context()
    }
}

impl ExtractBrowsingContext for ResponseParameters {
    fn browsing_context(&self) -> Option<&BrowsingContext> {
        self.base.browsing_context()
    }
}

impl ExtractBrowsingContext for FetchErrorParameters {
    fn browsing_context(&self) -> Option<&BrowsingContext> {
        self.base.browsing_context()
    }
}

listeners! {
    NetworkModule {
        before_request_sent => BeforeRequestSent(BeforeRequestSentParameters),
        response_started => ResponseStarted(ResponseParameters),
        response_completed => ResponseCompleted(ResponseParameters),
        auth_required => AuthRequired(ResponseParameters),
        fetch_error => FetchError(FetchErrorParameters),
    }
}
