//! <https://w3c.github.io/webdriver-bidi/#module-network>

pub mod add_intercept;
pub mod continue_request;
pub mod continue_response;
pub mod continue_with_auth;
pub mod event;
pub mod fail_request;
pub mod provide_response;
pub mod remove_intercept;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::browsing_context::{BrowsingContext, Navigation};
use crate::error::ErrorCode;
use crate::script::StackTrace;
use crate::subscription::ModuleSubscriptions;
use crate::webdriver::WebDriver;

/// <https://w3c.github.io/webdriver-bidi/#type-network-Request>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct Request(pub String);

/// <https://w3c.github.io/webdriver-bidi/#type-network-Intercept>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct Intercept(pub String);

/// <https://w3c.github.io/webdriver-bidi/#command-network-addIntercept>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum InterceptPhase {
    BeforeRequestSent,
    ResponseStarted,
    AuthRequired,
}

/// <https://w3c.github.io/webdriver-bidi/#type-network-UrlPattern>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum UrlPattern {
    String {
        pattern: String,
    },
    /// Missing components match anything.
    Pattern {
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        protocol: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        hostname: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        port: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        pathname: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        search: Option<String>,
    },
}

impl UrlPattern {
    #[must_use]
    pub fn string(pattern: impl Into<String>) -> Self {
        Self::String {
            pattern: pattern.into(),
        }
    }
}

/// <https://w3c.github.io/webdriver-bidi/#type-network-BytesValue>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "value")]
#[serde(rename_all = "camelCase")]
pub enum BytesValue {
    String(String),
    Base64(String),
}

impl From<&str> for BytesValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

/// <https://w3c.github.io/webdriver-bidi/#type-network-Header>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub name: String,
    pub value: BytesValue,
}

impl Header {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: BytesValue::String(value.into()),
        }
    }
}

/// <https://w3c.github.io/webdriver-bidi/#type-network-SameSite>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// <https://w3c.github.io/webdriver-bidi/#type-network-Cookie>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: BytesValue,
    pub domain: String,
    pub path: String,
    pub size: u64,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub expiry: Option<u64>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-network-CookieHeader>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct CookieHeader {
    pub name: String,
    pub value: BytesValue,
}

/// <https://w3c.github.io/webdriver-bidi/#type-network-SetCookieHeader>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct SetCookieHeader {
    pub name: String,
    pub value: BytesValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub http_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub expiry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub max_age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub same_site: Option<SameSite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub secure: Option<bool>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-network-AuthCredentials>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum AuthCredentials {
    Password { username: String, password: String },
}

impl AuthCredentials {
    #[must_use]
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// <https://w3c.github.io/webdriver-bidi/#type-network-AuthChallenge>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthChallenge {
    pub scheme: String,
    pub realm: String,
}

/// <https://w3c.github.io/webdriver-bidi/#type-network-FetchTimingInfo>
///
/// Milliseconds relative to `time_origin`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FetchTimingInfo {
    pub time_origin: f64,
    pub request_time: f64,
    pub redirect_start: f64,
    pub redirect_end: f64,
    pub fetch_start: f64,
    pub dns_start: f64,
    pub dns_end: f64,
    pub connect_start: f64,
    pub connect_end: f64,
    pub tls_start: f64,
    pub request_start: f64,
    pub response_start: f64,
    pub response_end: f64,
}

/// <https://w3c.github.io/webdriver-bidi/#type-network-RequestData>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestData {
    pub request: Request,
    pub url: String,
    pub method: String,
    pub headers: Vec<Header>,
    pub cookies: Vec<Cookie>,
    pub headers_size: u64,
    pub body_size: Option<u64>,
    #[serde(default)]
    pub timings: FetchTimingInfo,
}

/// <https://w3c.github.io/webdriver-bidi/#type-network-Initiator>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Initiator {
    #[serde(default)]
    pub r#type: Option<InitiatorType>,
    #[serde(default)]
    pub column_number: Option<u64>,
    #[serde(default)]
    pub line_number: Option<u64>,
    #[serde(default)]
    pub stack_trace: Option<StackTrace>,
    #[serde(default)]
    pub request: Option<Request>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum InitiatorType {
    Parser,
    Script,
    Preflight,
    Other,
}

/// <https://w3c.github.io/webdriver-bidi/#type-network-ResponseContent>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseContent {
    pub size: u64,
}

/// <https://w3c.github.io/webdriver-bidi/#type-network-ResponseData>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData {
    pub url: String,
    pub protocol: String,
    pub status: u16,
    pub status_text: String,
    pub from_cache: bool,
    pub headers: Vec<Header>,
    pub mime_type: String,
    pub bytes_received: u64,
    pub headers_size: Option<u64>,
    pub body_size: Option<u64>,
    pub content: ResponseContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub auth_challenges: Option<Vec<AuthChallenge>>,
}

/// Fields shared by every network event.
///
/// <https://w3c.github.io/webdriver-bidi/#type-network-BaseParameters>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BaseParameters {
    pub context: Option<BrowsingContext>,
    /// Set when one of `intercepts` paused the request.
    pub is_blocked: bool,
    pub navigation: Option<Navigation>,
    pub redirect_count: u64,
    pub request: RequestData,
    pub timestamp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub intercepts: Option<Vec<Intercept>>,
}

/// Request interception and network events.
///
/// A request matched by an intercept stays blocked until one of `continue_request`,
/// `fail_request`, `provide_response`, `continue_response` or the auth continuations is
/// called for it. Nothing here continues it automatically; a listener that returns without
/// doing so leaves the page waiting.
#[derive(Debug)]
pub struct NetworkModule {
    subscriptions: ModuleSubscriptions,
}

impl NetworkModule {
    #[must_use]
    pub fn new(driver: WebDriver) -> Self {
        Self {
            subscriptions: ModuleSubscriptions::new(driver),
        }
    }

    fn driver(&self) -> &WebDriver {
        self.subscriptions.driver()
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-network-addIntercept>
    pub async fn add_intercept(
        &self,
        phases: Vec<InterceptPhase>,
        url_patterns: Option<Vec<UrlPattern>>,
        contexts: Option<Vec<BrowsingContext>>,
    ) -> crate::Result<Intercept> {
        if phases.is_empty() {
            return Err(crate::Error::protocol(
                ErrorCode::InvalidArgument,
                "an intercept needs at least one phase",
            ));
        }
        let result = self
            .driver()
            .send_command(add_intercept::Command {
                params: add_intercept::Parameters {
                    phases,
                    contexts,
                    url_patterns,
                },
            })
            .await?;
        debug!(intercept = %result.intercept.0, "added intercept");
        Ok(result.intercept)
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-network-removeIntercept>
    pub async fn remove_intercept(&self, intercept: &Intercept) -> crate::Result<()> {
        self.driver()
            .send_command(remove_intercept::Command {
                params: remove_intercept::Parameters {
                    intercept: intercept.clone(),
                },
            })
            .await?;
        Ok(())
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-network-continueRequest>
    pub async fn continue_request(&self, params: continue_request::Parameters) -> crate::Result<()> {
        self.driver()
            .send_command(continue_request::Command { params })
            .await?;
        Ok(())
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-network-failRequest>
    pub async fn fail_request(&self, request: &Request) -> crate::Result<()> {
        self.driver()
            .send_command(fail_request::Command {
                params: fail_request::Parameters {
                    request: request.clone(),
                },
            })
            .await?;
        Ok(())
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-network-provideResponse>
    pub async fn provide_response(&self, params: provide_response::Parameters) -> crate::Result<()> {
        self.driver()
            .send_command(provide_response::Command { params })
            .await?;
        Ok(())
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-network-continueResponse>
    pub async fn continue_response(
        &self,
        params: continue_response::Parameters,
    ) -> crate::Result<()> {
        self.driver()
            .send_command(continue_response::Command { params })
            .await?;
        Ok(())
    }

    /// Answers an auth challenge with `credentials`.
    ///
    /// <https://w3c.github.io/webdriver-bidi/#command-network-continueWithAuth>
    pub async fn continue_with_auth(
        &self,
        request: &Request,
        credentials: AuthCredentials,
    ) -> crate::Result<()> {
        self.send_auth(
            request,
            continue_with_auth::Action::ProvideCredentials { credentials },
        )
        .await
    }

    /// Lets the browser handle the challenge as if nothing intercepted it.
    pub async fn continue_with_auth_no_credentials(&self, request: &Request) -> crate::Result<()> {
        self.send_auth(request, continue_with_auth::Action::Default)
            .await
    }

    pub async fn cancel_auth(&self, request: &Request) -> crate::Result<()> {
        self.send_auth(request, continue_with_auth::Action::Cancel)
            .await
    }

    async fn send_auth(
        &self,
        request: &Request,
        action: continue_with_auth::Action,
    ) -> crate::Result<()> {
        self.driver()
            .send_command(continue_with_auth::Command {
                params: continue_with_auth::Parameters {
                    request: request.clone(),
                    action,
                },
            })
            .await?;
        Ok(())
    }

    /// Removes every listener registered through this module. Intercepts stay in place.
    pub async fn close(&self) -> crate::Result<()> {
        self.subscriptions.close().await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bytes_values_and_patterns() {
        assert_eq!(
            serde_json::to_value(Header::new("x-test", "1")).unwrap(),
            json!({"name": "x-test", "value": {"type": "string", "value": "1"}})
        );
        assert_eq!(
            serde_json::to_value(UrlPattern::string("https://example.com/*")).unwrap(),
            json!({"type": "string", "pattern": "https://example.com/*"})
        );
        assert_eq!(
            serde_json::to_value(UrlPattern::Pattern {
                protocol: None,
                hostname: Some("example.com".to_owned()),
                port: None,
                pathname: None,
                search: None,
            })
            .unwrap(),
            json!({"type": "pattern", "hostname": "example.com"})
        );
        assert_eq!(
            serde_json::to_value(AuthCredentials::password("user", "secret")).unwrap(),
            json!({"type": "password", "username": "user", "password": "secret"})
        );
    }

    #[test]
    fn cookies_decode_with_base64_values() {
        let cookie: Cookie = serde_json::from_value(json!({
            "name": "session",
            "value": {"type": "base64", "value": "AAE="},
            "domain": "example.com",
            "path": "/",
            "size": 11,
            "httpOnly": true,
            "secure": true,
            "sameSite": "lax",
        }))
        .unwrap();
        assert_eq!(cookie.value, BytesValue::Base64("AAE=".to_owned()));
        assert_eq!(cookie.same_site, SameSite::Lax);
        assert_eq!(cookie.expiry, None);
    }
}
