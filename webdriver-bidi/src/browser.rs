//! <https://w3c.github.io/webdriver-bidi/#module-browser>

pub mod close;
pub mod create_user_context;
pub mod get_user_contexts;
pub mod remove_user_context;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ErrorCode;
use crate::protocol::EmptyParams;
use crate::webdriver::WebDriver;

/// An isolated set of cookies and storage, like a private window.
///
/// <https://w3c.github.io/webdriver-bidi/#type-browser-UserContext>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct UserContext(pub String);

impl UserContext {
    /// Always exists and can not be removed.
    #[must_use]
    pub fn default_context() -> Self {
        Self("default".to_owned())
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == "default"
    }
}

/// <https://w3c.github.io/webdriver-bidi/#type-browser-UserContextInfo>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserContextInfo {
    pub user_context: UserContext,
}

/// <https://w3c.github.io/webdriver-bidi/#module-browser>
#[derive(Debug, Clone)]
pub struct BrowserModule {
    driver: WebDriver,
}

impl BrowserModule {
    #[must_use]
    pub const fn new(driver: WebDriver) -> Self {
        Self { driver }
    }

    /// Ends the session and closes every window. The connection closes afterwards.
    ///
    /// <https://w3c.github.io/webdriver-bidi/#command-browser-close>
    pub async fn close_browser(&self) -> crate::Result<()> {
        self.driver
            .send_command(close::Command {
                params: EmptyParams {},
            })
            .await?;
        info!("browser closed");
        Ok(())
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-browser-createUserContext>
    pub async fn create_user_context(&self) -> crate::Result<UserContext> {
        let result = self
            .driver
            .send_command(create_user_context::Command {
                params: EmptyParams {},
            })
            .await?;
        Ok(result.0.user_context)
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-browser-getUserContexts>
    pub async fn get_user_contexts(&self) -> crate::Result<Vec<UserContext>> {
        let result = self
            .driver
            .send_command(get_user_contexts::Command {
                params: EmptyParams {},
            })
            .await?;
        Ok(result
            .user_contexts
            .into_iter()
            .map(|info| info.user_context)
            .collect())
    }

    /// Closes every context of `user_context`. The default user context is rejected locally.
    ///
    /// <https://w3c.github.io/webdriver-bidi/#command-browser-removeUserContext>
    pub async fn remove_user_context(&self, user_context: &UserContext) -> crate::Result<()> {
        if user_context.is_default() {
            return Err(crate::Error::protocol(
                ErrorCode::InvalidArgument,
                "the default user context can not be removed",
            ));
        }
        self.driver
            .send_command(remove_user_context::Command {
                params: remove_user_context::Parameters {
                    user_context: user_context.clone(),
                },
            })
            .await?;
        Ok(())
    }
}
