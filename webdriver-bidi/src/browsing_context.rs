//! <https://w3c.github.io/webdriver-bidi/#module-browsingContext>

pub mod activate;
pub mod capture_screenshot;
pub mod close;
pub mod create;
pub mod event;
pub mod get_tree;
pub mod handle_user_prompt;
pub mod locate_nodes;
pub mod navigate;
pub mod print;
pub mod reload;
pub mod set_viewport;
pub mod state;
pub mod traverse_history;

use core::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use tracing::debug;

use self::state::{ContextLifecycle, LifecycleTracker};
use crate::browser::UserContext;
use crate::event::{EventData, ExtractBrowsingContext};
use crate::script::{NodeRemoteValue, ResultOwnership, SerializationOptions, SharedReference};
use crate::subscription::{Listener, ListenerId, ModuleSubscriptions};
use crate::webdriver::WebDriver;

/// <https://w3c.github.io/webdriver-bidi/#type-browsingContext-Browsingcontext>
///
/// The same string the classic protocol uses as window handle.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BrowsingContext(pub String);

impl Display for BrowsingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// <https://w3c.github.io/webdriver-bidi/#type-browsingContext-Navigation>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct Navigation(pub String);

/// <https://w3c.github.io/webdriver-bidi/#type-browsingContext-Info>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub context: BrowsingContext,
    pub url: String,
    /// `None` if the tree was cut off by `maxDepth`.
    #[serde(default)]
    pub children: Option<Vec<Info>>,
    #[serde(default)]
    pub parent: Option<BrowsingContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub original_opener: Option<BrowsingContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub user_context: Option<UserContext>,
}

impl ExtractBrowsingContext for Info {
    fn browsing_context(&self) -> Option<&BrowsingContext> {
        Some(&self.context)
    }
}

/// <https://w3c.github.io/webdriver-bidi/#type-browsingContext-NavigationInfo>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationInfo {
    pub context: BrowsingContext,
    #[serde(default)]
    pub navigation: Option<Navigation>,
    pub timestamp: u64,
    pub url: String,
}

impl ExtractBrowsingContext for NavigationInfo {
    fn browsing_context(&self) -> Option<&BrowsingContext> {
        Some(&self.context)
    }
}

/// <https://w3c.github.io/webdriver-bidi/#type-browsingContext-ReadinessState>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ReadinessState {
    #[default]
    None,
    Interactive,
    Complete,
}

/// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-create>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CreateType {
    Tab,
    Window,
}

/// <https://w3c.github.io/webdriver-bidi/#type-browsingContext-Locator>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum Locator {
    Accessibility {
        value: AccessibilityLocatorValue,
    },
    Css {
        value: String,
    },
    InnerText {
        value: String,
        #[serde(rename = "ignoreCase")]
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        ignore_case: Option<bool>,
        #[serde(rename = "matchType")]
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        match_type: Option<InnerTextMatchType>,
        #[serde(rename = "maxDepth")]
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        max_depth: Option<u64>,
    },
    #[serde(rename = "xpath")]
    XPath {
        value: String,
    },
}

impl Locator {
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css {
            value: selector.into(),
        }
    }

    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath {
            value: expression.into(),
        }
    }

    #[must_use]
    pub fn inner_text(text: impl Into<String>) -> Self {
        Self::InnerText {
            value: text.into(),
            ignore_case: None,
            match_type: None,
            max_depth: None,
        }
    }
}

/// <https://w3c.github.io/webdriver-bidi/#type-browsingContext-Locator>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct AccessibilityLocatorValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub role: Option<String>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-browsingContext-Locator>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum InnerTextMatchType {
    Full,
    Partial,
}

#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub reference_context: Option<BrowsingContext>,
    pub background: Option<bool>,
    pub user_context: Option<UserContext>,
}

#[derive(Debug, Clone, Default)]
pub struct LocateNodesOptions {
    /// Must be at least 1.
    pub max_node_count: Option<u64>,
    pub serialization_options: Option<SerializationOptions>,
    /// Must not be empty.
    pub start_nodes: Option<Vec<SharedReference>>,
    pub sandbox: Option<String>,
    pub ownership: Option<ResultOwnership>,
}

/// <https://w3c.github.io/webdriver-bidi/#module-browsingContext>
#[derive(Debug)]
pub struct BrowsingContextModule {
    subscriptions: ModuleSubscriptions,
    tracker: LifecycleTracker,
}

impl BrowsingContextModule {
    #[must_use]
    pub fn new(driver: WebDriver) -> Self {
        Self {
            subscriptions: ModuleSubscriptions::new(driver),
            tracker: LifecycleTracker::default(),
        }
    }

    fn driver(&self) -> &WebDriver {
        self.subscriptions.driver()
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-create>
    pub async fn create(
        &self,
        r#type: CreateType,
        options: CreateOptions,
    ) -> crate::Result<BrowsingContext> {
        let result = self
            .driver()
            .send_command(create::Command {
                params: create::Parameters {
                    r#type,
                    reference_context: options.reference_context,
                    background: options.background,
                    user_context: options.user_context,
                },
            })
            .await?;
        self.tracker.created(&result.context);
        debug!(context = %result.context, "created browsing context");
        Ok(result.context)
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-navigate>
    pub async fn navigate(
        &self,
        context: &BrowsingContext,
        url: impl Into<String>,
        wait: ReadinessState,
    ) -> crate::Result<navigate::Result> {
        self.tracker.check_navigable(context)?;
        self.driver()
            .send_command(navigate::Command {
                params: navigate::Parameters {
                    context: context.clone(),
                    url: url.into(),
                    wait: Some(wait),
                },
            })
            .await
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-reload>
    pub async fn reload(
        &self,
        context: &BrowsingContext,
        ignore_cache: Option<bool>,
        wait: Option<ReadinessState>,
    ) -> crate::Result<navigate::Result> {
        self.tracker.check_navigable(context)?;
        self.driver()
            .send_command(reload::Command {
                params: reload::Parameters {
                    context: context.clone(),
                    ignore_cache,
                    wait,
                },
            })
            .await
    }

    /// Later calls with `context` fail locally with `no such frame`.
    ///
    /// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-close>
    pub async fn close_context(
        &self,
        context: &BrowsingContext,
        prompt_unload: bool,
    ) -> crate::Result<()> {
        self.tracker.check_open(context)?;
        self.driver()
            .send_command(close::Command {
                params: close::Parameters {
                    context: context.clone(),
                    prompt_unload: Some(prompt_unload),
                },
            })
            .await?;
        self.tracker.closed(context);
        Ok(())
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-getTree>
    pub async fn get_tree(
        &self,
        max_depth: Option<u64>,
        root: Option<BrowsingContext>,
    ) -> crate::Result<Vec<Info>> {
        let result = self
            .driver()
            .send_command(get_tree::Command {
                params: get_tree::Parameters { max_depth, root },
            })
            .await?;
        Ok(result.contexts)
    }

    /// With lifecycle tracking enabled this fails locally with `no such alert` when no
    /// prompt is open.
    ///
    /// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-handleUserPrompt>
    pub async fn handle_user_prompt(
        &self,
        context: &BrowsingContext,
        accept: Option<bool>,
        user_text: Option<String>,
    ) -> crate::Result<()> {
        self.tracker.check_prompt_open(context)?;
        self.driver()
            .send_command(handle_user_prompt::Command {
                params: handle_user_prompt::Parameters {
                    context: context.clone(),
                    accept,
                    user_text,
                },
            })
            .await?;
        self.tracker.prompt_closed(context);
        Ok(())
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-activate>
    pub async fn activate(&self, context: &BrowsingContext) -> crate::Result<()> {
        self.tracker.check_open(context)?;
        self.driver()
            .send_command(activate::Command {
                params: activate::Parameters {
                    context: context.clone(),
                },
            })
            .await?;
        Ok(())
    }

    /// Returns the base64 encoded image.
    ///
    /// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-captureScreenshot>
    pub async fn capture_screenshot(
        &self,
        params: capture_screenshot::Parameters,
    ) -> crate::Result<String> {
        self.tracker.check_open(&params.context)?;
        let result = self
            .driver()
            .send_command(capture_screenshot::Command { params })
            .await?;
        Ok(result.data)
    }

    /// Returns the base64 encoded PDF.
    ///
    /// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-print>
    pub async fn print(&self, params: print::Parameters) -> crate::Result<String> {
        self.tracker.check_open(&params.context)?;
        let result = self
            .driver()
            .send_command(print::Command { params })
            .await?;
        Ok(result.data)
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-setViewport>
    pub async fn set_viewport(
        &self,
        context: &BrowsingContext,
        viewport: Option<set_viewport::Viewport>,
        device_pixel_ratio: Option<f64>,
    ) -> crate::Result<()> {
        self.tracker.check_open(context)?;
        self.driver()
            .send_command(set_viewport::Command {
                params: set_viewport::Parameters {
                    context: context.clone(),
                    viewport,
                    device_pixel_ratio,
                },
            })
            .await?;
        Ok(())
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-traverseHistory>
    pub async fn traverse_history(&self, context: &BrowsingContext, delta: i64) -> crate::Result<()> {
        self.tracker.check_navigable(context)?;
        self.driver()
            .send_command(traverse_history::Command {
                params: traverse_history::Parameters {
                    context: context.clone(),
                    delta,
                },
            })
            .await?;
        Ok(())
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-locateNodes>
    pub async fn locate_nodes(
        &self,
        context: &BrowsingContext,
        locator: Locator,
        options: LocateNodesOptions,
    ) -> crate::Result<Vec<NodeRemoteValue>> {
        self.tracker.check_open(context)?;
        let result = self
            .driver()
            .send_command(locate_nodes::Command {
                params: locate_nodes::Parameters {
                    context: context.clone(),
                    locator,
                    max_node_count: options.max_node_count,
                    ownership: options.ownership,
                    sandbox: options.sandbox,
                    serialization_options: options.serialization_options,
                    start_nodes: options.start_nodes,
                },
            })
            .await?;
        Ok(result.nodes)
    }

    /// The first node matching `locator`.
    pub async fn locate_node(
        &self,
        context: &BrowsingContext,
        locator: Locator,
    ) -> crate::Result<NodeRemoteValue> {
        let description = format!("{locator:?}");
        self.locate_nodes(
            context,
            locator,
            LocateNodesOptions {
                max_node_count: Some(1),
                ..LocateNodesOptions::default()
            },
        )
        .await?
        .into_iter()
        .next()
        .ok_or(crate::Error::ElementNotFound(description))
    }

    /// Follows `browsingContext` events to know which contexts are loading, loaded or have a
    /// prompt open. Navigation on a context with an open prompt then fails locally with
    /// `unexpected alert open`.
    pub async fn track_lifecycle(&self) -> crate::Result<ListenerId> {
        let tracker = self.tracker.clone();
        let listener = Listener::new("browsingContext", move |event: &EventData| {
            tracker.apply(event);
        });
        let id = self.subscriptions.listen(listener).await?;
        self.tracker.enable();
        Ok(id)
    }

    #[must_use]
    pub fn lifecycle(&self, context: &BrowsingContext) -> Option<ContextLifecycle> {
        self.tracker.get(context)
    }

    /// Removes every listener registered through this module and stops lifecycle tracking.
    /// Commands keep working, without the local prompt and frame checks.
    pub async fn close(&self) -> crate::Result<()> {
        self.tracker.disable();
        self.subscriptions.close().await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn locators_serialize_with_type() {
        assert_eq!(
            serde_json::to_value(Locator::css("#id")).unwrap(),
            json!({"type": "css", "value": "#id"})
        );
        assert_eq!(
            serde_json::to_value(Locator::xpath("//a")).unwrap(),
            json!({"type": "xpath", "value": "//a"})
        );
        assert_eq!(
            serde_json::to_value(Locator::InnerText {
                value: "Hello".to_owned(),
                ignore_case: Some(true),
                match_type: Some(InnerTextMatchType::Partial),
                max_depth: None,
            })
            .unwrap(),
            json!({"type": "innerText", "value": "Hello", "ignoreCase": true, "matchType": "partial"})
        );
    }

    #[test]
    fn info_tree_with_cut_off_children() {
        let info: Info = serde_json::from_value(json!({
            "context": "top",
            "url": "about:blank",
            "children": [{"context": "frame", "url": "about:blank", "children": null, "parent": "top"}],
            "parent": null,
            "userContext": "default",
        }))
        .unwrap();
        let children = info.children.unwrap();
        assert_eq!(children[0].children, None);
        assert_eq!(children[0].parent, Some(BrowsingContext("top".to_owned())));
        assert_eq!(info.user_context, Some(UserContext("default".to_owned())));
    }
}
