//! <https://w3c.github.io/webdriver-bidi/#module-script>

pub mod add_preload_script;
pub mod call_function;
pub mod disown;
pub mod evaluate;
pub mod event;
pub mod get_realms;
pub mod local_value;
pub mod remote_value;
pub mod remove_preload_script;

use std::collections::HashSet;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use self::local_value::{
    Channel, ChannelProperties, ChannelValue, LocalValue, MappingKey, RemoteObjectReference,
    RemoteReference, SharedReference,
};
pub use self::remote_value::{
    Handle, InternalId, NodeProperties, NodeRemoteValue, Number, RegExpValue, RemoteValue,
    SharedId, SpecialNumber,
};
use crate::browsing_context::BrowsingContext;
use crate::error::ErrorCode;
use crate::subscription::ModuleSubscriptions;
use crate::webdriver::WebDriver;

/// <https://w3c.github.io/webdriver-bidi/#type-script-Realm>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct Realm(pub String);

/// <https://w3c.github.io/webdriver-bidi/#type-script-RealmType>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RealmType {
    Window,
    DedicatedWorker,
    SharedWorker,
    ServiceWorker,
    Worker,
    PaintWorklet,
    AudioWorklet,
    Worklet,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-RealmInfo>
///
/// `context` and `sandbox` are only present for window realms.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RealmInfo {
    pub realm: Realm,
    pub origin: String,
    pub r#type: RealmType,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub context: Option<BrowsingContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub sandbox: Option<String>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-PreloadScript>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct PreloadScript(pub String);

/// <https://w3c.github.io/webdriver-bidi/#type-script-ResultOwnership>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResultOwnership {
    /// The remote end keeps the object alive and returns a handle until `script.disown`.
    Root,
    None,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-SerializationOptions>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct SerializationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub max_dom_depth: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub max_object_depth: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub include_shadow_tree: Option<IncludeShadowTree>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-SerializationOptions>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IncludeShadowTree {
    None,
    Open,
    All,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-RealmTarget>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct RealmTarget {
    pub realm: Realm,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-ContextTarget>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct ContextTarget {
    pub context: BrowsingContext,
    /// Sandboxes are created on first use and share the DOM but not globals with the page.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub sandbox: Option<String>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-Target>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Target {
    Realm(RealmTarget),
    Context(ContextTarget),
}

impl Target {
    #[must_use]
    pub fn context(context: BrowsingContext, sandbox: Option<String>) -> Self {
        Self::Context(ContextTarget { context, sandbox })
    }

    #[must_use]
    pub const fn realm(realm: Realm) -> Self {
        Self::Realm(RealmTarget { realm })
    }
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-StackTrace>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StackTrace {
    pub call_frames: Vec<StackFrame>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-StackFrame>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    pub column_number: u64,
    pub function_name: String,
    pub line_number: u64,
    pub url: String,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-Source>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub realm: Realm,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub context: Option<BrowsingContext>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-ExceptionDetails>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    pub column_number: u64,
    pub exception: RemoteValue,
    pub line_number: u64,
    pub stack_trace: StackTrace,
    pub text: String,
}

/// <https://w3c.github.io/webdriver-bidi/#type-script-EvaluateResult>
///
/// A thrown exception is a successful command, so it is a variant here and not an `Err`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum EvaluateResult {
    Success {
        realm: Realm,
        result: RemoteValue,
    },
    Exception {
        realm: Realm,
        #[serde(rename = "exceptionDetails")]
        exception_details: ExceptionDetails,
    },
}

impl EvaluateResult {
    #[must_use]
    pub const fn realm(&self) -> &Realm {
        match self {
            Self::Success { realm, .. } | Self::Exception { realm, .. } => realm,
        }
    }

    #[must_use]
    pub const fn result(&self) -> Option<&RemoteValue> {
        match self {
            Self::Success { result, .. } => Some(result),
            Self::Exception { .. } => None,
        }
    }

    #[must_use]
    pub const fn exception(&self) -> Option<&ExceptionDetails> {
        match self {
            Self::Success { .. } => None,
            Self::Exception {
                exception_details, ..
            } => Some(exception_details),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CallFunctionOptions {
    pub arguments: Option<Vec<LocalValue>>,
    pub this: Option<LocalValue>,
    pub result_ownership: Option<ResultOwnership>,
    pub serialization_options: Option<SerializationOptions>,
    pub user_activation: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct EvaluateOptions {
    pub result_ownership: Option<ResultOwnership>,
    pub serialization_options: Option<SerializationOptions>,
    pub user_activation: Option<bool>,
}

/// <https://w3c.github.io/webdriver-bidi/#module-script>
#[derive(Debug)]
pub struct ScriptModule {
    subscriptions: ModuleSubscriptions,
    removed_preload_scripts: Mutex<HashSet<PreloadScript>>,
}

impl ScriptModule {
    #[must_use]
    pub fn new(driver: WebDriver) -> Self {
        Self {
            subscriptions: ModuleSubscriptions::new(driver),
            removed_preload_scripts: Mutex::default(),
        }
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-script-callFunction>
    pub async fn call_function_in_browsing_context(
        &self,
        context: &BrowsingContext,
        sandbox: Option<String>,
        function_declaration: impl Into<String>,
        await_promise: bool,
        options: CallFunctionOptions,
    ) -> crate::Result<EvaluateResult> {
        self.call_function(
            Target::context(context.clone(), sandbox),
            function_declaration.into(),
            await_promise,
            options,
        )
        .await
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-script-callFunction>
    pub async fn call_function_in_realm(
        &self,
        realm: &Realm,
        function_declaration: impl Into<String>,
        await_promise: bool,
        options: CallFunctionOptions,
    ) -> crate::Result<EvaluateResult> {
        self.call_function(
            Target::realm(realm.clone()),
            function_declaration.into(),
            await_promise,
            options,
        )
        .await
    }

    async fn call_function(
        &self,
        target: Target,
        function_declaration: String,
        await_promise: bool,
        options: CallFunctionOptions,
    ) -> crate::Result<EvaluateResult> {
        let result = self
            .subscriptions
            .driver()
            .send_command(call_function::Command {
                params: call_function::Parameters {
                    function_declaration,
                    await_promise,
                    target,
                    arguments: options.arguments,
                    result_ownership: options.result_ownership,
                    serialization_options: options.serialization_options,
                    this: options.this,
                    user_activation: options.user_activation,
                },
            })
            .await?;
        Ok(result.0)
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-script-evaluate>
    pub async fn evaluate_in_browsing_context(
        &self,
        context: &BrowsingContext,
        sandbox: Option<String>,
        expression: impl Into<String>,
        await_promise: bool,
        options: EvaluateOptions,
    ) -> crate::Result<EvaluateResult> {
        self.evaluate(
            Target::context(context.clone(), sandbox),
            expression.into(),
            await_promise,
            options,
        )
        .await
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-script-evaluate>
    pub async fn evaluate_in_realm(
        &self,
        realm: &Realm,
        expression: impl Into<String>,
        await_promise: bool,
        options: EvaluateOptions,
    ) -> crate::Result<EvaluateResult> {
        self.evaluate(
            Target::realm(realm.clone()),
            expression.into(),
            await_promise,
            options,
        )
        .await
    }

    async fn evaluate(
        &self,
        target: Target,
        expression: String,
        await_promise: bool,
        options: EvaluateOptions,
    ) -> crate::Result<EvaluateResult> {
        let result = self
            .subscriptions
            .driver()
            .send_command(evaluate::Command {
                params: evaluate::Parameters {
                    expression,
                    target,
                    await_promise,
                    result_ownership: options.result_ownership,
                    serialization_options: options.serialization_options,
                    user_activation: options.user_activation,
                },
            })
            .await?;
        Ok(result.0)
    }

    /// Runs `function_declaration` in every new document before any page script.
    /// Scripts run in the order they were added.
    ///
    /// <https://w3c.github.io/webdriver-bidi/#command-script-addPreloadScript>
    pub async fn add_preload_script(
        &self,
        function_declaration: impl Into<String>,
        arguments: Option<Vec<ChannelValue>>,
        contexts: Option<Vec<BrowsingContext>>,
        sandbox: Option<String>,
    ) -> crate::Result<PreloadScript> {
        let result = self
            .subscriptions
            .driver()
            .send_command(add_preload_script::Command {
                params: add_preload_script::Parameters {
                    function_declaration: function_declaration.into(),
                    arguments,
                    contexts,
                    sandbox,
                },
            })
            .await?;
        debug!(script = %result.script.0, "added preload script");
        Ok(result.script)
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-script-removePreloadScript>
    pub async fn remove_preload_script(&self, script: &PreloadScript) -> crate::Result<()> {
        if self.removed_preload_scripts.lock().contains(script) {
            return Err(crate::Error::protocol(
                ErrorCode::NoSuchScript,
                format!("preload script {} was already removed", script.0),
            ));
        }
        self.subscriptions
            .driver()
            .send_command(remove_preload_script::Command {
                params: remove_preload_script::Parameters {
                    script: script.clone(),
                },
            })
            .await?;
        self.removed_preload_scripts.lock().insert(script.clone());
        Ok(())
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-script-getRealms>
    pub async fn get_realms(
        &self,
        context: Option<BrowsingContext>,
        r#type: Option<RealmType>,
    ) -> crate::Result<Vec<RealmInfo>> {
        let result = self
            .subscriptions
            .driver()
            .send_command(get_realms::Command {
                params: get_realms::Parameters { context, r#type },
            })
            .await?;
        Ok(result.realms)
    }

    /// Releases handles obtained with [`ResultOwnership::Root`].
    ///
    /// <https://w3c.github.io/webdriver-bidi/#command-script-disown>
    pub async fn disown(&self, handles: Vec<Handle>, target: Target) -> crate::Result<()> {
        self.subscriptions
            .driver()
            .send_command(disown::Command {
                params: disown::Parameters { handles, target },
            })
            .await?;
        Ok(())
    }

    /// Removes every listener registered through this module.
    pub async fn close(&self) -> crate::Result<()> {
        self.subscriptions.close().await
    }
}
