//! Events the remote end sends without a command id.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::browsing_context::{self, BrowsingContext, NavigationInfo};
use crate::protocol::EventMessage;
use crate::{log, network, script};

/// The browsing context an event happened in, used to match context scoped listeners.
pub trait ExtractBrowsingContext {
    fn browsing_context(&self) -> Option<&BrowsingContext>;
}

macro_rules! events {
    ($($(#[doc = $doc:expr])* $variant:ident($method:literal $params:ty)),* $(,)?) => {
        /// An event decoded once from its `method` and `params`.
        #[derive(Debug, Serialize, Deserialize, Clone)]
        #[serde(tag = "method", content = "params")]
        pub enum EventData {
            $(
                $(#[doc = $doc])*
                #[serde(rename = $method)]
                $variant($params),
            )*
        }

        impl EventData {
            #[must_use]
            pub const fn method(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => $method,)*
                }
            }

            #[must_use]
            pub fn context(&self) -> Option<&BrowsingContext> {
                match self {
                    $(Self::$variant(params) => params.browsing_context(),)*
                }
            }
        }

        /// Event method names as they appear on the wire.
        pub mod method {
            paste::paste! {
                $(
                    $(#[doc = $doc])*
                    pub const [<$variant:snake:upper>]: &str = $method;
                )*
            }

            /// Every event this crate decodes.
            pub const ALL: &[&str] = &[$($method),*];
        }
    };
}

events! {
    /// <https://w3c.github.io/webdriver-bidi/#event-browsingContext-contextCreated>
    ContextCreated("browsingContext.contextCreated" browsing_context::Info),
    /// <https://w3c.github.io/webdriver-bidi/#event-browsingContext-contextDestroyed>
    ContextDestroyed("browsingContext.contextDestroyed" browsing_context::Info),
    /// <https://w3c.github.io/webdriver-bidi/#event-browsingContext-navigationStarted>
    NavigationStarted("browsingContext.navigationStarted" NavigationInfo),
    /// <https://w3c.github.io/webdriver-bidi/#event-browsingContext-fragmentNavigated>
    FragmentNavigated("browsingContext.fragmentNavigated" NavigationInfo),
    /// <https://w3c.github.io/webdriver-bidi/#event-browsingContext-domContentLoaded>
    DomContentLoaded("browsingContext.domContentLoaded" NavigationInfo),
    /// <https://w3c.github.io/webdriver-bidi/#event-browsingContext-load>
    Load("browsingContext.load" NavigationInfo),
    /// <https://w3c.github.io/webdriver-bidi/#event-browsingContext-downloadWillBegin>
    DownloadWillBegin("browsingContext.downloadWillBegin" browsing_context::event::DownloadWillBeginParameters),
    /// <https://w3c.github.io/webdriver-bidi/#event-browsingContext-navigationAborted>
    NavigationAborted("browsingContext.navigationAborted" NavigationInfo),
    /// <https://w3c.github.io/webdriver-bidi/#event-browsingContext-navigationFailed>
    NavigationFailed("browsingContext.navigationFailed" NavigationInfo),
    /// <https://w3c.github.io/webdriver-bidi/#event-browsingContext-userPromptOpened>
    UserPromptOpened("browsingContext.userPromptOpened" browsing_context::event::UserPromptOpenedParameters),
    /// <https://w3c.github.io/webdriver-bidi/#event-browsingContext-userPromptClosed>
    UserPromptClosed("browsingContext.userPromptClosed" browsing_context::event::UserPromptClosedParameters),
    /// <https://w3c.github.io/webdriver-bidi/#event-log-entryAdded>
    LogEntryAdded("log.entryAdded" log::Entry),
    /// <https://w3c.github.io/webdriver-bidi/#event-script-message>
    ScriptMessage("script.message" script::event::MessageParameters),
    /// <https://w3c.github.io/webdriver-bidi/#event-script-realmCreated>
    RealmCreated("script.realmCreated" script::RealmInfo),
    /// <https://w3c.github.io/webdriver-bidi/#event-script-realmDestroyed>
    RealmDestroyed("script.realmDestroyed" script::event::RealmDestroyedParameters),
    /// <https://w3c.github.io/webdriver-bidi/#event-network-beforeRequestSent>
    BeforeRequestSent("network.beforeRequestSent" network::event::BeforeRequestSentParameters),
    /// <https://w3c.github.io/webdriver-bidi/#event-network-responseStarted>
    ResponseStarted("network.responseStarted" network::event::ResponseParameters),
    /// <https://w3c.github.io/webdriver-bidi/#event-network-responseCompleted>
    ResponseCompleted("network.responseCompleted" network::event::ResponseParameters),
    /// <https://w3c.github.io/webdriver-bidi/#event-network-authRequired>
    AuthRequired("network.authRequired" network::event::ResponseParameters),
    /// <https://w3c.github.io/webdriver-bidi/#event-network-fetchError>
    FetchError("network.fetchError" network::event::FetchErrorParameters),
}

impl EventData {
    /// Fails with the JSON path of the offending field, or for a method this crate does not know.
    pub fn from_message(message: EventMessage) -> crate::Result<Self> {
        let mut envelope = serde_json::Map::new();
        envelope.insert("method".to_owned(), Value::String(message.method));
        envelope.insert("params".to_owned(), message.params);
        Ok(serde_path_to_error::deserialize(Value::Object(envelope))?)
    }

    /// The module an event belongs to, e.g. `log` for `log.entryAdded`.
    #[must_use]
    pub fn module(&self) -> &'static str {
        let method = self.method();
        method.split_once('.').map_or(method, |(module, _)| module)
    }
}

impl ExtractBrowsingContext for script::RealmInfo {
    fn browsing_context(&self) -> Option<&BrowsingContext> {
        self.context.as_ref()
    }
}

/// Generates typed listener methods on a module with a `subscriptions: ModuleSubscriptions`
/// field: `on_<name>`, `on_<name>_in` for a set of contexts, and `<name>_channel`.
macro_rules! listeners {
    ($module:ty { $($name:ident => $variant:ident($params:ty)),* $(,)? }) => {
        paste::paste! {
            impl $module {
                $(
                    #[doc = concat!("Calls `callback` for every `", stringify!($variant), "` event.")]
                    pub async fn [<on_ $name>](
                        &self,
                        callback: impl Fn(&$params) + Send + Sync + 'static,
                    ) -> $crate::Result<$crate::subscription::ListenerId> {
                        self.[<on_ $name _in>](None, callback).await
                    }

                    #[doc = concat!("Calls `callback` for `", stringify!($variant), "` events in `contexts`, or everywhere for `None`.")]
                    pub async fn [<on_ $name _in>](
                        &self,
                        contexts: Option<Vec<$crate::browsing_context::BrowsingContext>>,
                        callback: impl Fn(&$params) + Send + Sync + 'static,
                    ) -> $crate::Result<$crate::subscription::ListenerId> {
                        let listener = $crate::subscription::Listener::new(
                            $crate::event::method::[<$variant:snake:upper>],
                            move |event| {
                                if let $crate::event::EventData::$variant(params) = event {
                                    callback(params);
                                }
                            },
                        )
                        .with_contexts(contexts);
                        self.subscriptions.listen(listener).await
                    }

                    #[doc = concat!("Forwards `", stringify!($variant), "` events into a channel, for consumers that need to await.")]
                    pub async fn [<$name _channel>](
                        &self,
                        contexts: Option<Vec<$crate::browsing_context::BrowsingContext>>,
                    ) -> $crate::Result<(
                        $crate::subscription::ListenerId,
                        ::tokio::sync::mpsc::UnboundedReceiver<$params>,
                    )> {
                        let (sender, receiver) = ::tokio::sync::mpsc::unbounded_channel();
                        let listener = $crate::subscription::Listener::new(
                            $crate::event::method::[<$variant:snake:upper>],
                            move |event| {
                                if let $crate::event::EventData::$variant(params) = event {
                                    if sender.send(params.clone()).is_err() {
                                        ::tracing::trace!("channel listener has no receiver");
                                    }
                                }
                            },
                        )
                        .with_contexts(contexts);
                        Ok((self.subscriptions.listen(listener).await?, receiver))
                    }

                    #[doc = concat!("Removes a listener added with `on_", stringify!($name), "`.")]
                    pub async fn [<remove_ $name _listener>](
                        &self,
                        listener: $crate::subscription::ListenerId,
                    ) -> $crate::Result<()> {
                        self.subscriptions.unlisten(listener).await
                    }
                )*
            }
        }
    };
}

pub(crate) use listeners;
