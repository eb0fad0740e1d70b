//! <https://w3c.github.io/webdriver-bidi/#module-log>

use serde::{Deserialize, Serialize};

use crate::browsing_context::BrowsingContext;
use crate::event::{listeners, EventData, ExtractBrowsingContext};
use crate::script::{RemoteValue, Source, StackTrace};
use crate::subscription::{Listener, ListenerId, ModuleSubscriptions};
use crate::webdriver::WebDriver;

/// <https://w3c.github.io/webdriver-bidi/#types-log-logentry>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// <https://w3c.github.io/webdriver-bidi/#types-log-logentry>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(flatten)]
    pub kind: EntryKind,
    pub level: Level,
    pub source: Source,
    pub text: Option<String>,
    pub timestamp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub stack_trace: Option<StackTrace>,
}

impl Entry {
    #[must_use]
    pub const fn is_console(&self) -> bool {
        matches!(self.kind, EntryKind::Console { .. })
    }

    #[must_use]
    pub const fn is_javascript(&self) -> bool {
        matches!(self.kind, EntryKind::Javascript)
    }
}

impl ExtractBrowsingContext for Entry {
    fn browsing_context(&self) -> Option<&BrowsingContext> {
        self.source.context.as_ref()
    }
}

/// The `type` of an entry. Types other than `console` and `javascript` are generic entries.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// `console.log` and friends; `method` is e.g. `log` or `warn`.
    Console {
        method: String,
        args: Vec<RemoteValue>,
    },
    /// Uncaught errors and unhandled rejections.
    Javascript,
    #[serde(other)]
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterBy {
    Level(Level),
}

impl FilterBy {
    #[must_use]
    pub fn matches(self, entry: &Entry) -> bool {
        match self {
            Self::Level(level) => entry.level == level,
        }
    }
}

/// Typed access to `log.entryAdded`.
#[derive(Debug)]
pub struct LogInspector {
    subscriptions: ModuleSubscriptions,
}

impl LogInspector {
    #[must_use]
    pub fn new(driver: WebDriver) -> Self {
        Self {
            subscriptions: ModuleSubscriptions::new(driver),
        }
    }

    /// Entries produced by the `console` API.
    pub async fn on_console_entry(
        &self,
        filter_by: Option<FilterBy>,
        callback: impl Fn(&Entry) + Send + Sync + 'static,
    ) -> crate::Result<ListenerId> {
        self.listen_entries(
            move |entry| entry.is_console() && filter_by.map_or(true, |f| f.matches(entry)),
            callback,
        )
        .await
    }

    pub async fn on_javascript_log(
        &self,
        filter_by: Option<FilterBy>,
        callback: impl Fn(&Entry) + Send + Sync + 'static,
    ) -> crate::Result<ListenerId> {
        self.listen_entries(
            move |entry| entry.is_javascript() && filter_by.map_or(true, |f| f.matches(entry)),
            callback,
        )
        .await
    }

    /// `javascript` entries at level `error`.
    pub async fn on_javascript_exception(
        &self,
        callback: impl Fn(&Entry) + Send + Sync + 'static,
    ) -> crate::Result<ListenerId> {
        self.on_javascript_log(Some(FilterBy::Level(Level::Error)), callback)
            .await
    }

    /// Every entry, whatever its type.
    pub async fn on_log(
        &self,
        filter_by: Option<FilterBy>,
        callback: impl Fn(&Entry) + Send + Sync + 'static,
    ) -> crate::Result<ListenerId> {
        self.listen_entries(move |entry| filter_by.map_or(true, |f| f.matches(entry)), callback)
            .await
    }

    pub async fn remove_listener(&self, listener: ListenerId) -> crate::Result<()> {
        self.subscriptions.unlisten(listener).await
    }

    pub async fn close(&self) -> crate::Result<()> {
        self.subscriptions.close().await
    }

    async fn listen_entries(
        &self,
        filter: impl Fn(&Entry) -> bool + Send + Sync + 'static,
        callback: impl Fn(&Entry) + Send + Sync + 'static,
    ) -> crate::Result<ListenerId> {
        let listener = Listener::new(crate::event::method::LOG_ENTRY_ADDED, move |event| {
            if let EventData::LogEntryAdded(entry) = event {
                callback(entry);
            }
        })
        .with_filter(move |event| matches!(event, EventData::LogEntryAdded(entry) if filter(entry)));
        self.subscriptions.listen(listener).await
    }
}

listeners! {
    LogInspector {
        entry_added => LogEntryAdded(Entry),
    }
}
