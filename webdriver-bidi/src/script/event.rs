use serde::{Deserialize, Serialize};

use super::{Channel, Realm, RealmInfo, RemoteValue, ScriptModule, Source};
use crate::browsing_context::BrowsingContext;
use crate::event::{listeners, ExtractBrowsingContext};

/// A value a page script sent through a channel argument.
///
/// <https://w3c.github.io/webdriver-bidi/#event-script-message>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageParameters {
    pub channel: Channel,
    pub data: RemoteValue,
    pub source: Source,
}

impl ExtractBrowsingContext for MessageParameters {
    fn browsing_context(&self) -> Option<&BrowsingContext> {
        self.source.context.as_ref()
    }
}

/// <https://w3c.github.io/webdriver-bidi/#event-script-realmDestroyed>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RealmDestroyedParameters {
    pub realm: Realm,
}

/// The realm is gone, so there is no context left to match against.
impl ExtractBrowsingContext for RealmDestroyedParameters {
    fn browsing_context(&self) -> Option<&BrowsingContext> {
        None
    }
}

listeners! {
    ScriptModule {
        message => ScriptMessage(MessageParameters),
        realm_created => RealmCreated(RealmInfo),
        realm_destroyed => RealmDestroyed(RealmDestroyedParameters),
    }
}
