//! Conversions between BiDi ids and the references of classic WebDriver, so a session can
//! use both protocols on the same page.
//!
//! <https://w3c.github.io/webdriver-bidi/#shared-id>

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::browsing_context::BrowsingContext;
use crate::script::{SharedId, SharedReference};

/// The key classic WebDriver uses to mark a JSON object as an element reference.
pub const WEB_ELEMENT_IDENTIFIER: &str = "element-6066-11e4-a52e-4f735466cecf";

/// `{"element-6066-11e4-a52e-4f735466cecf": id}`. The id is the node's [`SharedId`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(deny_unknown_fields)]
pub struct WebElementReference {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    pub id: String,
}

impl From<SharedId> for WebElementReference {
    fn from(value: SharedId) -> Self {
        Self { id: value.0 }
    }
}

impl From<WebElementReference> for SharedId {
    fn from(value: WebElementReference) -> Self {
        Self(value.id)
    }
}

impl From<WebElementReference> for SharedReference {
    fn from(value: WebElementReference) -> Self {
        Self {
            shared_id: value.into(),
            handle: None,
        }
    }
}

impl TryFrom<Value> for WebElementReference {
    type Error = crate::Error;

    /// Accepts exactly the classic element object.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(serde_path_to_error::deserialize(value)?)
    }
}

impl WebElementReference {
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut object = serde_json::Map::new();
        object.insert(
            WEB_ELEMENT_IDENTIFIER.to_owned(),
            Value::String(self.id.clone()),
        );
        Value::Object(object)
    }
}

/// A classic window handle. It is the same string as the top-level [`BrowsingContext`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub String);

impl From<BrowsingContext> for WindowHandle {
    fn from(value: BrowsingContext) -> Self {
        Self(value.0)
    }
}

impl From<WindowHandle> for BrowsingContext {
    fn from(value: WindowHandle) -> Self {
        Self(value.0)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn element_reference_is_lossless() {
        let shared_id = SharedId("f.1.d.2.e.3".to_owned());
        let classic = WebElementReference::from(shared_id.clone());
        let json = classic.to_json();
        assert_eq!(json, json!({"element-6066-11e4-a52e-4f735466cecf": "f.1.d.2.e.3"}));
        assert_eq!(serde_json::to_value(&classic).unwrap(), json);

        let back = WebElementReference::try_from(json).unwrap();
        assert_eq!(SharedId::from(back.clone()), shared_id);
        assert_eq!(SharedReference::from(back).shared_id, shared_id);
    }

    #[test]
    fn rejects_other_objects() {
        let error = WebElementReference::try_from(json!({"sharedId": "x"})).unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::Codec);
    }

    #[test]
    fn window_handles_are_context_ids() {
        let context = BrowsingContext("6b2c".to_owned());
        let handle = WindowHandle::from(context.clone());
        assert_eq!(handle.0, "6b2c");
        assert_eq!(BrowsingContext::from(handle), context);
    }
}
