//! <https://w3c.github.io/webdriver-bidi/#command-browsingContext-captureScreenshot>

use serde::{Deserialize, Serialize};

use super::BrowsingContext;
use crate::script::SharedReference;

/// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-captureScreenshot>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "browsingContext.captureScreenshot")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: Parameters,
}

impl crate::protocol::Command for Command {
    type Result = Result;
}

/// <https://w3c.github.io/webdriver-bidi/#command-browsingContext-captureScreenshot>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub context: BrowsingContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub origin: Option<Origin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub format: Option<ImageFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub clip: Option<ClipRectangle>,
}

impl Parameters {
    #[must_use]
    pub const fn new(context: BrowsingContext) -> Self {
        Self {
            context,
            origin: None,
            format: None,
            clip: None,
        }
    }
}

/// Defaults to `viewport` on the remote end.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Origin {
    Viewport,
    Document,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct ImageFormat {
    /// A mime type such as `image/png`.
    pub r#type: String,
    /// Between 0.0 and 1.0, only used for lossy formats.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub quality: Option<f64>,
}

/// <https://w3c.github.io/webdriver-bidi/#type-browsingContext-ClipRectangle>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum ClipRectangle {
    Element {
        element: SharedReference,
    },
    Box {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Result {
    /// Base64 encoded image.
    pub data: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn clip_rectangles_carry_a_single_type_tag() {
        let mut params = Parameters::new(BrowsingContext("ctx".to_owned()));
        params.clip = Some(ClipRectangle::Box {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 5.0,
        });
        assert_eq!(
            serde_json::to_value(Command { params }).unwrap(),
            json!({
                "method": "browsingContext.captureScreenshot",
                "params": {
                    "context": "ctx",
                    "clip": {"type": "box", "x": 0.0, "y": 0.0, "width": 10.0, "height": 5.0}
                }
            })
        );
    }
}
