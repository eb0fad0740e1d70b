//! <https://w3c.github.io/webdriver-bidi/#command-input-performActions>

use serde::{Deserialize, Serialize};

use super::ElementOrigin;
use crate::browsing_context::BrowsingContext;
use crate::protocol::EmptyResult;

/// <https://w3c.github.io/webdriver-bidi/#command-input-performActions>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "input.performActions")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: Parameters,
}

impl crate::protocol::Command for Command {
    type Result = EmptyResult;
}

/// <https://w3c.github.io/webdriver-bidi/#command-input-performActions>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub context: BrowsingContext,
    pub actions: Vec<SourceActions>,
}

/// One input source and its ticks. Sources run in parallel, tick by tick.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum SourceActions {
    None {
        id: String,
        actions: Vec<NoneSourceAction>,
    },
    Key {
        id: String,
        actions: Vec<KeySourceAction>,
    },
    Pointer {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        parameters: Option<PointerParameters>,
        actions: Vec<PointerSourceAction>,
    },
    Wheel {
        id: String,
        actions: Vec<WheelSourceAction>,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum NoneSourceAction {
    Pause(PauseAction),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum KeySourceAction {
    Pause(PauseAction),
    KeyDown(KeyAction),
    KeyUp(KeyAction),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PointerType {
    #[default]
    Mouse,
    Pen,
    Touch,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct PointerParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub pointer_type: Option<PointerType>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum PointerSourceAction {
    Pause(PauseAction),
    PointerDown(PointerDownAction),
    PointerUp(PointerUpAction),
    PointerMove(PointerMoveAction),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum WheelSourceAction {
    Pause(PauseAction),
    Scroll(WheelScrollAction),
}

/// Milliseconds; `None` waits for the longest action of the tick.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PauseAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub duration: Option<u64>,
}

/// `value` is a single grapheme or a WebDriver key code such as `"\u{E007}"`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyAction {
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PointerUpAction {
    pub button: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PointerDownAction {
    pub button: u64,
    #[serde(flatten)]
    pub common: PointerCommonProperties,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PointerMoveAction {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub origin: Option<Origin>,
    #[serde(flatten)]
    pub common: PointerCommonProperties,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WheelScrollAction {
    pub x: i64,
    pub y: i64,
    pub delta_x: i64,
    pub delta_y: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub origin: Option<Origin>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PointerCommonProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub width: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub height: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub tangential_pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub twist: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub altitude_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub azimuth_angle: Option<f64>,
}

/// Coordinates are relative to the viewport unless stated otherwise.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Origin {
    Viewport,
    Pointer,
    /// Relative to the center of the element's first client rect.
    #[serde(untagged)]
    Element(ElementOrigin),
}
