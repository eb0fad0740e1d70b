//! <https://w3c.github.io/webdriver-bidi/#module-input>

pub mod perform_actions;
pub mod release_actions;

use serde::{Deserialize, Serialize};

use self::perform_actions::{
    KeyAction, KeySourceAction, Origin, PauseAction, PointerCommonProperties, PointerDownAction,
    PointerMoveAction, PointerParameters, PointerSourceAction, PointerType, PointerUpAction,
    SourceActions, WheelScrollAction, WheelSourceAction,
};
use crate::browsing_context::BrowsingContext;
use crate::script::SharedReference;
use crate::webdriver::WebDriver;

/// <https://w3c.github.io/webdriver-bidi/#module-input>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
#[serde(rename = "element")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct ElementOrigin {
    pub element: SharedReference,
}

/// Builds a `key` input source.
#[derive(Debug, Clone)]
pub struct KeyActions {
    id: String,
    actions: Vec<KeySourceAction>,
}

impl KeyActions {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn pause(mut self, duration: Option<u64>) -> Self {
        self.actions
            .push(KeySourceAction::Pause(PauseAction { duration }));
        self
    }

    #[must_use]
    pub fn key_down(mut self, value: impl Into<String>) -> Self {
        self.actions.push(KeySourceAction::KeyDown(KeyAction {
            value: value.into(),
        }));
        self
    }

    #[must_use]
    pub fn key_up(mut self, value: impl Into<String>) -> Self {
        self.actions.push(KeySourceAction::KeyUp(KeyAction {
            value: value.into(),
        }));
        self
    }

    /// A down and up for every character of `text`.
    #[must_use]
    pub fn send_keys(mut self, text: &str) -> Self {
        for character in text.chars() {
            let value = character.to_string();
            self = self.key_down(value.clone()).key_up(value);
        }
        self
    }

    #[must_use]
    pub fn build(self) -> SourceActions {
        SourceActions::Key {
            id: self.id,
            actions: self.actions,
        }
    }
}

/// Builds a `pointer` input source. Button 0 is the primary button.
#[derive(Debug, Clone)]
pub struct PointerActions {
    id: String,
    pointer_type: PointerType,
    actions: Vec<PointerSourceAction>,
}

impl PointerActions {
    #[must_use]
    pub fn new(id: impl Into<String>, pointer_type: PointerType) -> Self {
        Self {
            id: id.into(),
            pointer_type,
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn pause(mut self, duration: Option<u64>) -> Self {
        self.actions
            .push(PointerSourceAction::Pause(PauseAction { duration }));
        self
    }

    #[must_use]
    pub fn move_to(mut self, x: f64, y: f64, origin: Option<Origin>) -> Self {
        self.actions
            .push(PointerSourceAction::PointerMove(PointerMoveAction {
                x,
                y,
                duration: None,
                origin,
                common: PointerCommonProperties::default(),
            }));
        self
    }

    /// Moves to the center of `element`.
    #[must_use]
    pub fn move_to_element(self, element: SharedReference) -> Self {
        self.move_to(0.0, 0.0, Some(Origin::Element(ElementOrigin { element })))
    }

    #[must_use]
    pub fn down(mut self, button: u64) -> Self {
        self.actions
            .push(PointerSourceAction::PointerDown(PointerDownAction {
                button,
                common: PointerCommonProperties::default(),
            }));
        self
    }

    #[must_use]
    pub fn up(mut self, button: u64) -> Self {
        self.actions
            .push(PointerSourceAction::PointerUp(PointerUpAction { button }));
        self
    }

    #[must_use]
    pub fn click(self, button: u64) -> Self {
        self.down(button).up(button)
    }

    #[must_use]
    pub fn build(self) -> SourceActions {
        SourceActions::Pointer {
            id: self.id,
            parameters: Some(PointerParameters {
                pointer_type: Some(self.pointer_type),
            }),
            actions: self.actions,
        }
    }
}

/// Builds a `wheel` input source.
#[derive(Debug, Clone)]
pub struct WheelActions {
    id: String,
    actions: Vec<WheelSourceAction>,
}

impl WheelActions {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn pause(mut self, duration: Option<u64>) -> Self {
        self.actions
            .push(WheelSourceAction::Pause(PauseAction { duration }));
        self
    }

    #[must_use]
    pub fn scroll(mut self, x: i64, y: i64, delta_x: i64, delta_y: i64, origin: Option<Origin>) -> Self {
        self.actions.push(WheelSourceAction::Scroll(WheelScrollAction {
            x,
            y,
            delta_x,
            delta_y,
            duration: None,
            origin,
        }));
        self
    }

    #[must_use]
    pub fn build(self) -> SourceActions {
        SourceActions::Wheel {
            id: self.id,
            actions: self.actions,
        }
    }
}

impl From<KeyActions> for SourceActions {
    fn from(value: KeyActions) -> Self {
        value.build()
    }
}

impl From<PointerActions> for SourceActions {
    fn from(value: PointerActions) -> Self {
        value.build()
    }
}

impl From<WheelActions> for SourceActions {
    fn from(value: WheelActions) -> Self {
        value.build()
    }
}

/// <https://w3c.github.io/webdriver-bidi/#module-input>
#[derive(Debug, Clone)]
pub struct InputModule {
    driver: WebDriver,
}

impl InputModule {
    #[must_use]
    pub const fn new(driver: WebDriver) -> Self {
        Self { driver }
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-input-performActions>
    pub async fn perform(
        &self,
        context: &BrowsingContext,
        actions: Vec<SourceActions>,
    ) -> crate::Result<()> {
        self.driver
            .send_command(perform_actions::Command {
                params: perform_actions::Parameters {
                    context: context.clone(),
                    actions,
                },
            })
            .await?;
        Ok(())
    }

    /// Releases pressed keys and buttons and resets the input state.
    ///
    /// <https://w3c.github.io/webdriver-bidi/#command-input-releaseActions>
    pub async fn release(&self, context: &BrowsingContext) -> crate::Result<()> {
        self.driver
            .send_command(release_actions::Command {
                params: release_actions::Parameters {
                    context: context.clone(),
                },
            })
            .await?;
        Ok(())
    }
}
