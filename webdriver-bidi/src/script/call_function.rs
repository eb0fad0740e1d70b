//! <https://w3c.github.io/webdriver-bidi/#command-script-callFunction>

use serde::{Deserialize, Serialize};

use super::{EvaluateResult, LocalValue, ResultOwnership, SerializationOptions, Target};

/// <https://w3c.github.io/webdriver-bidi/#command-script-callFunction>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "script.callFunction")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: Parameters,
}

impl crate::protocol::Command for Command {
    type Result = Result;
}

/// <https://w3c.github.io/webdriver-bidi/#command-script-callFunction>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub function_declaration: String,
    pub await_promise: bool,
    pub target: Target,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub arguments: Option<Vec<LocalValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub result_ownership: Option<ResultOwnership>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub serialization_options: Option<SerializationOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub this: Option<LocalValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub user_activation: Option<bool>,
}

/// <https://w3c.github.io/webdriver-bidi/#command-script-callFunction>
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Result(pub EvaluateResult);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::browsing_context::BrowsingContext;

    #[test]
    fn arguments_keep_their_wire_shape() {
        let command = Command {
            params: Parameters {
                function_declaration: "(a, b) => a + b".to_owned(),
                await_promise: false,
                target: Target::context(BrowsingContext("ctx".to_owned()), None),
                arguments: Some(vec![LocalValue::number(1.0), LocalValue::string("2")]),
                result_ownership: None,
                serialization_options: None,
                this: None,
                user_activation: None,
            },
        };
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({
                "method": "script.callFunction",
                "params": {
                    "functionDeclaration": "(a, b) => a + b",
                    "awaitPromise": false,
                    "target": {"context": "ctx"},
                    "arguments": [
                        {"type": "number", "value": 1.0},
                        {"type": "string", "value": "2"},
                    ],
                },
            })
        );
    }
}
