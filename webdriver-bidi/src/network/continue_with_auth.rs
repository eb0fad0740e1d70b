//! <https://w3c.github.io/webdriver-bidi/#command-network-continueWithAuth>

use serde::{Deserialize, Serialize};

use super::{AuthCredentials, Request};
use crate::protocol::EmptyResult;

/// <https://w3c.github.io/webdriver-bidi/#command-network-continueWithAuth>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "method")]
#[serde(rename = "network.continueWithAuth")]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub params: Parameters,
}

impl crate::protocol::Command for Command {
    type Result = EmptyResult;
}

/// `deny_unknown_fields` does not work together with `flatten`, so it is left off here.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    pub request: Request,
    #[serde(flatten)]
    pub action: Action,
}

/// <https://w3c.github.io/webdriver-bidi/#command-network-continueWithAuth>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "action")]
#[serde(rename_all = "camelCase")]
pub enum Action {
    ProvideCredentials { credentials: AuthCredentials },
    Default,
    Cancel,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn action_is_flattened_next_to_the_request() {
        let command = Command {
            params: Parameters {
                request: Request("req".to_owned()),
                action: Action::ProvideCredentials {
                    credentials: AuthCredentials::password("user", "pass"),
                },
            },
        };
        assert_eq!(
            serde_json::to_value(command).unwrap(),
            json!({
                "method": "network.continueWithAuth",
                "params": {
                    "request": "req",
                    "action": "provideCredentials",
                    "credentials": {"type": "password", "username": "user", "password": "pass"}
                }
            })
        );

        let cancel = Parameters {
            request: Request("req".to_owned()),
            action: Action::Cancel,
        };
        assert_eq!(
            serde_json::to_value(cancel).unwrap(),
            json!({"request": "req", "action": "cancel"})
        );
    }
}
