mod common;

use serde_json::json;
use webdriver_bidi::browsing_context::BrowsingContext;
use webdriver_bidi::script::{
    Channel, ChannelProperties, ChannelValue, EvaluateOptions, LocalValue, PreloadScript,
    RemoteValue, ScriptModule,
};
use webdriver_bidi::ErrorCode;

use crate::common::connect;

#[tokio::test]
async fn evaluate_returns_numbers_and_exceptions() {
    let (driver, mut remote) = connect().await;
    let script = ScriptModule::new(driver);
    let context = BrowsingContext("ctx".to_owned());

    let (result, ()) = tokio::join!(
        script.evaluate_in_browsing_context(&context, None, "1+2", true, EvaluateOptions::default()),
        async {
            let command = remote.next_command().await;
            assert_eq!(command.method, "script.evaluate");
            assert_eq!(
                command.params,
                json!({"expression": "1+2", "target": {"context": "ctx"}, "awaitPromise": true})
            );
            remote
                .respond(
                    command.id,
                    json!({"type": "success", "realm": "r", "result": {"type": "number", "value": 3}}),
                )
                .await;
        }
    );
    let result = result.unwrap();
    let number = result.result().and_then(RemoteValue::as_number).unwrap();
    assert!((number.as_f64() - 3.0).abs() < f64::EPSILON);

    let (result, ()) = tokio::join!(
        script.evaluate_in_browsing_context(&context, None, "1+", false, EvaluateOptions::default()),
        async {
            let command = remote.next_command().await;
            remote
                .respond(
                    command.id,
                    json!({
                        "type": "exception",
                        "realm": "r",
                        "exceptionDetails": {
                            "columnNumber": 2,
                            "lineNumber": 0,
                            "exception": {"type": "error"},
                            "stackTrace": {"callFrames": []},
                            "text": "SyntaxError: expected expression, got end of script",
                        }
                    }),
                )
                .await;
        }
    );
    let result = result.unwrap();
    assert!(result.result().is_none());
    assert!(result.exception().unwrap().text.contains("SyntaxError"));
}

#[tokio::test]
async fn sandbox_is_part_of_the_target() {
    let (driver, mut remote) = connect().await;
    let script = ScriptModule::new(driver);
    let context = BrowsingContext("ctx".to_owned());

    let (result, ()) = tokio::join!(
        script.call_function_in_browsing_context(
            &context,
            Some("isolated".to_owned()),
            "(a) => a",
            false,
            webdriver_bidi::script::CallFunctionOptions {
                arguments: Some(vec![LocalValue::string("x")]),
                ..Default::default()
            },
        ),
        async {
            let command = remote.next_command().await;
            assert_eq!(command.method, "script.callFunction");
            assert_eq!(
                command.params["target"],
                json!({"context": "ctx", "sandbox": "isolated"})
            );
            assert_eq!(
                command.params["arguments"],
                json!([{"type": "string", "value": "x"}])
            );
            remote
                .respond(
                    command.id,
                    json!({"type": "success", "realm": "sandbox-realm", "result": {"type": "string", "value": "x"}}),
                )
                .await;
        }
    );
    let result = result.unwrap();
    assert_eq!(result.realm().0, "sandbox-realm");
    assert_eq!(result.result().and_then(RemoteValue::as_str), Some("x"));
}

#[tokio::test]
async fn preload_scripts_and_channels() {
    let (driver, mut remote) = connect().await;
    let script = ScriptModule::new(driver);

    let (messages, params) = tokio::join!(
        script.message_channel(None),
        remote.ack("session.subscribe")
    );
    let (_, mut messages) = messages.unwrap();
    assert_eq!(params, json!({"events": ["script.message"]}));

    let channel = ChannelValue {
        value: ChannelProperties {
            channel: Channel("ready".to_owned()),
            serialization_options: None,
            ownership: None,
        },
    };
    let (preload, ()) = tokio::join!(
        script.add_preload_script("(ready) => ready('hi')", Some(vec![channel]), None, None),
        async {
            let command = remote.next_command().await;
            assert_eq!(command.method, "script.addPreloadScript");
            assert_eq!(
                command.params["arguments"],
                json!([{"type": "channel", "value": {"channel": "ready"}}])
            );
            remote.respond(command.id, json!({"script": "preload-1"})).await;
        }
    );
    let preload = preload.unwrap();
    assert_eq!(preload, PreloadScript("preload-1".to_owned()));

    remote
        .emit(
            "script.message",
            json!({
                "channel": "ready",
                "data": {"type": "string", "value": "hi"},
                "source": {"realm": "r", "context": "ctx"},
            }),
        )
        .await;
    let message = messages.recv().await.unwrap();
    assert_eq!(message.channel, Channel("ready".to_owned()));
    assert_eq!(message.data.as_str(), Some("hi"));

    let (removed, params) = tokio::join!(
        script.remove_preload_script(&preload),
        remote.ack("script.removePreloadScript")
    );
    removed.unwrap();
    assert_eq!(params, json!({"script": "preload-1"}));

    // Known to be gone, so this never reaches the remote end.
    let error = script.remove_preload_script(&preload).await.unwrap_err();
    assert_eq!(error.code(), Some(&ErrorCode::NoSuchScript));
}
