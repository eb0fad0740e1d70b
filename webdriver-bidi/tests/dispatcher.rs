mod common;

use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use serde_json::json;
use webdriver_bidi::log::LogInspector;
use webdriver_bidi::script::{self, EvaluateOptions, Realm, ScriptModule};
use webdriver_bidi::subscription::Listener;
use webdriver_bidi::{Error, ErrorCode, ErrorKind, EventData};

use crate::common::{connect, log_entry};

#[tokio::test]
async fn concurrent_commands_answered_in_reverse_order() {
    let (driver, mut remote) = connect().await;
    let script = ScriptModule::new(driver.clone());
    let realm = Realm("realm-1".to_owned());

    let calls = join_all((0..10).map(|i| {
        let script = &script;
        let realm = &realm;
        async move {
            script
                .evaluate_in_realm(realm, i.to_string(), false, EvaluateOptions::default())
                .await
        }
    }));
    let remote_side = async {
        let mut commands = Vec::new();
        for _ in 0..10 {
            commands.push(remote.next_command().await);
        }
        let mut ids: Vec<_> = commands.iter().map(|command| command.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10, "ids must be unique");

        for command in commands.iter().rev() {
            let expression = command.params["expression"].as_str().unwrap();
            let value: f64 = expression.parse().unwrap();
            remote
                .respond(
                    command.id,
                    json!({"type": "success", "realm": "realm-1", "result": {"type": "number", "value": value}}),
                )
                .await;
        }
    };
    let (results, ()) = tokio::join!(calls, remote_side);

    for (i, result) in results.into_iter().enumerate() {
        let result = result.unwrap();
        let number = result.result().and_then(script::RemoteValue::as_number).unwrap();
        #[allow(clippy::cast_precision_loss)]
        let expected = i as f64;
        assert!((number.as_f64() - expected).abs() < f64::EPSILON);
    }
}

#[tokio::test]
async fn error_response_fails_only_its_command() {
    let (driver, mut remote) = connect().await;

    let (status, ()) = tokio::join!(driver.session_status(), async {
        let command = remote.next_command().await;
        assert_eq!(command.method, "session.status");
        remote
            .respond_error(command.id, "unknown command", "not here")
            .await;
    });
    let error = status.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Protocol);
    assert_eq!(error.code(), Some(&ErrorCode::UnknownCommand));
    assert!(!error.is_retryable());
    let Error::Protocol { stacktrace, .. } = error else {
        panic!("expected a protocol error");
    };
    assert_eq!(stacktrace.as_deref(), Some("at remote"));

    let (status, ()) = tokio::join!(driver.session_status(), async {
        let command = remote.next_command().await;
        remote
            .respond(command.id, json!({"ready": false, "message": "busy"}))
            .await;
    });
    assert_eq!(status.unwrap().message, "busy");
}

#[tokio::test]
async fn stray_messages_are_dropped() {
    let (driver, mut remote) = connect().await;

    let (status, ()) = tokio::join!(driver.session_status(), async {
        let command = remote.next_command().await;
        remote.respond(command.id + 100, json!({})).await;
        remote.send(json!({"garbage": true})).await;
        remote
            .send(json!({"type": "error", "id": null, "error": "invalid argument", "message": "?"}))
            .await;
        remote.emit("vendor.unknownEvent", json!({})).await;
        remote
            .respond(command.id, json!({"ready": true, "message": ""}))
            .await;
    });
    assert!(status.unwrap().ready);
}

#[tokio::test]
async fn teardown_rejects_pending_commands() {
    let (driver, mut remote) = connect().await;

    let pending = join_all((0..5).map(|_| driver.session_status()));
    let (statuses, ()) = tokio::join!(pending, async {
        for _ in 0..5 {
            remote.next_command().await;
        }
        remote.close().await;
    });
    assert_eq!(statuses.len(), 5);
    for status in statuses {
        let error = status.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Transport);
        assert!(error.is_retryable());
    }

    let error = driver.session_status().await.unwrap_err();
    assert!(matches!(error, Error::ConnectionClosed));
}

#[tokio::test]
async fn close_is_idempotent() {
    let (driver, _remote) = connect().await;
    driver.close().await.unwrap();
    driver.close().await.unwrap();
    assert!(matches!(
        driver.session_status().await.unwrap_err(),
        Error::ConnectionClosed
    ));
}

#[tokio::test]
async fn fan_out_in_order_with_panic_isolation() {
    let (driver, mut remote) = connect().await;
    let seen = Arc::new(Mutex::new(Vec::new()));

    let first = {
        let seen = Arc::clone(&seen);
        Listener::new("log.entryAdded", move |_: &EventData| seen.lock().push("first"))
    };
    let (id, params) = tokio::join!(driver.on(first), remote.ack("session.subscribe"));
    let first_id = id.unwrap();
    assert_eq!(params, json!({"events": ["log.entryAdded"]}));

    // Same key, so no further subscribe goes over the wire.
    driver
        .on(Listener::new("log.entryAdded", |_: &EventData| {
            panic!("listener failure");
        }))
        .await
        .unwrap();
    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
    let third = {
        let seen = Arc::clone(&seen);
        Listener::new("log", move |event: &EventData| {
            seen.lock().push("third");
            sender.send(event.method()).unwrap();
        })
    };
    let (id, params) = tokio::join!(driver.on(third), remote.ack("session.subscribe"));
    id.unwrap();
    assert_eq!(params, json!({"events": ["log"]}));

    remote
        .emit("log.entryAdded", log_entry("info", "console", "hello"))
        .await;
    assert_eq!(receiver.recv().await, Some("log.entryAdded"));
    assert_eq!(*seen.lock(), vec!["first", "third"]);

    // The other listener still needs the subscription.
    driver.off(first_id).await.unwrap();
    remote
        .emit("log.entryAdded", log_entry("info", "console", "again"))
        .await;
    assert_eq!(receiver.recv().await, Some("log.entryAdded"));
    assert_eq!(*seen.lock(), vec!["first", "third", "third"]);
}

#[tokio::test]
async fn closed_module_rejects_listeners_and_releases_subscriptions() {
    let (driver, mut remote) = connect().await;
    let inspector = LogInspector::new(driver.clone());

    let (id, _) = tokio::join!(
        inspector.on_log(None, |_| {}),
        remote.ack("session.subscribe")
    );
    id.unwrap();

    let (closed, params) = tokio::join!(inspector.close(), remote.ack("session.unsubscribe"));
    closed.unwrap();
    assert_eq!(params, json!({"events": ["log.entryAdded"]}));

    let error = inspector.on_log(None, |_| {}).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Subscription);
    inspector.close().await.unwrap();
}

#[tokio::test]
async fn failed_subscribe_fails_every_listener_waiting_on_it() {
    let (driver, mut remote) = connect().await;

    let (first, second, ()) = tokio::join!(
        driver.on(Listener::new("log.entryAdded", |_: &EventData| {})),
        driver.on(Listener::new("log.entryAdded", |_: &EventData| {})),
        async {
            let command = remote.next_command().await;
            assert_eq!(command.method, "session.subscribe");
            remote
                .respond_error(command.id, "invalid argument", "no such event")
                .await;
        }
    );
    assert_eq!(
        first.unwrap_err().code(),
        Some(&ErrorCode::InvalidArgument)
    );
    assert_eq!(second.unwrap_err().kind(), ErrorKind::Subscription);

    // Both listeners are gone, so the next one subscribes again and receives events.
    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
    let third = Listener::new("log.entryAdded", move |event: &EventData| {
        sender.send(event.method()).unwrap();
    });
    let (id, params) = tokio::join!(driver.on(third), remote.ack("session.subscribe"));
    id.unwrap();
    assert_eq!(params, json!({"events": ["log.entryAdded"]}));

    remote
        .emit("log.entryAdded", log_entry("info", "console", "hello"))
        .await;
    assert_eq!(receiver.recv().await, Some("log.entryAdded"));
}

#[tokio::test]
async fn closing_while_a_listener_subscribes_releases_it() {
    let (driver, mut remote) = connect().await;
    let inspector = LogInspector::new(driver.clone());

    let (listened, closed, unsubscribed) = tokio::join!(
        inspector.on_log(None, |_| {}),
        inspector.close(),
        async {
            remote.ack("session.subscribe").await;
            remote.ack("session.unsubscribe").await
        }
    );
    closed.unwrap();
    assert_eq!(listened.unwrap_err().kind(), ErrorKind::Subscription);
    assert_eq!(unsubscribed, json!({"events": ["log.entryAdded"]}));

    // Nothing is left registered: a fresh listener has to subscribe again.
    let (id, params) = tokio::join!(
        driver.on(Listener::new("log.entryAdded", |_: &EventData| {})),
        remote.ack("session.subscribe")
    );
    id.unwrap();
    assert_eq!(params, json!({"events": ["log.entryAdded"]}));
}
