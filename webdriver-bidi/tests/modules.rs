mod common;

use serde_json::json;
use webdriver_bidi::browser::{BrowserModule, UserContext};
use webdriver_bidi::browsing_context::state::ContextState;
use webdriver_bidi::browsing_context::{BrowsingContext, BrowsingContextModule, ReadinessState};
use webdriver_bidi::input::perform_actions::PointerType;
use webdriver_bidi::input::{InputModule, KeyActions, PointerActions};
use webdriver_bidi::log::{EntryKind, FilterBy, Level, LogInspector};
use webdriver_bidi::network::{InterceptPhase, NetworkModule, Request, UrlPattern};
use webdriver_bidi::storage::{CookieFilter, PartialCookie, PartitionDescriptor, StorageModule};
use webdriver_bidi::{ErrorCode, ErrorKind};

use crate::common::{connect, log_entry, FakeRemoteEnd};

/// Answers the next `browsingContext.getTree` so the caller knows every earlier event was
/// dispatched.
async fn sync(module: &BrowsingContextModule, remote: &mut FakeRemoteEnd) {
    let (tree, ()) = tokio::join!(module.get_tree(Some(0), None), async {
        let command = remote.next_command().await;
        assert_eq!(command.method, "browsingContext.getTree");
        remote.respond(command.id, json!({"contexts": []})).await;
    });
    assert!(tree.unwrap().is_empty());
}

#[tokio::test]
async fn lifecycle_tracking_guards_navigation() {
    let (driver, mut remote) = connect().await;
    let contexts = BrowsingContextModule::new(driver);
    let context = BrowsingContext("ctx".to_owned());

    let (listener, params) = tokio::join!(
        contexts.track_lifecycle(),
        remote.ack("session.subscribe")
    );
    listener.unwrap();
    assert_eq!(params, json!({"events": ["browsingContext"]}));

    remote
        .emit(
            "browsingContext.contextCreated",
            json!({"context": "ctx", "url": "about:blank", "children": null, "parent": null}),
        )
        .await;
    remote
        .emit(
            "browsingContext.userPromptOpened",
            json!({"context": "ctx", "type": "confirm", "message": "sure?"}),
        )
        .await;
    sync(&contexts, &mut remote).await;

    let lifecycle = contexts.lifecycle(&context).unwrap();
    assert_eq!(lifecycle.state, ContextState::Created);
    assert!(lifecycle.prompt_open);

    let error = contexts
        .navigate(&context, "https://example.com/", ReadinessState::Complete)
        .await
        .unwrap_err();
    assert_eq!(error.code(), Some(&ErrorCode::UnexpectedAlertOpen));

    let (handled, params) = tokio::join!(
        contexts.handle_user_prompt(&context, Some(true), None),
        remote.ack("browsingContext.handleUserPrompt")
    );
    handled.unwrap();
    assert_eq!(params, json!({"context": "ctx", "accept": true}));

    let error = contexts
        .handle_user_prompt(&context, Some(true), None)
        .await
        .unwrap_err();
    assert_eq!(error.code(), Some(&ErrorCode::NoSuchAlert));

    let (navigation, ()) = tokio::join!(
        contexts.navigate(&context, "https://example.com/", ReadinessState::Complete),
        async {
            let command = remote.next_command().await;
            assert_eq!(command.method, "browsingContext.navigate");
            assert_eq!(command.params["wait"], json!("complete"));
            remote
                .respond(
                    command.id,
                    json!({"navigation": "nav-1", "url": "https://example.com/"}),
                )
                .await;
        }
    );
    assert_eq!(navigation.unwrap().url, "https://example.com/");

    let (closed, _) = tokio::join!(
        contexts.close_context(&context, false),
        remote.ack("browsingContext.close")
    );
    closed.unwrap();
    assert_eq!(
        contexts.lifecycle(&context).unwrap().state,
        ContextState::Closed
    );
    let error = contexts.activate(&context).await.unwrap_err();
    assert_eq!(error.code(), Some(&ErrorCode::NoSuchFrame));
}

#[tokio::test]
async fn closing_the_module_stops_lifecycle_checks() {
    let (driver, mut remote) = connect().await;
    let contexts = BrowsingContextModule::new(driver);
    let context = BrowsingContext("ctx".to_owned());

    let (listener, _) = tokio::join!(
        contexts.track_lifecycle(),
        remote.ack("session.subscribe")
    );
    listener.unwrap();
    remote
        .emit(
            "browsingContext.userPromptOpened",
            json!({"context": "ctx", "type": "alert", "message": "hi"}),
        )
        .await;
    sync(&contexts, &mut remote).await;
    assert!(contexts.lifecycle(&context).unwrap().prompt_open);

    let (closed, params) = tokio::join!(contexts.close(), remote.ack("session.unsubscribe"));
    closed.unwrap();
    assert_eq!(params, json!({"events": ["browsingContext"]}));
    assert_eq!(contexts.lifecycle(&context), None);

    // No events arrive any more, so the remote end decides about prompts again.
    for _ in 0..2 {
        let (handled, params) = tokio::join!(
            contexts.handle_user_prompt(&context, Some(true), None),
            remote.ack("browsingContext.handleUserPrompt")
        );
        handled.unwrap();
        assert_eq!(params, json!({"context": "ctx", "accept": true}));
    }
    let (navigation, ()) = tokio::join!(
        contexts.navigate(&context, "https://example.com/", ReadinessState::None),
        async {
            let command = remote.next_command().await;
            assert_eq!(command.method, "browsingContext.navigate");
            remote
                .respond(command.id, json!({"navigation": null, "url": "https://example.com/"}))
                .await;
        }
    );
    navigation.unwrap();
}

#[tokio::test]
async fn log_inspector_filters_by_type_and_level() {
    let (driver, mut remote) = connect().await;
    let contexts = BrowsingContextModule::new(driver.clone());
    let inspector = LogInspector::new(driver);

    let (errors_sender, mut errors) = tokio::sync::mpsc::unbounded_channel();
    let (id, _) = tokio::join!(
        inspector.on_javascript_exception(move |entry| {
            errors_sender.send(entry.text.clone()).unwrap();
        }),
        remote.ack("session.subscribe")
    );
    id.unwrap();

    let (console_sender, mut console) = tokio::sync::mpsc::unbounded_channel();
    inspector
        .on_console_entry(Some(FilterBy::Level(Level::Warn)), move |entry| {
            console_sender.send(entry.clone()).unwrap();
        })
        .await
        .unwrap();

    for (level, r#type, text) in [
        ("info", "console", "ignored info"),
        ("warn", "console", "careful"),
        ("warn", "javascript", "not an exception"),
        ("error", "javascript", "TypeError: boom"),
    ] {
        remote
            .emit("log.entryAdded", log_entry(level, r#type, text))
            .await;
    }
    sync(&contexts, &mut remote).await;

    let entry = console.try_recv().unwrap();
    assert_eq!(entry.level, Level::Warn);
    assert!(matches!(entry.kind, EntryKind::Console { .. }));
    assert!(console.try_recv().is_err());

    assert_eq!(errors.try_recv().unwrap().as_deref(), Some("TypeError: boom"));
    assert!(errors.try_recv().is_err());
}

#[tokio::test]
async fn network_intercept_round_trip() {
    let (driver, mut remote) = connect().await;
    let network = NetworkModule::new(driver);

    let error = network.add_intercept(vec![], None, None).await.unwrap_err();
    assert_eq!(error.code(), Some(&ErrorCode::InvalidArgument));

    let (intercept, ()) = tokio::join!(
        network.add_intercept(
            vec![InterceptPhase::BeforeRequestSent],
            Some(vec![UrlPattern::string("https://example.com/*")]),
            None,
        ),
        async {
            let command = remote.next_command().await;
            assert_eq!(command.method, "network.addIntercept");
            assert_eq!(
                command.params,
                json!({
                    "phases": ["beforeRequestSent"],
                    "urlPatterns": [{"type": "string", "pattern": "https://example.com/*"}]
                })
            );
            remote.respond(command.id, json!({"intercept": "i-1"})).await;
        }
    );
    let intercept = intercept.unwrap();

    let request = Request("req-1".to_owned());
    let (continued, params) = tokio::join!(
        network.fail_request(&request),
        remote.ack("network.failRequest")
    );
    continued.unwrap();
    assert_eq!(params, json!({"request": "req-1"}));

    let (cancelled, params) = tokio::join!(
        network.cancel_auth(&request),
        remote.ack("network.continueWithAuth")
    );
    cancelled.unwrap();
    assert_eq!(params, json!({"request": "req-1", "action": "cancel"}));

    let (removed, params) = tokio::join!(
        network.remove_intercept(&intercept),
        remote.ack("network.removeIntercept")
    );
    removed.unwrap();
    assert_eq!(params, json!({"intercept": "i-1"}));
}

#[tokio::test]
async fn storage_defaults_to_the_context_partition() {
    let (driver, mut remote) = connect().await;
    let storage = StorageModule::new(driver, BrowsingContext("ctx".to_owned()));

    let (key, ()) = tokio::join!(
        storage.set_cookie(PartialCookie::new("session", "abc", "example.com"), None),
        async {
            let command = remote.next_command().await;
            assert_eq!(command.method, "storage.setCookie");
            assert_eq!(
                command.params,
                json!({
                    "cookie": {
                        "name": "session",
                        "value": {"type": "string", "value": "abc"},
                        "domain": "example.com"
                    },
                    "partition": {"type": "context", "context": "ctx"}
                })
            );
            remote
                .respond(command.id, json!({"partitionKey": {"userContext": "default"}}))
                .await;
        }
    );
    assert_eq!(
        key.unwrap().user_context,
        Some(UserContext("default".to_owned()))
    );

    let (cookies, ()) = tokio::join!(
        storage.get_cookies(Some(CookieFilter::by_name("session")), None),
        async {
            let command = remote.next_command().await;
            assert_eq!(command.params["filter"], json!({"name": "session"}));
            remote
                .respond(
                    command.id,
                    json!({
                        "cookies": [{
                            "name": "session",
                            "value": {"type": "string", "value": "abc"},
                            "domain": "example.com",
                            "path": "/",
                            "size": 10,
                            "httpOnly": false,
                            "secure": false,
                            "sameSite": "none"
                        }],
                        "partitionKey": {}
                    }),
                )
                .await;
        }
    );
    assert_eq!(cookies.unwrap().cookies[0].name, "session");

    let (deleted, params) = tokio::join!(
        storage.delete_cookies(None, None),
        async {
            let command = remote.next_command().await;
            assert_eq!(command.method, "storage.deleteCookies");
            remote
                .respond(command.id, json!({"partitionKey": {}}))
                .await;
            command.params
        }
    );
    deleted.unwrap();
    assert_eq!(params, json!({"partition": {"type": "context", "context": "ctx"}}));

    // An explicit partition wins over the module's context.
    let (cookies, params) = tokio::join!(
        storage.get_cookies(
            None,
            Some(PartitionDescriptor::StorageKey {
                user_context: Some(UserContext("default".to_owned())),
                source_origin: None,
            })
        ),
        async {
            let command = remote.next_command().await;
            remote
                .respond(command.id, json!({"cookies": [], "partitionKey": {}}))
                .await;
            command.params
        }
    );
    assert!(cookies.unwrap().cookies.is_empty());
    assert_eq!(
        params,
        json!({"partition": {"type": "storageKey", "userContext": "default"}})
    );
}

#[tokio::test]
async fn input_and_browser_commands() {
    let (driver, mut remote) = connect().await;
    let input = InputModule::new(driver.clone());
    let browser = BrowserModule::new(driver);
    let context = BrowsingContext("ctx".to_owned());

    let (performed, params) = tokio::join!(
        input.perform(
            &context,
            vec![
                KeyActions::new("keyboard").send_keys("a").into(),
                PointerActions::new("mouse", PointerType::Mouse)
                    .move_to(1.0, 2.0, None)
                    .into(),
            ],
        ),
        remote.ack("input.performActions")
    );
    performed.unwrap();
    assert_eq!(params["actions"][0]["type"], json!("key"));
    assert_eq!(params["actions"][1]["actions"][0]["type"], json!("pointerMove"));

    let (released, params) = tokio::join!(
        input.release(&context),
        remote.ack("input.releaseActions")
    );
    released.unwrap();
    assert_eq!(params, json!({"context": "ctx"}));

    let error = browser
        .remove_user_context(&UserContext::default_context())
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Protocol);

    let (user_contexts, ()) = tokio::join!(browser.get_user_contexts(), async {
        let command = remote.next_command().await;
        assert_eq!(command.method, "browser.getUserContexts");
        remote
            .respond(
                command.id,
                json!({"userContexts": [{"userContext": "default"}, {"userContext": "uc-1"}]}),
            )
            .await;
    });
    assert_eq!(user_contexts.unwrap().len(), 2);
}
