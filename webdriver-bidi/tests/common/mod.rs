//! An in-memory remote end speaking just enough BiDi for the client under test.

#![allow(dead_code)]

use std::time::Duration;

use futures::{SinkExt as _, StreamExt as _};
use serde_json::{json, Value};
use tokio::io::DuplexStream;
use tokio_tungstenite::tungstenite::protocol::Role;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing_subscriber::EnvFilter;
use webdriver_bidi::WebDriver;

pub const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct ReceivedCommand {
    pub id: u64,
    pub method: String,
    pub params: Value,
}

pub struct FakeRemoteEnd {
    stream: WebSocketStream<DuplexStream>,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub async fn connect() -> (WebDriver, FakeRemoteEnd) {
    init_tracing();
    let (client, server) = tokio::io::duplex(1 << 16);
    let client = WebSocketStream::from_raw_socket(client, Role::Client, None).await;
    let server = WebSocketStream::from_raw_socket(server, Role::Server, None).await;
    (
        WebDriver::from_stream(client),
        FakeRemoteEnd { stream: server },
    )
}

impl FakeRemoteEnd {
    pub async fn next_command(&mut self) -> ReceivedCommand {
        loop {
            let message = tokio::time::timeout(TIMEOUT, self.stream.next())
                .await
                .expect("no command within timeout")
                .expect("client closed the connection")
                .expect("websocket error");
            let Message::Text(text) = message else {
                continue;
            };
            let value: Value = serde_json::from_str(&text).unwrap();
            return ReceivedCommand {
                id: value["id"].as_u64().expect("command without id"),
                method: value["method"].as_str().unwrap().to_owned(),
                params: value["params"].clone(),
            };
        }
    }

    /// Receives the next command, checks its method and answers with an empty result.
    pub async fn ack(&mut self, method: &str) -> Value {
        let command = self.next_command().await;
        assert_eq!(command.method, method, "unexpected command {command:?}");
        self.respond(command.id, json!({})).await;
        command.params
    }

    pub async fn respond(&mut self, id: u64, result: Value) {
        self.send(json!({"type": "success", "id": id, "result": result}))
            .await;
    }

    pub async fn respond_error(&mut self, id: u64, error: &str, message: &str) {
        self.send(json!({
            "type": "error",
            "id": id,
            "error": error,
            "message": message,
            "stacktrace": "at remote",
        }))
        .await;
    }

    pub async fn emit(&mut self, method: &str, params: Value) {
        self.send(json!({"type": "event", "method": method, "params": params}))
            .await;
    }

    pub async fn send(&mut self, value: Value) {
        self.stream
            .send(Message::Text(value.to_string()))
            .await
            .unwrap();
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

pub fn log_entry(level: &str, r#type: &str, text: &str) -> Value {
    let mut entry = json!({
        "type": r#type,
        "level": level,
        "source": {"realm": "realm-1", "context": "ctx"},
        "text": text,
        "timestamp": 1,
    });
    if r#type == "console" {
        entry["method"] = json!("log");
        entry["args"] = json!([{"type": "string", "value": text}]);
    }
    entry
}
