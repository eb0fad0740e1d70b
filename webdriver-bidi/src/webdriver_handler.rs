use std::collections::HashMap;

use futures::{SinkExt as _, StreamExt as _};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, error, trace, warn};

use crate::event::EventData;
use crate::protocol::{CommandResponse, ErrorResponse, IncomingMessage};
use crate::session::SubscriptionRequest;
use crate::subscription::{
    Added, EventRegistry, Listener, ListenerId, OwnerId, SubscribeOutcome, SubscriptionKey,
};

/// Requests from [`crate::WebDriver`] handles to the task owning the connection.
#[derive(Debug)]
pub enum SendCommand {
    /// A serialized command without `id`.
    Command(Value, oneshot::Sender<crate::Result<Value>>),
    AddListener(OwnerId, Listener, oneshot::Sender<Added>),
    /// The answer to a `session.subscribe` sent for a new listener.
    SettleSubscription(
        Vec<SubscriptionKey>,
        SubscribeOutcome,
        oneshot::Sender<Vec<SubscriptionRequest>>,
    ),
    RemoveListener(
        ListenerId,
        oneshot::Sender<crate::Result<Vec<SubscriptionRequest>>>,
    ),
    RemoveOwner(OwnerId, oneshot::Sender<Vec<SubscriptionRequest>>),
    Close(oneshot::Sender<()>),
}

pub struct WebDriverHandler<S> {
    id: u64,
    stream: WebSocketStream<S>,
    receive_command: mpsc::UnboundedReceiver<SendCommand>,
    pending_commands: HashMap<u64, oneshot::Sender<crate::Result<Value>>>,
    registry: EventRegistry,
}

impl<S> WebDriverHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    pub async fn handle(
        stream: WebSocketStream<S>,
        receive_command: mpsc::UnboundedReceiver<SendCommand>,
    ) {
        let mut this = Self {
            id: 0,
            stream,
            receive_command,
            pending_commands: HashMap::default(),
            registry: EventRegistry::new(),
        };
        this.handle_internal().await;
        this.shutdown();
    }

    async fn handle_internal(&mut self) {
        loop {
            tokio::select! {
                message = self.stream.next() => {
                    match message {
                        Some(Ok(Message::Text(message))) => self.handle_message(&message),
                        Some(Ok(Message::Close(frame))) => {
                            debug!(?frame, "remote end closed the connection");
                            break;
                        }
                        Some(Ok(message)) => {
                            trace!(?message, "ignoring non-text message");
                        }
                        Some(Err(error)) => {
                            error!(%error, "connection failed");
                            break;
                        }
                        None => {
                            debug!("connection closed");
                            break;
                        }
                    }
                }
                command = self.receive_command.recv() => {
                    match command {
                        Some(SendCommand::Close(sender)) => {
                            self.close_stream().await;
                            self.shutdown();
                            if sender.send(()).is_err() {
                                trace!("close caller went away");
                            }
                            break;
                        }
                        Some(command) => self.handle_command(command).await,
                        None => {
                            debug!("every handle was dropped");
                            self.close_stream().await;
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn handle_command(&mut self, command: SendCommand) {
        match command {
            SendCommand::Command(value, sender) => self.send_command(value, sender).await,
            SendCommand::AddListener(owner, listener, sender) => {
                if sender.send(self.registry.add(owner, listener)).is_err() {
                    trace!("listener caller went away");
                }
            }
            SendCommand::SettleSubscription(keys, outcome, sender) => {
                if sender.send(self.registry.settle(&keys, &outcome)).is_err() {
                    trace!("listener caller went away");
                }
            }
            SendCommand::RemoveListener(listener, sender) => {
                let result = self.registry.remove(listener).map_err(crate::Error::from);
                if sender.send(result).is_err() {
                    trace!("listener caller went away");
                }
            }
            SendCommand::RemoveOwner(owner, sender) => {
                if sender.send(self.registry.remove_owner(owner)).is_err() {
                    trace!("listener caller went away");
                }
            }
            SendCommand::Close(sender) => {
                if sender.send(()).is_err() {
                    trace!("close caller went away");
                }
            }
        }
    }

    async fn send_command(
        &mut self,
        mut value: Value,
        sender: oneshot::Sender<crate::Result<Value>>,
    ) {
        let Value::Object(command) = &mut value else {
            if sender
                .send(Err(crate::Error::UnsupportedArgument(
                    "command is not a JSON object".to_owned(),
                )))
                .is_err()
            {
                trace!("command caller went away");
            }
            return;
        };

        self.id += 1;
        let id = self.id;
        command.insert("id".to_owned(), Value::from(id));
        let text = value.to_string();
        trace!(id, %text, "sending command");

        self.pending_commands.insert(id, sender);
        if let Err(error) = self.stream.send(Message::Text(text)).await {
            warn!(id, %error, "failed to send command");
            if let Some(sender) = self.pending_commands.remove(&id) {
                if sender.send(Err(crate::Error::WebSocket(error))).is_err() {
                    trace!(id, "command caller went away");
                }
            }
        }
    }

    fn handle_message(&mut self, message: &str) {
        trace!(%message, "received");
        let jd = &mut serde_json::Deserializer::from_str(message);
        let parsed: IncomingMessage = match serde_path_to_error::deserialize(jd) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(%error, %message, "dropping undecodable message");
                return;
            }
        };

        match parsed {
            IncomingMessage::CommandResponse(CommandResponse { id, result }) => {
                self.respond(id, Ok(result));
            }
            IncomingMessage::ErrorResponse(ErrorResponse {
                id: Some(id),
                error,
                message,
                stacktrace,
            }) => {
                self.respond(
                    id,
                    Err(crate::Error::Protocol {
                        error,
                        message,
                        stacktrace,
                    }),
                );
            }
            IncomingMessage::ErrorResponse(ErrorResponse {
                id: None,
                error,
                message,
                ..
            }) => {
                warn!(%error, %message, "error without command id");
            }
            IncomingMessage::Event(event) => {
                let method = event.method.clone();
                match EventData::from_message(event) {
                    Ok(event) => {
                        let invoked = self.registry.dispatch(&event);
                        trace!(%method, invoked, "dispatched event");
                    }
                    Err(error) => warn!(%method, %error, "dropping undecodable event"),
                }
            }
        }
    }

    fn respond(&mut self, id: u64, result: crate::Result<Value>) {
        match self.pending_commands.remove(&id) {
            Some(sender) => {
                if sender.send(result).is_err() {
                    debug!(id, "command caller went away before the response");
                }
            }
            None => warn!(id, "dropping response for unknown command"),
        }
    }

    async fn close_stream(&mut self) {
        if let Err(error) = self.stream.close(None).await {
            debug!(%error, "closing the connection failed");
        }
    }

    /// Nothing may be left waiting once the connection is gone.
    fn shutdown(&mut self) {
        let pending = self.pending_commands.len();
        for (_, sender) in self.pending_commands.drain() {
            if sender.send(Err(crate::Error::ConnectionClosed)).is_err() {
                trace!("command caller went away");
            }
        }
        self.registry.clear();
        self.receive_command.close();
        while let Ok(command) = self.receive_command.try_recv() {
            if let SendCommand::Command(_, sender) = command {
                if sender.send(Err(crate::Error::ConnectionClosed)).is_err() {
                    trace!("command caller went away");
                }
            }
        }
        debug!(pending, "handler shut down");
    }
}
