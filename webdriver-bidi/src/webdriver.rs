use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt as _, AsyncRead, AsyncWrite, BufReader};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, info, warn};
use webdriver_bidi_config::{BrowserConfig, Config};

use crate::protocol::{self, Command, EmptyParams};
use crate::session;
use crate::error::SubscriptionError;
use crate::subscription::{self, Listener, ListenerId, OwnerId, SubscribeOutcome, SubscriptionKey};
use crate::webdriver_handler::{SendCommand, WebDriverHandler};

/// What Firefox prints to stderr once the BiDi server is up.
const LISTENING_PREFIX: &str = "WebDriver BiDi listening on ws://127.0.0.1:";

/// Listeners registered directly on the [`WebDriver`] instead of through a module.
const DRIVER_OWNER: OwnerId = OwnerId(0);

/// Kills the launched browser once the last [`WebDriver`] handle is dropped.
#[derive(Debug)]
struct BrowserProcess {
    _shutdown: oneshot::Sender<()>,
}

/// A handle to one BiDi connection. Cloning is cheap; every clone talks to the same task,
/// which owns the socket.
///
/// <https://w3c.github.io/webdriver-bidi>
#[derive(Debug, Clone)]
pub struct WebDriver {
    commands: mpsc::UnboundedSender<SendCommand>,
    next_owner: Arc<AtomicU64>,
    _browser: Option<Arc<BrowserProcess>>,
}

impl WebDriver {
    /// Connects to a running remote end, e.g. `ws://127.0.0.1:9222/session`.
    /// ## Errors
    /// Returns an error if the `WebSocket` connection fails.
    pub async fn connect(url: &str) -> crate::Result<Self> {
        let (stream, _response) = tokio_tungstenite::connect_async(url).await?;
        debug!(url, "connected");
        Ok(Self::from_stream(stream))
    }

    /// Takes over an established `WebSocket`. Must be called within a tokio runtime.
    pub fn from_stream<S>(stream: WebSocketStream<S>) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (commands, receive_command) = mpsc::unbounded_channel();
        tokio::spawn(WebDriverHandler::handle(stream, receive_command));
        Self {
            commands,
            next_owner: Arc::new(AtomicU64::new(DRIVER_OWNER.0 + 1)),
            _browser: None,
        }
    }

    /// Starts Firefox with a throwaway profile and connects to its BiDi endpoint.
    /// ## Errors
    /// Returns an error if the browser can not be started or never reports its port.
    pub async fn launch(config: &BrowserConfig) -> crate::Result<Self> {
        let profile = tempfile::tempdir().map_err(crate::Error::TmpDirCreate)?;

        let mut command = tokio::process::Command::new(&config.binary);
        command
            .kill_on_drop(true)
            .arg("--profile")
            .arg(profile.path())
            .args(["--no-remote", "--new-instance", "--remote-debugging-port", "0"]);
        if config.headless {
            command.arg("--headless");
        }
        command
            .args(&config.args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(crate::Error::SpawnBrowser)?;
        let stderr = child.stderr.take().ok_or(crate::Error::PortNotFound)?;
        let mut lines = BufReader::new(stderr).lines();

        let mut port = None;
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(crate::Error::ReadBrowserStderr)?
        {
            debug!(target: "browser", "{line}");
            if let Some(rest) = line.strip_prefix(LISTENING_PREFIX) {
                port = Some(rest.trim().parse::<u16>().map_err(crate::Error::PortDetect)?);
                break;
            }
        }
        let port = port.ok_or(crate::Error::PortNotFound)?;
        info!(port, binary = %config.binary, "browser started");

        tokio::spawn(async move {
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(target: "browser", "{line}");
            }
        });

        let (shutdown, on_shutdown) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _profile = profile;
            tokio::select! {
                status = child.wait() => match status {
                    Ok(status) => debug!(%status, "browser exited"),
                    Err(error) => warn!(%error, "waiting for the browser failed"),
                },
                _ = on_shutdown => {
                    if let Err(error) = child.kill().await {
                        warn!(%error, "failed to kill the browser");
                    }
                }
            }
        });

        let mut driver = Self::connect(&format!("ws://127.0.0.1:{port}/session")).await?;
        driver._browser = Some(Arc::new(BrowserProcess {
            _shutdown: shutdown,
        }));
        Ok(driver)
    }

    /// Connects to `web_socket_url` if configured, else launches `browser`.
    pub async fn from_config(config: &Config) -> crate::Result<Self> {
        match &config.web_socket_url {
            Some(url) => Self::connect(url).await,
            None => Self::launch(&config.browser).await,
        }
    }

    /// Sends a command and waits for its response. Nothing is sent if the command can not
    /// be serialized. There is no timeout, wrap the call in `tokio::time::timeout` if needed.
    pub async fn send_command<C: Command>(&self, command: C) -> crate::Result<C::Result> {
        let value = protocol::command_to_value(&command)?;
        let (sender, receiver) = oneshot::channel();
        self.send(SendCommand::Command(value, sender))?;
        let result = receiver
            .await
            .map_err(|_| crate::Error::ConnectionClosed)??;
        Ok(serde_path_to_error::deserialize(result)?)
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-session-new>
    pub async fn session_new(
        &self,
        capabilities: session::CapabilitiesRequest,
    ) -> crate::Result<session::new::Result> {
        let result = self
            .send_command(session::new::Command {
                params: session::new::Parameters { capabilities },
            })
            .await?;
        info!(
            session = %result.session_id,
            browser = %result.capabilities.browser_name,
            version = %result.capabilities.browser_version,
            "session created"
        );
        Ok(result)
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-session-end>
    pub async fn session_end(&self) -> crate::Result<()> {
        self.send_command(session::end::Command {
            params: EmptyParams {},
        })
        .await?;
        Ok(())
    }

    /// <https://w3c.github.io/webdriver-bidi/#command-session-status>
    pub async fn session_status(&self) -> crate::Result<session::status::Result> {
        self.send_command(session::status::Command {
            params: EmptyParams {},
        })
        .await
    }

    /// Registers a listener that is not bound to a module.
    pub async fn on(&self, listener: Listener) -> crate::Result<ListenerId> {
        self.add_listener(DRIVER_OWNER, listener).await
    }

    pub async fn off(&self, listener: ListenerId) -> crate::Result<()> {
        self.remove_listener(listener).await
    }

    /// Closes the connection. Pending commands fail with [`crate::Error::ConnectionClosed`].
    pub async fn close(&self) -> crate::Result<()> {
        let (sender, receiver) = oneshot::channel();
        if self.send(SendCommand::Close(sender)).is_err() {
            return Ok(());
        }
        if receiver.await.is_err() {
            debug!("connection was already closed");
        }
        Ok(())
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    pub(crate) fn new_owner(&self) -> OwnerId {
        OwnerId(self.next_owner.fetch_add(1, Ordering::Relaxed))
    }

    /// The listener is registered before subscribing so no event in between is lost. If
    /// another listener already subscribed the same event and is still waiting for the
    /// answer, this waits for that answer too. Any failure removes the listener again.
    pub(crate) async fn add_listener(
        &self,
        owner: OwnerId,
        listener: Listener,
    ) -> crate::Result<ListenerId> {
        let (sender, receiver) = oneshot::channel();
        self.send(SendCommand::AddListener(owner, listener, sender))?;
        let added = receiver
            .await
            .map_err(|_| crate::Error::ConnectionClosed)?;

        if let Err(error) = self.subscribe(added.requests).await {
            self.roll_back(added.id).await;
            return Err(error);
        }
        for waiting in added.waiting {
            let outcome = match waiting.await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(reason)) => Err(SubscriptionError::SubscribeFailed(reason).into()),
                Err(_) => Err(crate::Error::ConnectionClosed),
            };
            if let Err(error) = outcome {
                self.roll_back(added.id).await;
                return Err(error);
            }
        }
        Ok(added.id)
    }

    /// Sends the requests in order. The first failure settles its keys and those of every
    /// request not sent yet as failed.
    async fn subscribe(&self, requests: Vec<session::SubscriptionRequest>) -> crate::Result<()> {
        let mut requests = requests.into_iter();
        while let Some(request) = requests.next() {
            let mut keys = subscription::keys_of(&request);
            match self
                .send_command(session::subscribe::Command { params: request })
                .await
            {
                Ok(_) => self.settle(keys, Ok(())).await?,
                Err(error) => {
                    keys.extend(requests.flat_map(|request| subscription::keys_of(&request)));
                    if let Err(settle_error) = self.settle(keys, Err(error.to_string())).await {
                        debug!(%settle_error, "could not record the failed subscription");
                    }
                    return Err(error);
                }
            }
        }
        Ok(())
    }

    async fn settle(
        &self,
        keys: Vec<SubscriptionKey>,
        outcome: SubscribeOutcome,
    ) -> crate::Result<()> {
        let (sender, receiver) = oneshot::channel();
        self.send(SendCommand::SettleSubscription(keys, outcome, sender))?;
        let stale = receiver
            .await
            .map_err(|_| crate::Error::ConnectionClosed)?;
        self.unsubscribe(stale).await
    }

    async fn roll_back(&self, listener: ListenerId) {
        if let Err(error) = self.remove_listener(listener).await {
            debug!(listener = listener.0, %error, "rolling back the listener failed");
        }
    }

    pub(crate) async fn remove_listener(&self, listener: ListenerId) -> crate::Result<()> {
        let (sender, receiver) = oneshot::channel();
        self.send(SendCommand::RemoveListener(listener, sender))?;
        let requests = receiver
            .await
            .map_err(|_| crate::Error::ConnectionClosed)??;
        self.unsubscribe(requests).await
    }

    pub(crate) async fn remove_owner(&self, owner: OwnerId) -> crate::Result<()> {
        let (sender, receiver) = oneshot::channel();
        self.send(SendCommand::RemoveOwner(owner, sender))?;
        let requests = receiver
            .await
            .map_err(|_| crate::Error::ConnectionClosed)?;
        self.unsubscribe(requests).await
    }

    async fn unsubscribe(&self, requests: Vec<session::SubscriptionRequest>) -> crate::Result<()> {
        for request in requests {
            self.send_command(session::unsubscribe::Command { params: request })
                .await?;
        }
        Ok(())
    }

    fn send(&self, command: SendCommand) -> crate::Result<()> {
        self.commands
            .send(command)
            .map_err(|_| crate::Error::ConnectionClosed)
    }
}
