use serde::{Deserialize, Serialize};
use thiserror::Error;

/// <https://w3c.github.io/webdriver-bidi/#errors>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    #[serde(rename = "invalid argument")]
    InvalidArgument,
    #[serde(rename = "invalid selector")]
    InvalidSelector,
    #[serde(rename = "invalid session id")]
    InvalidSessionId,
    #[serde(rename = "move target out of bounds")]
    MoveTargetOutOfBounds,
    #[serde(rename = "no such alert")]
    NoSuchAlert,
    #[serde(rename = "no such element")]
    NoSuchElement,
    #[serde(rename = "no such frame")]
    NoSuchFrame,
    #[serde(rename = "no such handle")]
    NoSuchHandle,
    #[serde(rename = "no such history entry")]
    NoSuchHistoryEntry,
    #[serde(rename = "no such intercept")]
    NoSuchIntercept,
    #[serde(rename = "no such node")]
    NoSuchNode,
    #[serde(rename = "no such request")]
    NoSuchRequest,
    #[serde(rename = "no such script")]
    NoSuchScript,
    #[serde(rename = "no such storage partition")]
    NoSuchStoragePartition,
    #[serde(rename = "no such user context")]
    NoSuchUserContext,
    #[serde(rename = "session not created")]
    SessionNotCreated,
    #[serde(rename = "unable to capture screen")]
    UnableToCaptureScreen,
    #[serde(rename = "unable to close browser")]
    UnableToCloseBrowser,
    #[serde(rename = "unable to set cookie")]
    UnableToSetCookie,
    #[serde(rename = "unable to set file input")]
    UnableToSetFileInput,
    #[serde(rename = "underspecified storage partition")]
    UnderspecifiedStoragePartition,
    #[serde(rename = "unexpected alert open")]
    UnexpectedAlertOpen,
    #[serde(rename = "unknown command")]
    UnknownCommand,
    #[serde(rename = "unknown error")]
    UnknownError,
    #[serde(rename = "unsupported operation")]
    UnsupportedOperation,
    #[serde(untagged)]
    Other(String),
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(code)) => f.write_str(&code),
            _ => f.write_str("unknown error"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SubscriptionError {
    #[error("listener {0} is not registered (already unsubscribed?)")]
    UnknownListener(u64),
    #[error("the module was closed, no new listeners can be registered")]
    ModuleClosed,
    /// Another listener's `session.subscribe` for the same event failed.
    #[error("subscribing failed: {0}")]
    SubscribeFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The connection failed. Every in-flight command sees this.
    Transport,
    /// The remote end answered a single command with an error.
    Protocol,
    /// A local encode or decode failure. Nothing was sent.
    Codec,
    Subscription,
    Launch,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("WebSocket connection failure {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("the connection to the remote end is closed")]
    ConnectionClosed,
    #[error("remote end returned error `{error}`: {message}")]
    Protocol {
        error: ErrorCode,
        message: String,
        stacktrace: Option<String>,
    },
    #[error("failed to decode received value {0}")]
    Decode(serde_path_to_error::Error<serde_json::Error>),
    #[error("failed to serialize command {0}")]
    Serialize(serde_json::Error),
    #[error("unsupported argument: {0}")]
    UnsupportedArgument(String),
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),
    #[error("failed to find element with locator {0}")]
    ElementNotFound(String),
    #[error("Failed to create temporary directory {0}")]
    TmpDirCreate(std::io::Error),
    #[error("Failed to spawn browser {0}")]
    SpawnBrowser(std::io::Error),
    #[error("Failed to read browser's stderr {0}")]
    ReadBrowserStderr(std::io::Error),
    #[error("failed to detect WebDriver BiDi port {0}")]
    PortDetect(std::num::ParseIntError),
    #[error("failed to find WebDriver BiDi port")]
    PortNotFound,
    #[error("failed to load configuration {0:?}")]
    Config(#[from] webdriver_bidi_config::ConfigError),
}

impl Error {
    /// Builds a protocol error locally, for conditions the client can detect without asking the
    /// remote end.
    pub fn protocol(error: ErrorCode, message: impl Into<String>) -> Self {
        Self::Protocol {
            error,
            message: message.into(),
            stacktrace: None,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::WebSocket(_) | Self::ConnectionClosed => ErrorKind::Transport,
            Self::Protocol { .. } | Self::ElementNotFound(_) => ErrorKind::Protocol,
            Self::Decode(_) | Self::Serialize(_) | Self::UnsupportedArgument(_) => ErrorKind::Codec,
            Self::Subscription(_) => ErrorKind::Subscription,
            Self::TmpDirCreate(_)
            | Self::SpawnBrowser(_)
            | Self::ReadBrowserStderr(_)
            | Self::PortDetect(_)
            | Self::PortNotFound
            | Self::Config(_) => ErrorKind::Launch,
        }
    }

    /// Only transport failures are worth retrying; protocol errors will repeat.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport)
    }

    #[must_use]
    pub const fn code(&self) -> Option<&ErrorCode> {
        match self {
            Self::Protocol { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for Error {
    fn from(value: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Self::Decode(value)
    }
}

pub type Result<T> = core::result::Result<T, Error>;
