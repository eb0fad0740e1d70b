//! A [WebDriver BiDi](https://w3c.github.io/webdriver-bidi) client.
//!
//! One [`WebDriver`] owns the connection. Domain modules such as
//! [`browsing_context::BrowsingContextModule`] or [`script::ScriptModule`] are built on top
//! of a clone of it and each keep their own event listeners.

pub mod browser;
pub mod browsing_context;
pub mod classic;
pub mod error;
pub mod event;
pub mod input;
pub mod log;
pub mod network;
pub mod protocol;
pub mod script;
pub mod session;
pub mod storage;
pub mod subscription;
pub mod webdriver;
mod webdriver_handler;

pub use crate::error::{Error, ErrorCode, ErrorKind, Result, SubscriptionError};
pub use crate::event::EventData;
pub use crate::webdriver::WebDriver;
