use core::fmt::{Debug, Display};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "webdriver-bidi.toml";
pub const ENV_PREFIX: &str = "WEBDRIVER_BIDI_";

/// How to start a browser when no existing remote end is configured.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Executable to spawn. Only Firefox prints its BiDi endpoint on stderr.
    pub binary: String,
    pub args: Vec<String>,
    pub headless: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            binary: "firefox".to_owned(),
            args: Vec::new(),
            headless: true,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// e.g. `ws://127.0.0.1:9222/session`. Takes precedence over `browser`.
    pub web_socket_url: Option<String>,
    pub browser: BrowserConfig,
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        Self::Figment(Box::new(value))
    }
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[must_use]
pub fn figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

pub fn get_config() -> Result<Config, ConfigError> {
    Ok(figment().extract()?)
}
