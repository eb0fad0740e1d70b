//! Launches (or connects to) a browser, prints console output of a page and exits.
//!
//! `WEBDRIVER_BIDI_WEB_SOCKET_URL=ws://127.0.0.1:9222/session cargo run --example basic`

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use webdriver_bidi::browsing_context::{BrowsingContextModule, CreateOptions, CreateType, ReadinessState};
use webdriver_bidi::log::LogInspector;
use webdriver_bidi::session::CapabilitiesRequest;
use webdriver_bidi::WebDriver;

#[tokio::main]
pub async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(error) = inner_main().await {
        warn!(%error, "example failed");
    }
}

pub async fn inner_main() -> Result<(), webdriver_bidi::Error> {
    let config = webdriver_bidi_config::get_config()?;
    let driver = WebDriver::from_config(&config).await?;
    driver.session_new(CapabilitiesRequest::default()).await?;

    let contexts = BrowsingContextModule::new(driver.clone());
    let inspector = LogInspector::new(driver.clone());
    inspector
        .on_console_entry(None, |entry| {
            info!(level = ?entry.level, text = ?entry.text, "console");
        })
        .await?;

    let context = contexts
        .create(CreateType::Tab, CreateOptions::default())
        .await?;
    contexts
        .navigate(
            &context,
            "data:text/html,<script>console.log('hello from the page')</script>",
            ReadinessState::Complete,
        )
        .await?;

    inspector.close().await?;
    contexts.close().await?;
    driver.session_end().await?;
    driver.close().await
}
