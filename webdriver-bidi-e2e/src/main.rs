//! Drives a real browser through the client: locate then click through the classic bridge,
//! sandbox isolation, preload scripts, cookies and concurrent evaluation.
//!
//! `cargo run --bin webdriver-bidi-e2e`, configured like every other consumer via
//! `webdriver-bidi.toml` or `WEBDRIVER_BIDI_*`.

use futures_util::future::try_join_all;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng as _};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use webdriver_bidi::browsing_context::{
    BrowsingContext, BrowsingContextModule, CreateOptions, CreateType, Locator, ReadinessState,
};
use webdriver_bidi::classic::WebElementReference;
use webdriver_bidi::input::perform_actions::PointerType;
use webdriver_bidi::input::{InputModule, PointerActions};
use webdriver_bidi::network::BytesValue;
use webdriver_bidi::script::{
    CallFunctionOptions, Channel, ChannelProperties, ChannelValue, EvaluateOptions,
    EvaluateResult, LocalValue, RemoteValue, ScriptModule,
};
use webdriver_bidi::session::CapabilitiesRequest;
use webdriver_bidi::storage::{CookieFilter, PartialCookie, StorageModule};
use webdriver_bidi::WebDriver;

const PAGE: &str = "data:text/html,<button onclick=\"window.clicked = true\">Click</button>";

#[tokio::main]
async fn main() -> Result<(), webdriver_bidi::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = webdriver_bidi_config::get_config()?;
    let driver = WebDriver::from_config(&config).await?;
    driver.session_new(CapabilitiesRequest::default()).await?;

    let result = run(&driver).await;
    if let Err(error) = &result {
        error!(%error, "e2e run failed");
    }
    driver.session_end().await?;
    driver.close().await?;
    result
}

fn expect_string(result: &EvaluateResult) -> Option<&str> {
    result.result().and_then(RemoteValue::as_str)
}

fn check(condition: bool, what: &str) -> Result<(), webdriver_bidi::Error> {
    if condition {
        info!("ok: {what}");
        Ok(())
    } else {
        Err(webdriver_bidi::Error::UnsupportedArgument(format!(
            "check failed: {what}"
        )))
    }
}

async fn run(driver: &WebDriver) -> Result<(), webdriver_bidi::Error> {
    let contexts = BrowsingContextModule::new(driver.clone());
    let script = ScriptModule::new(driver.clone());
    let input = InputModule::new(driver.clone());

    contexts.track_lifecycle().await?;
    let context = contexts
        .create(CreateType::Tab, CreateOptions::default())
        .await?;

    preload(&script, &contexts, &context).await?;
    contexts
        .navigate(&context, PAGE, ReadinessState::Complete)
        .await?;

    let button = contexts.locate_node(&context, Locator::css("button")).await?;
    let classic = button
        .shared_id
        .clone()
        .map(WebElementReference::from)
        .ok_or_else(|| webdriver_bidi::Error::ElementNotFound("button has no shared id".to_owned()))?;
    info!(element = %classic.to_json(), "classic reference");

    input
        .perform(
            &context,
            vec![PointerActions::new("mouse", PointerType::Mouse)
                .move_to_element(classic.into())
                .click(0)
                .into()],
        )
        .await?;
    input.release(&context).await?;
    let clicked = script
        .evaluate_in_browsing_context(&context, None, "window.clicked === true", false, EvaluateOptions::default())
        .await?;
    check(
        clicked.result() == Some(&RemoteValue::Boolean { value: true }),
        "click reached the page",
    )?;

    sandbox(&script, &context).await?;
    cookies(driver, &context).await?;
    concurrent(&script, &context).await?;

    contexts.close_context(&context, false).await?;
    script.close().await?;
    contexts.close().await
}

async fn preload(
    script: &ScriptModule,
    contexts: &BrowsingContextModule,
    context: &BrowsingContext,
) -> Result<(), webdriver_bidi::Error> {
    let (_, mut messages) = script.message_channel(Some(vec![context.clone()])).await?;
    let first = script
        .add_preload_script("() => { window.order = ['first']; }", None, None, None)
        .await?;
    let second = script
        .add_preload_script(
            "(ready) => { window.order.push('second'); ready(window.order.join(',')); }",
            Some(vec![ChannelValue {
                value: ChannelProperties {
                    channel: Channel("ready".to_owned()),
                    serialization_options: None,
                    ownership: None,
                },
            }]),
            None,
            None,
        )
        .await?;
    contexts
        .navigate(context, "about:blank", ReadinessState::Complete)
        .await?;
    let message = messages.recv().await.ok_or(webdriver_bidi::Error::ConnectionClosed)?;
    check(
        message.data.as_str() == Some("first,second"),
        "preload scripts run in insertion order",
    )?;
    script.remove_preload_script(&first).await?;
    script.remove_preload_script(&second).await
}

async fn sandbox(script: &ScriptModule, context: &BrowsingContext) -> Result<(), webdriver_bidi::Error> {
    let sandbox = Some("e2e".to_owned());
    script
        .call_function_in_browsing_context(
            context,
            sandbox.clone(),
            "(value) => { window.secret = value; }",
            false,
            CallFunctionOptions {
                arguments: Some(vec![LocalValue::string("hidden")]),
                ..CallFunctionOptions::default()
            },
        )
        .await?;
    let page = script
        .evaluate_in_browsing_context(context, None, "typeof window.secret", false, EvaluateOptions::default())
        .await?;
    let isolated = script
        .evaluate_in_browsing_context(context, sandbox, "window.secret", false, EvaluateOptions::default())
        .await?;
    check(expect_string(&page) == Some("undefined"), "page can not see sandbox globals")?;
    check(expect_string(&isolated) == Some("hidden"), "sandbox keeps its globals")
}

async fn cookies(driver: &WebDriver, context: &BrowsingContext) -> Result<(), webdriver_bidi::Error> {
    let storage = StorageModule::new(driver.clone(), context.clone());
    let value: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    let mut cookie = PartialCookie::new("e2e", value.clone(), "localhost");
    cookie.path = Some("/".to_owned());
    storage.set_cookie(cookie, None).await?;
    let found = storage
        .get_cookies(Some(CookieFilter::by_name("e2e")), None)
        .await?;
    check(
        found
            .cookies
            .iter()
            .any(|cookie| cookie.value == BytesValue::String(value.clone())),
        "cookie round trip",
    )?;
    info!(partition = ?found.partition_key, "cookies live in the context partition");
    storage.delete_cookies(Some(CookieFilter::by_name("e2e")), None).await?;
    Ok(())
}

async fn concurrent(script: &ScriptModule, context: &BrowsingContext) -> Result<(), webdriver_bidi::Error> {
    let results = try_join_all((0..20).map(|i| {
        script.evaluate_in_browsing_context(
            context,
            None,
            format!("new Promise((resolve) => setTimeout(() => resolve({i}), {}))", 20 - i),
            true,
            EvaluateOptions::default(),
        )
    }))
    .await?;
    for (i, result) in results.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let expected = i as f64;
        let number = result.result().and_then(RemoteValue::as_number);
        check(
            number.is_some_and(|number| (number.as_f64() - expected).abs() < f64::EPSILON),
            "concurrent evaluations keep their own results",
        )?;
    }
    Ok(())
}
