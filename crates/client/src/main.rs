//! LogDeck - desktop live log viewer

#![allow(non_snake_case)]

use anyhow::Context;
use dioxus::prelude::*;
use logdeck_client::components::{LogStreamContext, LogViewer};
use logdeck_client::logging::init_tracing;
use logdeck_client::{Environment, LogStream, SharedSettings, Storage};
use std::sync::Arc;

fn main() {
    init_tracing("logdeck_client=debug");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let context = use_hook(|| match build_context() {
        Ok(context) => Some(context),
        Err(e) => {
            logdeck_client::log_error!("Failed to start log stream: {:#}", e);
            None
        }
    });

    match context {
        Some(context) => rsx! { LogStreamRoot { context } },
        None => rsx! {
            div { style: "padding: 24px; font-family: sans-serif;",
                "Could not start the log stream. Check LOGDECK_SERVER_URL and the log output."
            }
        },
    }
}

#[derive(Props, Clone)]
struct LogStreamRootProps {
    context: LogStreamContext,
}

impl PartialEq for LogStreamRootProps {
    fn eq(&self, _other: &Self) -> bool {
        // built once by `App`
        true
    }
}

#[component]
fn LogStreamRoot(props: LogStreamRootProps) -> Element {
    let context = use_context_provider(|| props.context.clone());
    use_hook(|| context.stream.connect());

    rsx! { LogViewer {} }
}

fn build_context() -> anyhow::Result<LogStreamContext> {
    let storage = Storage::default_location().context("no configuration directory available")?;
    let settings = SharedSettings::load(&storage);
    let url = Environment::from_env().log_stream_url()?;
    logdeck_client::log_info!("Streaming logs from {}", url);

    let stream = LogStream::new(url.as_str(), Arc::new(settings.clone()));
    Ok(LogStreamContext {
        stream,
        settings,
        storage,
    })
}
