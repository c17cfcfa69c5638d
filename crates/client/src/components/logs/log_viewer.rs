//! Live log viewer - filtered, windowed rendering of the log stream.

use dioxus::prelude::*;
use futures_channel::mpsc::UnboundedReceiver;
use futures_util::StreamExt;
use logdeck_shared::LogLevel;
use std::rc::Rc;

use super::{ConnectionIndicator, FilterBar};
use crate::log_stream::LogStream;
use crate::settings::SharedSettings;
use crate::storage::Storage;
use crate::view::{export_file_name, write_export, LogFilter, LogView};
use crate::ws::ConnectionState;

const VIEWPORT_ID: &str = "log-viewport";
const DEFAULT_VIEWPORT_HEIGHT: f64 = 600.0;

/// Services the viewer needs, provided once by the app root.
#[derive(Clone)]
pub struct LogStreamContext {
    pub stream: LogStream,
    pub settings: SharedSettings,
    pub storage: Storage,
}

/// Store notifications forwarded into the UI task.
enum UiUpdate {
    Events,
    Connection(ConnectionState),
}

#[component]
pub fn LogViewer() -> Element {
    let ctx = use_context::<LogStreamContext>();
    let mut view = use_signal(|| LogView::new(&ctx.settings.snapshot()));
    let mut connection = use_signal(|| ctx.stream.connection_state());
    let mut modules = use_signal(Vec::<String>::new);
    let mut viewport_height = use_signal(|| DEFAULT_VIEWPORT_HEIGHT);
    let mut status = use_signal(|| None::<String>);

    // Store callbacks fire on the connection task; the coroutine applies
    // them on the UI side, coalescing bursts into one refresh.
    let bridge = use_coroutine({
        let ctx = ctx.clone();
        move |mut rx: UnboundedReceiver<UiUpdate>| {
            let ctx = ctx.clone();
            async move {
                while let Some(update) = rx.next().await {
                    let mut dirty = false;
                    let mut pending = Some(update);
                    while let Some(update) = pending.take() {
                        match update {
                            UiUpdate::Events => dirty = true,
                            UiUpdate::Connection(state) => connection.set(state),
                        }
                        pending = rx.try_next().ok().flatten();
                    }
                    if !dirty {
                        continue;
                    }
                    let settings = ctx.settings.snapshot();
                    let moved = view.write().refresh(
                        ctx.stream.snapshot(),
                        &settings,
                        *viewport_height.peek(),
                    );
                    modules.set(ctx.stream.store().modules());
                    if moved {
                        scroll_viewport_to(view.peek().scroll().offset);
                    }
                }
            }
        }
    });

    // Held for the lifetime of the component; dropping unsubscribes.
    let _subscriptions = use_hook(|| {
        let events_tx = bridge.tx();
        let state_tx = bridge.tx();
        let on_event = ctx.stream.on_event(move |_| {
            let _ = events_tx.unbounded_send(UiUpdate::Events);
        });
        let on_state = ctx.stream.on_connection_change(move |state| {
            let _ = state_tx.unbounded_send(UiUpdate::Connection(*state));
        });
        bridge.send(UiUpdate::Events);
        Rc::new((on_event, on_state))
    });

    let layout = view.read().layout();
    let total_height = layout.total_height;
    let row_height = layout.row_height;
    let rows: Vec<_> = view
        .read()
        .visible()
        .into_iter()
        .map(|(row, event)| (row.offset, level_color(event.level), event))
        .collect();
    let filter = view.read().filter().clone();
    let auto_scroll = view.read().scroll().auto_scroll;
    let shown = view.read().filtered().len();
    let state = connection();

    let on_filter = move |filter: LogFilter| {
        if view.write().set_filter(filter) || !view.peek().scroll().auto_scroll {
            scroll_viewport_to(view.peek().scroll().offset);
        }
    };

    let mut resize_viewport = move |height: f64| {
        viewport_height.set(height);
        if view.write().set_viewport_height(height) {
            scroll_viewport_to(view.peek().scroll().offset);
        }
    };

    let toggle_connection = {
        let stream = ctx.stream.clone();
        move |_| {
            if state == ConnectionState::Disconnected {
                stream.connect();
            } else {
                stream.disconnect();
            }
        }
    };

    let clear = {
        let stream = ctx.stream.clone();
        move |_| {
            stream.clear();
            bridge.send(UiUpdate::Events);
        }
    };

    let export = {
        let storage = ctx.storage.clone();
        move |_| {
            let name = export_file_name(chrono::Local::now().naive_local());
            let dir = dirs::download_dir().unwrap_or_else(|| storage.dir().to_path_buf());
            let path = dir.join(name);
            match write_export(&path, view.peek().filtered()) {
                Ok(()) => status.set(Some(format!("Exported to {}", path.display()))),
                Err(e) => {
                    crate::log_error!("Log export failed: {:#}", e);
                    status.set(Some(format!("Export failed: {e}")));
                }
            }
        }
    };

    rsx! {
        div { style: "display: flex; flex-direction: column; height: 100vh; background: #313338; color: #dbdee1; font-family: monospace;",
            // Toolbar
            div { style: "display: flex; gap: 12px; align-items: center; padding: 8px 12px; border-bottom: 1px solid #232428;",
                ConnectionIndicator { state }
                button {
                    onclick: toggle_connection,
                    if state == ConnectionState::Disconnected { "Connect" } else { "Disconnect" }
                }
                button { onclick: clear, "Clear" }
                button { onclick: export, "Export" }
                label { style: "font-size: 12px;",
                    input {
                        r#type: "checkbox",
                        checked: auto_scroll,
                        onchange: move |evt: FormEvent| view.write().set_auto_scroll(evt.checked()),
                    }
                    " Auto-scroll"
                }
                span { style: "margin-left: auto; font-size: 12px; color: #9ca3af;", "{shown} entries" }
            }

            div { style: "padding: 8px 12px;",
                FilterBar { filter, modules: modules(), on_change: on_filter }
            }

            if let Some(message) = status() {
                div { style: "padding: 0 12px 8px; font-size: 12px; color: #9ca3af;", "{message}" }
            }

            // Only the rows of the computed window are in the DOM.
            div {
                id: VIEWPORT_ID,
                style: "flex: 1; overflow-y: auto; position: relative;",
                onmounted: move |evt| async move {
                    if let Ok(rect) = evt.data().get_client_rect().await {
                        resize_viewport(rect.size.height);
                    }
                },
                onresize: move |evt| {
                    if let Ok(size) = evt.data().get_content_box_size() {
                        resize_viewport(size.height);
                    }
                },
                onscroll: move |evt| {
                    view.write().scroll_to(evt.data().scroll_top() as f64);
                },
                div { style: "position: relative; height: {total_height}px;",
                    for (top, color, event) in rows {
                        div {
                            key: "{event.id}",
                            style: "position: absolute; top: {top}px; left: 0; right: 0; height: {row_height}px; line-height: {row_height}px; padding: 0 12px; white-space: nowrap; overflow: hidden; text-overflow: ellipsis;",
                            span { style: "color: #6b7280;", "{event.timestamp} " }
                            span { style: "color: {color};", "[{event.level}] " }
                            span { style: "color: #a5b4fc;", "[{event.module}] " }
                            "{event.message}"
                        }
                    }
                }
            }
        }
    }
}

fn level_color(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "#6b7280",
        LogLevel::Info => "#22c55e",
        LogLevel::Warning => "#eab308",
        LogLevel::Error => "#ef4444",
        LogLevel::Critical => "#d946ef",
    }
}

fn scroll_viewport_to(offset: f64) {
    let _ = document::eval(&format!(
        "const el = document.getElementById('{VIEWPORT_ID}'); if (el) {{ el.scrollTop = {offset}; }}"
    ));
}
