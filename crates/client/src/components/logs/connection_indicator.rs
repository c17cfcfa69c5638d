//! Connection indicator - shows a colored dot for the live-log connection.

use dioxus::prelude::*;

use crate::ws::ConnectionState;

#[derive(Props, Clone, PartialEq)]
pub struct ConnectionIndicatorProps {
    pub state: ConnectionState,
}

#[component]
pub fn ConnectionIndicator(props: ConnectionIndicatorProps) -> Element {
    let state = props.state;
    let (color, label) = if state.is_connected() {
        ("#22c55e", "Connected")
    } else if state.is_connecting() {
        ("#eab308", "Connecting...")
    } else {
        ("#6b7280", "Disconnected")
    };

    rsx! {
        span { style: "display: inline-flex; align-items: center; gap: 6px;",
            span {
                style: "width: 10px; height: 10px; border-radius: 9999px; background: {color};",
                title: "{label}",
            }
            span { style: "font-size: 12px; color: #9ca3af;", "{label}" }
        }
    }
}
