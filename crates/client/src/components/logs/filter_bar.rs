//! Filter controls for the log viewer.

use chrono::NaiveDate;
use dioxus::prelude::*;
use logdeck_shared::LogLevel;

use crate::view::LogFilter;

const INPUT_STYLE: &str = "background: #1e1f22; color: #dbdee1; border: 1px solid #3f4147; \
                           border-radius: 4px; padding: 4px 8px; font-size: 13px;";

#[derive(Props, Clone, PartialEq)]
pub struct FilterBarProps {
    pub filter: LogFilter,
    /// Modules offered in the module selector.
    pub modules: Vec<String>,
    pub on_change: EventHandler<LogFilter>,
}

#[component]
pub fn FilterBar(props: FilterBarProps) -> Element {
    let filter = props.filter.clone();
    let level_value = filter.level.map(|l| l.as_str()).unwrap_or("");
    let module_value = filter.module.clone().unwrap_or_default();
    let from_value = date_value(filter.date_from);
    let to_value = date_value(filter.date_to);

    rsx! {
        div { style: "display: flex; flex-wrap: wrap; gap: 8px; align-items: center;",
            input {
                style: INPUT_STYLE,
                r#type: "search",
                placeholder: "Search message or module",
                value: "{filter.text}",
                oninput: {
                    let filter = filter.clone();
                    move |evt: FormEvent| {
                        props.on_change.call(LogFilter { text: evt.value(), ..filter.clone() });
                    }
                },
            }

            select {
                style: INPUT_STYLE,
                value: "{level_value}",
                onchange: {
                    let filter = filter.clone();
                    move |evt: FormEvent| {
                        let level = evt.value().parse::<LogLevel>().ok();
                        props.on_change.call(LogFilter { level, ..filter.clone() });
                    }
                },
                option { value: "", "All levels" }
                for level in LogLevel::ALL {
                    option { value: "{level}", selected: filter.level == Some(level), "{level}" }
                }
            }

            select {
                style: INPUT_STYLE,
                value: "{module_value}",
                onchange: {
                    let filter = filter.clone();
                    move |evt: FormEvent| {
                        let value = evt.value();
                        let module = (!value.is_empty()).then_some(value);
                        props.on_change.call(LogFilter { module, ..filter.clone() });
                    }
                },
                option { value: "", "All modules" }
                for module in props.modules.iter() {
                    option {
                        value: "{module}",
                        selected: filter.module.as_deref() == Some(module.as_str()),
                        "{module}"
                    }
                }
            }

            input {
                style: INPUT_STYLE,
                r#type: "date",
                value: "{from_value}",
                onchange: {
                    let filter = filter.clone();
                    move |evt: FormEvent| {
                        let date_from = parse_date(&evt.value());
                        props.on_change.call(LogFilter { date_from, ..filter.clone() });
                    }
                },
            }
            span { style: "color: #6b7280;", "to" }
            input {
                style: INPUT_STYLE,
                r#type: "date",
                value: "{to_value}",
                onchange: {
                    let filter = filter.clone();
                    move |evt: FormEvent| {
                        let date_to = parse_date(&evt.value());
                        props.on_change.call(LogFilter { date_to, ..filter.clone() });
                    }
                },
            }

            if !filter.is_empty() {
                button {
                    style: INPUT_STYLE,
                    onclick: move |_| props.on_change.call(LogFilter::default()),
                    "Reset"
                }
            }
        }
    }
}

fn date_value(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
