//! Plain-text export of the filtered log view.

use anyhow::Context;
use chrono::NaiveDateTime;
use logdeck_shared::LogEvent;
use std::path::Path;

/// `timestamp [LEVEL] [module] message`
pub fn format_line(event: &LogEvent) -> String {
    format!(
        "{} [{}] [{}] {}",
        event.timestamp, event.level, event.module, event.message
    )
}

/// One line per event, in the given order, newline-terminated.
pub fn export_text<E: AsRef<LogEvent>>(events: &[E]) -> String {
    let mut out = String::new();
    for event in events {
        out.push_str(&format_line(event.as_ref()));
        out.push('\n');
    }
    out
}

pub fn export_file_name(now: NaiveDateTime) -> String {
    format!("logdeck-{}.log", now.format("%Y%m%d-%H%M%S"))
}

/// Write the export to `path`, creating parent directories.
pub fn write_export<E: AsRef<LogEvent>>(path: &Path, events: &[E]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating export directory {}", parent.display()))?;
    }
    std::fs::write(path, export_text(events))
        .with_context(|| format!("writing log export to {}", path.display()))?;
    crate::log_info!("Exported {} log lines to {}", events.len(), path.display());
    Ok(())
}
