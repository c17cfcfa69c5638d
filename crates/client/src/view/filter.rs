//! Filter predicate over log events.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use logdeck_shared::{LogEvent, LogLevel};

/// User-controlled filter parameters. `None` fields mean "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Case-insensitive substring of the message or module.
    pub text: String,
    pub level: Option<LogLevel>,
    pub module: Option<String>,
    /// Inclusive from the start of this day.
    pub date_from: Option<NaiveDate>,
    /// Inclusive until the end of this day.
    pub date_to: Option<NaiveDate>,
}

impl LogFilter {
    pub fn is_empty(&self) -> bool {
        *self == LogFilter::default()
    }

    pub fn matches(&self, event: &LogEvent) -> bool {
        self.matches_text(event)
            && self.level.map_or(true, |level| event.level == level)
            && self.module.as_deref().map_or(true, |module| event.module == module)
            && self.matches_dates(event)
    }

    /// Matching events in source order.
    pub fn apply<E>(&self, events: &[E]) -> Vec<E>
    where
        E: AsRef<LogEvent> + Clone,
    {
        events
            .iter()
            .filter(|e| self.matches(e.as_ref()))
            .cloned()
            .collect()
    }

    fn matches_text(&self, event: &LogEvent) -> bool {
        if self.text.is_empty() {
            return true;
        }
        let needle = self.text.to_lowercase();
        event.message.to_lowercase().contains(&needle)
            || event.module.to_lowercase().contains(&needle)
    }

    fn matches_dates(&self, event: &LogEvent) -> bool {
        if self.date_from.is_none() && self.date_to.is_none() {
            return true;
        }
        let Some(at) = parse_timestamp(&event.timestamp) else {
            return false;
        };
        let after_start = self
            .date_from
            .map_or(true, |day| at >= day.and_time(NaiveTime::MIN));
        let before_end = self.date_to.map_or(true, |day| at <= end_of_day(day));
        after_start && before_end
    }
}

fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    // 23:59:59.999 always exists
    day.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| day.and_time(NaiveTime::MIN))
}

/// Parse a server timestamp into wall-clock time.
///
/// Accepts RFC 3339 (kept in its own offset) and `YYYY-MM-DD HH:MM:SS[.f]`
/// with either a space or `T` separator.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.naive_local());
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn event(id: &str, ts: &str, level: LogLevel, module: &str, message: &str) -> Arc<LogEvent> {
        Arc::new(LogEvent::new(id, ts, level, module, message))
    }

    fn ids(events: &[Arc<LogEvent>]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    fn sample() -> Vec<Arc<LogEvent>> {
        vec![
            event("1", "2024-05-01 08:00:00", LogLevel::Info, "core", "Bot started"),
            event("2", "2024-05-01 09:30:00", LogLevel::Error, "platform.qq", "Socket closed"),
            event("3", "2024-05-02 00:00:00", LogLevel::Info, "plugins", "Loaded 4 plugins"),
            event("4", "2024-05-03T23:59:59.500", LogLevel::Critical, "core", "Out of memory"),
        ]
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let events = sample();
        assert!(LogFilter::default().is_empty());
        assert_eq!(ids(&LogFilter::default().apply(&events)), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn level_filter_keeps_order() {
        let filter = LogFilter {
            level: Some(LogLevel::Info),
            ..LogFilter::default()
        };
        assert_eq!(ids(&filter.apply(&sample())), vec!["1", "3"]);
    }

    #[test]
    fn text_matches_message_or_module_case_insensitively() {
        let events = sample();
        let filter = LogFilter {
            text: "SOCKET".into(),
            ..LogFilter::default()
        };
        assert_eq!(ids(&filter.apply(&events)), vec!["2"]);

        let filter = LogFilter {
            text: "Plat".into(),
            ..LogFilter::default()
        };
        assert_eq!(ids(&filter.apply(&events)), vec!["2"]);
    }

    #[test]
    fn text_is_matched_verbatim() {
        let events = sample();
        let filter = LogFilter {
            text: " closed".into(),
            ..LogFilter::default()
        };
        assert_eq!(ids(&filter.apply(&events)), vec!["2"]);

        let filter = LogFilter {
            text: "started ".into(),
            ..LogFilter::default()
        };
        assert!(filter.apply(&events).is_empty());

        let filter = LogFilter {
            text: " ".into(),
            ..LogFilter::default()
        };
        assert!(!filter.is_empty());
        assert_eq!(ids(&filter.apply(&events)), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn module_must_match_exactly() {
        let filter = LogFilter {
            module: Some("core".into()),
            ..LogFilter::default()
        };
        assert_eq!(ids(&filter.apply(&sample())), vec!["1", "4"]);

        let filter = LogFilter {
            module: Some("cor".into()),
            ..LogFilter::default()
        };
        assert!(filter.apply(&sample()).is_empty());
    }

    #[test]
    fn date_bounds_cover_whole_days() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
        let filter = LogFilter {
            date_from: Some(day(2)),
            date_to: Some(day(3)),
            ..LogFilter::default()
        };
        assert_eq!(ids(&filter.apply(&sample())), vec!["3", "4"]);

        let filter = LogFilter {
            date_to: Some(day(1)),
            ..LogFilter::default()
        };
        assert_eq!(ids(&filter.apply(&sample())), vec!["1", "2"]);
    }

    #[test]
    fn unparseable_timestamp_fails_date_bounds_only() {
        let events = vec![event("x", "yesterday-ish", LogLevel::Info, "core", "hi")];
        assert_eq!(LogFilter::default().apply(&events).len(), 1);
        let filter = LogFilter {
            date_from: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..LogFilter::default()
        };
        assert!(filter.apply(&events).is_empty());
    }

    #[test]
    fn predicates_combine() {
        let filter = LogFilter {
            text: "o".into(),
            level: Some(LogLevel::Critical),
            module: Some("core".into()),
            ..LogFilter::default()
        };
        assert_eq!(ids(&filter.apply(&sample())), vec!["4"]);
    }

    #[test]
    fn filtering_is_repeatable() {
        let events = sample();
        let filter = LogFilter {
            text: "o".into(),
            ..LogFilter::default()
        };
        assert_eq!(filter.apply(&events), filter.apply(&events));
    }

    #[test]
    fn parses_supported_timestamp_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_milli_opt(10, 20, 30, 250)
            .unwrap();
        assert_eq!(parse_timestamp("2024-05-01 10:20:30.250"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T10:20:30.250"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T10:20:30.250+08:00"), Some(expected));
        assert_eq!(parse_timestamp("01/05/2024"), None);
    }
}
