use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A calendar event as it occurs on the day it was resolved for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
    pub source: String,
    pub is_all_day: bool,
}

impl CalendarEvent {
    /// Build an event from naive timestamps. A missing end collapses onto
    /// the start.
    pub fn new(
        title: String,
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
        description: String,
        source: &str,
        is_all_day: bool,
    ) -> Self {
        let start_time = format_iso(start);
        let end_time = end.map(format_iso).unwrap_or_else(|| start_time.clone());
        Self {
            title,
            start_time,
            end_time,
            description,
            source: source.to_string(),
            is_all_day,
        }
    }
}

pub fn format_iso(dt: NaiveDateTime) -> String {
    dt.format(ISO_FORMAT).to_string()
}
