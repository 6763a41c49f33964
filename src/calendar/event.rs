use chrono::NaiveDate;
use thiserror::Error;

use crate::calendar::datetime::IcalDateTime;
use crate::calendar::parser::RawVEvent;
use crate::calendar::recurrence::{self, RecurrenceError};
use crate::domain::CalendarEvent;
use crate::normalizer::sanitize::truncate_chars;

pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const DEFAULT_TITLE: &str = "Untitled Event";

/// Why a VEVENT was dropped instead of being evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("event has no DTSTART")]
    MissingStart,

    #[error("malformed timestamp {0:?}")]
    MalformedTimestamp(String),

    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),
}

/// Resolve one VEVENT against `day`.
///
/// Returns `Ok(None)` when the event simply does not fall on that day.
pub fn resolve_event(
    raw: &RawVEvent,
    source: &str,
    day: NaiveDate,
) -> Result<Option<CalendarEvent>, EventError> {
    let dtstart = raw
        .get("DTSTART")
        .filter(|v| !v.is_empty())
        .ok_or(EventError::MissingStart)?;
    let start = IcalDateTime::parse(dtstart)
        .ok_or_else(|| EventError::MalformedTimestamp(dtstart.to_string()))?;
    let end = raw
        .get("DTEND")
        .and_then(IcalDateTime::parse)
        .map(|end| end.to_naive());

    let (start_time, end_time) = match raw.get("RRULE").filter(|rule| !rule.is_empty()) {
        Some(rule) => {
            if raw.contains("EXDATE") {
                return Err(RecurrenceError::Unsupported("EXDATE".to_string()).into());
            }
            if !recurrence::evaluate(start.to_naive(), rule, day)? {
                return Ok(None);
            }
            recurrence::project(start.to_naive(), end, day)
        }
        None => {
            if start.date() != day {
                return Ok(None);
            }
            (start.to_naive(), end)
        }
    };

    let title = raw
        .get("SUMMARY")
        .unwrap_or(DEFAULT_TITLE)
        .replace("\\,", ",")
        .replace("\\;", ";");
    let description = raw
        .get("DESCRIPTION")
        .unwrap_or_default()
        .replace("\\n", " ")
        .replace("\\,", ",");
    let description = truncate_chars(description.trim(), DESCRIPTION_MAX_CHARS);

    Ok(Some(CalendarEvent::new(
        title,
        start_time,
        end_time,
        description,
        source,
        start.is_all_day(),
    )))
}
