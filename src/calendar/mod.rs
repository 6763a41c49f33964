//! iCalendar reading: VEVENT extraction, timestamps, recurrence and
//! projection of events onto a single day.

pub mod datetime;
pub mod event;
pub mod parser;
pub mod recurrence;

pub use datetime::IcalDateTime;
pub use event::{resolve_event, EventError};
pub use parser::{parse_vevents, RawVEvent, VEventParser};
pub use recurrence::{occurs_on, RecurrenceError, RecurrenceRule};

use chrono::NaiveDate;

use crate::app::{BriefingError, Result};
use crate::domain::CalendarEvent;

/// Decode a calendar body and split it into raw VEVENTs.
///
/// Resolution against a day is left to [`resolve_events`], so the result
/// can be cached and evaluated for any day.
pub fn read_calendar(body: &[u8]) -> Result<Vec<RawVEvent>> {
    let text = std::str::from_utf8(body)
        .map_err(|e| BriefingError::CalendarParse(format!("calendar is not UTF-8: {e}")))?;
    parse_vevents(text)
}

/// The events among `raw` that fall on `day`, in file order.
///
/// Events that cannot be evaluated are logged and left out.
pub fn resolve_events(raw: &[RawVEvent], source: &str, day: NaiveDate) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    for vevent in raw {
        match resolve_event(vevent, source, day) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(EventError::Recurrence(e)) => {
                tracing::debug!(
                    "Dropping {:?} from {}: {}",
                    vevent.get("SUMMARY").unwrap_or_default(),
                    source,
                    e
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Dropping {:?} from {}: {}",
                    vevent.get("SUMMARY").unwrap_or_default(),
                    source,
                    e
                );
            }
        }
    }
    events
}

/// Events from a calendar body that fall on `day`, in file order.
///
/// Only an unreadable body fails.
pub fn events_on(body: &[u8], source: &str, day: NaiveDate) -> Result<Vec<CalendarEvent>> {
    Ok(resolve_events(&read_calendar(body)?, source, day))
}
