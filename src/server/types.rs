//! JSON bodies returned by the API.

use chrono::Local;
use serde::Serialize;

use crate::aggregator::{CalendarAggregate, FeedAggregate};
use crate::domain::{Article, CalendarEvent, SourceError};

/// Local time without offset, microsecond precision.
pub fn last_updated() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

#[derive(Debug, Serialize)]
pub struct FeedErrorEntry {
    pub feed: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct CalendarErrorEntry {
    pub calendar: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedsResponse {
    pub articles: Vec<Article>,
    pub errors: Vec<FeedErrorEntry>,
    pub last_updated: String,
}

impl From<FeedAggregate> for FeedsResponse {
    fn from(aggregate: FeedAggregate) -> Self {
        Self {
            articles: aggregate.articles,
            errors: aggregate
                .errors
                .into_iter()
                .map(|SourceError { source, message }| FeedErrorEntry {
                    feed: source,
                    error: message,
                })
                .collect(),
            last_updated: last_updated(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub events: Vec<CalendarEvent>,
    pub errors: Vec<CalendarErrorEntry>,
    pub last_updated: String,
}

impl From<CalendarAggregate> for CalendarResponse {
    fn from(aggregate: CalendarAggregate) -> Self {
        Self {
            events: aggregate.events,
            errors: aggregate
                .errors
                .into_iter()
                .map(|SourceError { source, message }| CalendarErrorEntry {
                    calendar: source,
                    error: message,
                })
                .collect(),
            last_updated: last_updated(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_errors_use_feed_key() {
        let aggregate = FeedAggregate {
            articles: Vec::new(),
            errors: vec![SourceError::new("HN", "timed out")],
        };

        let json = serde_json::to_value(FeedsResponse::from(aggregate)).unwrap();
        assert_eq!(json["errors"][0]["feed"], "HN");
        assert_eq!(json["errors"][0]["error"], "timed out");
        assert!(json["lastUpdated"].is_string());
    }

    #[test]
    fn test_calendar_errors_use_calendar_key() {
        let aggregate = CalendarAggregate {
            events: Vec::new(),
            errors: vec![SourceError::new("Work", "bad ics")],
        };

        let json = serde_json::to_value(CalendarResponse::from(aggregate)).unwrap();
        assert_eq!(json["errors"][0]["calendar"], "Work");
    }

    #[test]
    fn test_status_body() {
        let json = serde_json::to_value(StatusResponse::new("cache cleared")).unwrap();
        assert_eq!(json, serde_json::json!({"status": "cache cleared"}));
    }

    #[test]
    fn test_last_updated_has_no_offset() {
        let stamp = last_updated();
        assert!(chrono::NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
    }
}
