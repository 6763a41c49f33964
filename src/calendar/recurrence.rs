//! Decides whether a recurring event has an occurrence on a given day.
//!
//! Only the subset of RFC 5545 needed for "is this on today?" is
//! implemented: `FREQ` (daily, weekly, monthly, yearly), `INTERVAL`, `UNTIL`
//! and plain weekday `BYDAY` lists. Any other rule part makes the rule
//! [`Unsupported`](RecurrenceError::Unsupported), and callers treat that as
//! "no occurrence" instead of guessing.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use thiserror::Error;

use crate::calendar::datetime::IcalDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    #[error("unsupported recurrence: {0}")]
    Unsupported(String),

    #[error("malformed recurrence rule: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl FromStr for Frequency {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            "YEARLY" => Ok(Frequency::Yearly),
            other => Err(RecurrenceError::Unsupported(format!("FREQ={other}"))),
        }
    }
}

/// A parsed RRULE value such as `FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u32,
    /// Only the date part of UNTIL is compared.
    pub until: Option<NaiveDate>,
    pub by_day: Option<Vec<Weekday>>,
}

impl FromStr for RecurrenceRule {
    type Err = RecurrenceError;

    fn from_str(rule: &str) -> Result<Self, Self::Err> {
        let mut frequency = None;
        let mut interval = 1;
        let mut until = None;
        let mut by_day = None;

        for part in rule.split(';') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let value = value.trim();

            match key.trim().to_ascii_uppercase().as_str() {
                "FREQ" => frequency = Some(value.parse::<Frequency>()?),
                "INTERVAL" => interval = parse_interval(value)?,
                "UNTIL" => {
                    let parsed = IcalDateTime::parse(value).ok_or_else(|| {
                        RecurrenceError::Malformed(format!("UNTIL={value}"))
                    })?;
                    until = Some(parsed.date());
                }
                "BYDAY" => by_day = Some(parse_by_day(value)?),
                // Week start only matters for rule parts that are not supported.
                "WKST" => {}
                other => return Err(RecurrenceError::Unsupported(other.to_string())),
            }
        }

        let frequency =
            frequency.ok_or_else(|| RecurrenceError::Malformed("missing FREQ".to_string()))?;

        if by_day.is_some() && matches!(frequency, Frequency::Monthly | Frequency::Yearly) {
            return Err(RecurrenceError::Unsupported(format!(
                "BYDAY with {frequency:?} frequency"
            )));
        }

        Ok(Self {
            frequency,
            interval,
            until,
            by_day,
        })
    }
}

impl RecurrenceRule {
    /// Whether a series starting on `start` has an occurrence on `target`.
    pub fn occurs_on(&self, start: NaiveDate, target: NaiveDate) -> bool {
        if self.until.is_some_and(|until| target > until) {
            return false;
        }

        let interval = i64::from(self.interval);
        let days = (target - start).num_days();

        match self.frequency {
            Frequency::Daily => {
                days >= 0 && days % interval == 0 && self.allows_weekday(target.weekday())
            }
            Frequency::Weekly => {
                let on_weekday = match &self.by_day {
                    Some(days) => days.contains(&target.weekday()),
                    None => target.weekday() == start.weekday(),
                };
                let weeks = days.div_euclid(7);
                on_weekday && weeks >= 0 && weeks % interval == 0
            }
            Frequency::Monthly => {
                let months = i64::from(target.year() - start.year()) * 12
                    + i64::from(target.month()) - i64::from(start.month());
                target.day() == start.day() && months >= 0 && months % interval == 0
            }
            Frequency::Yearly => {
                let years = i64::from(target.year() - start.year());
                target.month() == start.month()
                    && target.day() == start.day()
                    && years >= 0
                    && years % interval == 0
            }
        }
    }

    fn allows_weekday(&self, weekday: Weekday) -> bool {
        self.by_day
            .as_ref()
            .map_or(true, |days| days.contains(&weekday))
    }
}

/// Evaluate `rule` for a series starting at `start`, keeping unsupported
/// and malformed rules distinct from a plain "not on that day".
pub fn evaluate(
    start: NaiveDateTime,
    rule: &str,
    target: NaiveDate,
) -> Result<bool, RecurrenceError> {
    let rule: RecurrenceRule = rule.parse()?;
    Ok(rule.occurs_on(start.date(), target))
}

/// Like [`evaluate`], but any rule that cannot be evaluated has no occurrence.
pub fn occurs_on(start: NaiveDateTime, rule: &str, target: NaiveDate) -> bool {
    match evaluate(start, rule, target) {
        Ok(occurs) => occurs,
        Err(e) => {
            tracing::debug!("Skipping rule {:?}: {}", rule, e);
            false
        }
    }
}

/// Move an occurrence onto `target`, keeping the original time of day and
/// the original start-to-end duration.
pub fn project(
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
    target: NaiveDate,
) -> (NaiveDateTime, Option<NaiveDateTime>) {
    let projected_start = target.and_time(start.time());
    let projected_end = end.and_then(|end| projected_start.checked_add_signed(end - start));
    (projected_start, projected_end)
}

fn parse_interval(value: &str) -> Result<u32, RecurrenceError> {
    match value.parse::<u32>() {
        Ok(interval) if interval > 0 => Ok(interval),
        _ => Err(RecurrenceError::Malformed(format!("INTERVAL={value}"))),
    }
}

fn parse_by_day(value: &str) -> Result<Vec<Weekday>, RecurrenceError> {
    value
        .split(',')
        .map(|code| {
            let code = code.trim().to_ascii_uppercase();
            if let Some(weekday) = weekday_from_code(&code) {
                return Ok(weekday);
            }
            // "1MO", "-1FR": the nth weekday of a period.
            let has_ordinal = code.is_ascii()
                && code.len() > 2
                && weekday_from_code(&code[code.len() - 2..]).is_some()
                && code[..code.len() - 2]
                    .trim_start_matches(|c| c == '+' || c == '-')
                    .chars()
                    .all(|c| c.is_ascii_digit());
            if has_ordinal {
                Err(RecurrenceError::Unsupported(format!("BYDAY={code}")))
            } else {
                Err(RecurrenceError::Malformed(format!("BYDAY={code}")))
            }
        })
        .collect()
}

pub fn weekday_from_code(code: &str) -> Option<Weekday> {
    match code {
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        "SU" => Some(Weekday::Sun),
        _ => None,
    }
}
