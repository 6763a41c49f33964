use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";
const DATE_FORMAT: &str = "%Y%m%d";

/// A DTSTART/DTEND/UNTIL value.
///
/// A trailing `Z` is dropped without converting, so every value is read as
/// naive local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcalDateTime {
    /// `YYYYMMDD`, an all-day value.
    Date(NaiveDate),
    /// `YYYYMMDDTHHMMSS`
    DateTime(NaiveDateTime),
}

impl IcalDateTime {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().trim_end_matches('Z');
        if value.contains('T') {
            NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
                .ok()
                .map(IcalDateTime::DateTime)
        } else {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .map(IcalDateTime::Date)
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, IcalDateTime::Date(_))
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            IcalDateTime::Date(d) => *d,
            IcalDateTime::DateTime(dt) => dt.date(),
        }
    }

    /// All-day values start at midnight.
    pub fn to_naive(&self) -> NaiveDateTime {
        match self {
            IcalDateTime::Date(d) => d.and_time(NaiveTime::MIN),
            IcalDateTime::DateTime(dt) => *dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_time() {
        let parsed = IcalDateTime::parse("20240315T090000").unwrap();
        assert!(!parsed.is_all_day());
        assert_eq!(parsed.to_naive(), date(2024, 3, 15).and_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_date_only_is_all_day() {
        let parsed = IcalDateTime::parse("20240315").unwrap();
        assert!(parsed.is_all_day());
        assert_eq!(parsed.date(), date(2024, 3, 15));
        assert_eq!(parsed.to_naive(), date(2024, 3, 15).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_utc_suffix_is_stripped_not_converted() {
        let parsed = IcalDateTime::parse("20240315T230000Z").unwrap();
        assert_eq!(parsed.to_naive(), date(2024, 3, 15).and_hms_opt(23, 0, 0).unwrap());
    }

    #[test]
    fn test_malformed_values() {
        assert_eq!(IcalDateTime::parse(""), None);
        assert_eq!(IcalDateTime::parse("2024-03-15"), None);
        assert_eq!(IcalDateTime::parse("20240315T0900"), None);
        assert_eq!(IcalDateTime::parse("20241345"), None);
        assert_eq!(IcalDateTime::parse("tomorrow"), None);
    }
}
