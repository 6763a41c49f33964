use std::collections::HashMap;

use crate::app::{BriefingError, Result};

/// Properties of one `VEVENT` block, keyed by name with parameters removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawVEvent {
    properties: HashMap<String, String>,
}

impl RawVEvent {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Repeated keys concatenate onto the existing value.
    fn append(&mut self, key: &str, value: &str) {
        self.properties
            .entry(key.to_string())
            .or_default()
            .push_str(value);
    }
}

enum ParserState {
    Outside,
    Inside {
        event: RawVEvent,
        current_field: Option<String>,
    },
}

/// Line-oriented reader for the VEVENT blocks of an iCalendar document.
///
/// Folded continuation lines extend the last property seen; a VEVENT with
/// no `END:VEVENT` is dropped.
pub struct VEventParser {
    state: ParserState,
    events: Vec<RawVEvent>,
}

impl Default for VEventParser {
    fn default() -> Self {
        Self::new()
    }
}

impl VEventParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Outside,
            events: Vec::new(),
        }
    }

    pub fn feed_line(&mut self, line: &str) {
        let line = line.trim_end();

        if line.starts_with(|c| c == ' ' || c == '\t') {
            if let ParserState::Inside {
                event,
                current_field: Some(field),
            } = &mut self.state
            {
                event.append(field, line.trim_start());
            }
            return;
        }

        match line {
            "BEGIN:VEVENT" => {
                self.state = ParserState::Inside {
                    event: RawVEvent::default(),
                    current_field: None,
                };
            }
            "END:VEVENT" => {
                if let ParserState::Inside { event, .. } =
                    std::mem::replace(&mut self.state, ParserState::Outside)
                {
                    self.events.push(event);
                }
            }
            _ => {
                let ParserState::Inside {
                    event,
                    current_field,
                } = &mut self.state
                else {
                    return;
                };
                let Some((key, value)) = line.split_once(':') else {
                    return;
                };
                let key = key.split(';').next().unwrap_or(key);
                event.append(key, value);
                *current_field = Some(key.to_string());
            }
        }
    }

    /// Completed events; an open block at this point is discarded.
    pub fn finish(self) -> Vec<RawVEvent> {
        self.events
    }
}

/// Split calendar text into its VEVENT property maps.
pub fn parse_vevents(text: &str) -> Result<Vec<RawVEvent>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if !text.lines().any(|line| line.trim() == "BEGIN:VCALENDAR") {
        return Err(BriefingError::CalendarParse(
            "missing BEGIN:VCALENDAR".to_string(),
        ));
    }

    let mut parser = VEventParser::new();
    for line in text.split('\n') {
        parser.feed_line(line);
    }
    Ok(parser.finish())
}
