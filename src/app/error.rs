use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum BriefingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Calendar parsing error: {0}")]
    CalendarParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Fetch task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, BriefingError>;
