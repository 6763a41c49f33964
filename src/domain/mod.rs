pub mod article;
pub mod event;
pub mod source;

pub use article::Article;
pub use event::CalendarEvent;
pub use source::{CalendarSource, FeedSource, Source, SourceError};
