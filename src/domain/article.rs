use serde::{Deserialize, Serialize};

use crate::domain::{FeedSource, Source};

/// A feed entry normalized from either RSS or Atom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Raw date string as published by the source, never reparsed.
    pub pub_date: String,
    pub source: String,
    pub source_url: String,
    pub image: Option<String>,
    pub category: String,
}

impl Article {
    /// Start an article carrying the source's metadata; entry fields are
    /// filled in by the normalizer.
    pub fn from_source(source: &FeedSource) -> Self {
        Self {
            title: String::new(),
            link: String::new(),
            description: String::new(),
            pub_date: String::new(),
            source: source.display_name().to_string(),
            source_url: source.url.clone(),
            image: None,
            category: source.category.clone(),
        }
    }
}
