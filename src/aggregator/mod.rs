//! Cache-or-fetch orchestration for feeds and calendars.
//!
//! ```text
//! sources → cache lookup → (miss) parallel fetch → normalize/parse → cache → merge → sort
//! ```
//!
//! A source that fails to fetch or parse contributes an error entry and no
//! items; the remaining sources are still returned.

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::app::Result;
use crate::cache::TtlCache;
use crate::calendar::{self, RawVEvent};
use crate::domain::{Article, CalendarEvent, CalendarSource, FeedSource, Source, SourceError};
use crate::fetcher::parallel::{ParallelFetcher, DEFAULT_WORKERS};
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedAggregate {
    pub articles: Vec<Article>,
    pub errors: Vec<SourceError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarAggregate {
    pub events: Vec<CalendarEvent>,
    pub errors: Vec<SourceError>,
}

/// Per-source outcome, kept in source order until the final merge.
enum Outcome<T> {
    Cached(T),
    Pending,
}

pub struct Aggregator {
    fetcher: ParallelFetcher,
    normalizer: Normalizer,
    feed_cache: TtlCache<Vec<Article>>,
    /// Unresolved VEVENTs, so a hit can be evaluated for any day.
    calendar_cache: TtlCache<Vec<RawVEvent>>,
}

impl Aggregator {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self::with_workers(fetcher, DEFAULT_WORKERS)
    }

    pub fn with_workers(fetcher: Arc<dyn Fetcher + Send + Sync>, workers: usize) -> Self {
        Self {
            fetcher: ParallelFetcher::with_workers(fetcher, workers),
            normalizer: Normalizer::new(),
            feed_cache: TtlCache::new(),
            calendar_cache: TtlCache::new(),
        }
    }

    /// Articles from every enabled feed, newest first by raw `pubDate`.
    pub async fn aggregate_feeds(
        &self,
        sources: &[FeedSource],
        max_items_per_feed: usize,
        cache_ttl_secs: u64,
    ) -> FeedAggregate {
        let enabled: Vec<&FeedSource> = sources.iter().filter(|s| s.enabled).collect();

        let batch = self
            .collect(&enabled, &self.feed_cache, cache_ttl_secs, |source, body| {
                self.normalizer.normalize(source, body, max_items_per_feed)
            })
            .await;

        let mut articles: Vec<Article> = batch
            .payloads
            .into_iter()
            .flat_map(|(_, items)| items)
            .collect();
        // Plain string order: only comparable when sources use the same date format.
        articles.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));

        tracing::info!(
            "Aggregated {} articles from {} feeds ({} errors)",
            articles.len(),
            enabled.len(),
            batch.errors.len()
        );

        FeedAggregate {
            articles,
            errors: batch.errors,
        }
    }

    /// Today's events from every enabled calendar, earliest first.
    pub async fn aggregate_calendars(
        &self,
        sources: &[CalendarSource],
        cache_ttl_secs: u64,
    ) -> CalendarAggregate {
        self.aggregate_calendars_on(sources, cache_ttl_secs, Local::now().date_naive())
            .await
    }

    /// Events falling on `day`.
    pub async fn aggregate_calendars_on(
        &self,
        sources: &[CalendarSource],
        cache_ttl_secs: u64,
        day: NaiveDate,
    ) -> CalendarAggregate {
        let enabled: Vec<&CalendarSource> = sources.iter().filter(|s| s.enabled).collect();

        let batch = self
            .collect(&enabled, &self.calendar_cache, cache_ttl_secs, |_, body| {
                calendar::read_calendar(body)
            })
            .await;

        let mut events: Vec<CalendarEvent> = batch
            .payloads
            .iter()
            .flat_map(|(source, raw)| calendar::resolve_events(raw, source.display_name(), day))
            .collect();
        events.sort_by(|a, b| a.start_time.cmp(&b.start_time));

        tracing::info!(
            "Aggregated {} events for {} from {} calendars ({} errors)",
            events.len(),
            day,
            enabled.len(),
            batch.errors.len()
        );

        CalendarAggregate {
            events,
            errors: batch.errors,
        }
    }

    /// Drop every cached feed and calendar payload.
    pub fn clear_cache(&self) {
        self.feed_cache.clear();
        self.calendar_cache.clear();
        tracing::info!("Cache cleared");
    }

    /// Serve hits from `cache`, fetch and `parse` the misses, cache the
    /// successes, then return each source's payload in source order.
    async fn collect<'s, S, T, P>(
        &self,
        sources: &[&'s S],
        cache: &TtlCache<T>,
        cache_ttl_secs: u64,
        parse: P,
    ) -> Batch<'s, S, T>
    where
        S: Source,
        T: Clone,
        P: Fn(&S, &[u8]) -> Result<T>,
    {
        let mut outcomes = Vec::with_capacity(sources.len());
        let mut misses = Vec::new();

        for source in sources {
            match cache.get(source.url()) {
                Some(payload) => {
                    tracing::debug!("Cache hit for {}", source.url());
                    outcomes.push(Outcome::Cached(payload));
                }
                None => {
                    misses.push(source.url().to_string());
                    outcomes.push(Outcome::Pending);
                }
            }
        }

        let mut fetched = self.fetcher.fetch_all(misses).await.into_iter();
        let mut batch = Batch {
            payloads: Vec::new(),
            errors: Vec::new(),
        };

        for (&source, outcome) in sources.iter().zip(outcomes) {
            let result = match outcome {
                Outcome::Cached(payload) => Ok(payload),
                Outcome::Pending => match fetched.next() {
                    Some((url, Ok(body))) => parse(source, &body).inspect(|payload| {
                        cache.put(&url, payload.clone(), cache_ttl_secs);
                    }),
                    Some((_, Err(e))) => Err(e),
                    None => continue,
                },
            };

            match result {
                Ok(payload) => batch.payloads.push((source, payload)),
                Err(e) => {
                    tracing::warn!("Error fetching {}: {}", source.display_name(), e);
                    batch.errors.push(SourceError::new(source.display_name(), e));
                }
            }
        }

        batch
    }
}

struct Batch<'s, S, T> {
    payloads: Vec<(&'s S, T)>,
    errors: Vec<SourceError>,
}
