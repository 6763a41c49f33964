//! # Briefing
//!
//! Aggregates RSS/Atom feeds and iCal calendars into one daily briefing,
//! served as JSON over HTTP.
//!
//! ## Architecture
//!
//! ```text
//! Config → Aggregator → (TtlCache | ParallelFetcher) → Normalizer / Calendar → Server
//! ```
//!
//! - [`fetcher`]: HTTP client with a fixed timeout, fanned out over a worker pool
//! - [`normalizer`]: Converts RSS/Atom feeds to [`Article`](domain::Article)s
//! - [`calendar`]: Line-oriented iCal parsing and RRULE resolution
//! - [`cache`]: Per-URL TTL cache
//! - [`server`]: axum HTTP API
//!
//! ## Quick Start
//!
//! ```bash
//! # Serve the API on settings.port
//! briefing serve
//!
//! # Print today's articles and events
//! briefing feeds
//! briefing calendar --json
//! ```
//!
//! ## Modules
//!
//! - [`aggregator`]: Cache-or-fetch orchestration
//! - [`app`]: Application context and error types
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: Feed and calendar sources, settings
//! - [`domain`]: Core domain models (Article, CalendarEvent, sources)

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// config path, fetcher, aggregator.
pub mod app;

/// Merges articles and events from every enabled source, with caching and
/// per-source error isolation.
pub mod aggregator;

/// Expiring key/value cache keyed by source URL.
pub mod cache;

/// iCal parsing and recurrence.
///
/// - [`parse_vevents`](calendar::parse_vevents): raw VEVENT property maps
/// - [`recurrence`](calendar::recurrence): RRULE subset (DAILY, WEEKLY, MONTHLY, YEARLY)
/// - [`events_on`](calendar::events_on): events occurring on one day
pub mod calendar;

/// Command-line interface using clap.
///
/// - `serve [--port P] [--public DIR]` - Run the HTTP API
/// - `feeds [--json]` - Print aggregated articles
/// - `calendar [--json]` - Print today's events
pub mod cli;

/// Configuration loading.
///
/// Reads `~/.config/briefing/feeds.json` (JSON, or TOML by extension).
pub mod config;

/// Core domain models.
///
/// - [`Article`](domain::Article): normalized feed entry
/// - [`CalendarEvent`](domain::CalendarEvent): event resolved for one day
/// - [`FeedSource`](domain::FeedSource) / [`CalendarSource`](domain::CalendarSource)
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for source fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ParallelFetcher`](fetcher::parallel::ParallelFetcher): Concurrent fetching with semaphore
pub mod fetcher;

/// Feed parsing and normalization.
///
/// Converts RSS 2.0 and Atom 1.0 into [`Article`](domain::Article) structs,
/// stripping markup and picking a lead image.
pub mod normalizer;

/// HTTP API and static file serving.
pub mod server;
