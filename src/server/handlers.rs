//! HTTP request handlers for API endpoints

use axum::{extract::State, Json};

use crate::config::Config;
use crate::server::types::{CalendarResponse, FeedsResponse, StatusResponse};
use crate::server::ApiState;

/// Re-read the config; an unreadable or invalid file serves the defaults.
fn load_config(state: &ApiState) -> Config {
    Config::load(state.config_path.as_deref()).unwrap_or_else(|e| {
        tracing::error!("Failed to load config, using defaults: {}", e);
        Config::default()
    })
}

/// Aggregated articles from every enabled feed.
pub async fn get_feeds(State(state): State<ApiState>) -> Json<FeedsResponse> {
    let config = load_config(&state);
    let aggregate = state
        .aggregator
        .aggregate_feeds(
            &config.feeds,
            config.settings.max_items_per_feed,
            config.settings.cache_ttl,
        )
        .await;

    Json(aggregate.into())
}

/// Today's events from every enabled calendar.
pub async fn get_calendar(State(state): State<ApiState>) -> Json<CalendarResponse> {
    let config = load_config(&state);
    let aggregate = state
        .aggregator
        .aggregate_calendars(&config.calendar.sources, config.calendar.cache_ttl)
        .await;

    Json(aggregate.into())
}

pub async fn get_config(State(state): State<ApiState>) -> Json<Config> {
    Json(load_config(&state))
}

pub async fn refresh(State(state): State<ApiState>) -> Json<StatusResponse> {
    state.aggregator.clear_cache();
    Json(StatusResponse::new("cache cleared"))
}
