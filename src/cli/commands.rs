use std::net::SocketAddr;
use std::path::Path;

use crate::app::{AppContext, Result};
use crate::domain::{Article, CalendarEvent};
use crate::server::{self, CalendarResponse, FeedsResponse};

pub async fn serve(ctx: &AppContext, port: Option<u16>, public_dir: &Path) -> Result<()> {
    let config = ctx.load_config()?;
    let port = port.unwrap_or(config.settings.port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    println!(
        "Serving {} feeds and {} calendars on http://localhost:{}",
        config.feeds.len(),
        config.calendar.sources.len(),
        port
    );
    server::start_server(addr, ctx.api_state(), public_dir).await?;

    Ok(())
}

pub async fn print_feeds(ctx: &AppContext, json: bool) -> Result<()> {
    let config = ctx.load_config()?;
    let aggregate = ctx
        .aggregator
        .aggregate_feeds(
            &config.feeds,
            config.settings.max_items_per_feed,
            config.settings.cache_ttl,
        )
        .await;

    if json {
        let response = FeedsResponse::from(aggregate);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if aggregate.articles.is_empty() {
        println!("No articles");
    }
    for article in &aggregate.articles {
        println!("{}", article_line(article));
    }
    for error in &aggregate.errors {
        eprintln!("  ! {} - {}", error.source, error.message);
    }

    Ok(())
}

pub async fn print_calendar(ctx: &AppContext, json: bool) -> Result<()> {
    let config = ctx.load_config()?;
    let aggregate = ctx
        .aggregator
        .aggregate_calendars(&config.calendar.sources, config.calendar.cache_ttl)
        .await;

    if json {
        let response = CalendarResponse::from(aggregate);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if aggregate.events.is_empty() {
        println!("No events today");
    }
    for event in &aggregate.events {
        println!("{}", event_line(event));
    }
    for error in &aggregate.errors {
        eprintln!("  ! {} - {}", error.source, error.message);
    }

    Ok(())
}

fn article_line(article: &Article) -> String {
    format!(
        "[{}] {} ({})",
        article.category, article.title, article.source
    )
}

fn event_line(event: &CalendarEvent) -> String {
    if event.is_all_day {
        return format!("all day  {} ({})", event.title, event.source);
    }
    // "YYYY-MM-DDTHH:MM:SS" → "HH:MM"
    let time = event.start_time.get(11..16).unwrap_or(&event.start_time);
    format!("{:<8} {} ({})", time, event.title, event.source)
}
