use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::app::Result;
use crate::fetcher::{Fetcher, FETCH_TIMEOUT_SECS};

const USER_AGENT: &str = concat!("Mozilla/5.0 (Briefing Dashboard/", env!("CARGO_PKG_VERSION"), ")");

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let url = Url::parse(url)?;

        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;

        let body = response.bytes().await?.to_vec();
        tracing::debug!("Fetched {} bytes", body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::BriefingError;

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/feed.xml")
            .with_status(200)
            .with_header("content-type", "application/rss+xml")
            .with_body("<rss/>")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let body = fetcher
            .fetch(&format!("{}/feed.xml", server.url()))
            .await
            .unwrap();

        assert_eq!(body, b"<rss/>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing.ics")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher.fetch(&format!("{}/missing.ics", server.url())).await;

        assert!(matches!(result, Err(BriefingError::Http(_))));
    }

    #[tokio::test]
    async fn test_invalid_url_is_error() {
        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(BriefingError::InvalidUrl(_))));
    }
}
