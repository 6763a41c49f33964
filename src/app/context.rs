use std::path::PathBuf;
use std::sync::Arc;

use crate::aggregator::Aggregator;
use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::parallel::DEFAULT_WORKERS;
use crate::fetcher::Fetcher;
use crate::server::ApiState;

pub struct AppContext {
    /// `None` means the default config path.
    pub config_path: Option<PathBuf>,
    pub aggregator: Arc<Aggregator>,
}

impl AppContext {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self> {
        Self::with_workers(config_path, DEFAULT_WORKERS)
    }

    pub fn with_workers(config_path: Option<PathBuf>, workers: usize) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new()?);
        Ok(Self::with_fetcher(config_path, fetcher, workers))
    }

    pub fn with_fetcher(
        config_path: Option<PathBuf>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        workers: usize,
    ) -> Self {
        Self {
            config_path,
            aggregator: Arc::new(Aggregator::with_workers(fetcher, workers)),
        }
    }

    pub fn load_config(&self) -> Result<Config> {
        Ok(Config::load(self.config_path.as_deref())?)
    }

    pub fn api_state(&self) -> ApiState {
        ApiState::new(self.aggregator.clone(), self.config_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::BriefingError;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct NoFetch;

    #[async_trait]
    impl Fetcher for NoFetch {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            Err(BriefingError::Task(format!("unexpected fetch of {url}")))
        }
    }

    #[test]
    fn test_load_config_from_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feeds.json");
        std::fs::write(&path, r#"{"settings": {"port": 9000}}"#).unwrap();

        let ctx = AppContext::with_fetcher(Some(path), Arc::new(NoFetch), 2);
        assert_eq!(ctx.load_config().unwrap().settings.port, 9000);
    }

    #[test]
    fn test_invalid_config_surfaces_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feeds.toml");
        std::fs::write(&path, "settings = [").unwrap();

        let ctx = AppContext::with_fetcher(Some(path), Arc::new(NoFetch), 2);
        assert!(matches!(ctx.load_config(), Err(BriefingError::Config(_))));
    }

    #[test]
    fn test_api_state_shares_aggregator() {
        let ctx = AppContext::with_fetcher(None, Arc::new(NoFetch), 2);
        let state = ctx.api_state();
        assert!(Arc::ptr_eq(&state.aggregator, &ctx.aggregator));
        assert!(state.config_path.is_none());
    }
}
