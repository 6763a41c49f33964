pub mod http_fetcher;
pub mod parallel;

use async_trait::async_trait;

use crate::app::Result;

/// Fixed per-request timeout for source fetches, in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 10;

#[async_trait]
pub trait Fetcher {
    /// Fetch the raw body at `url`. Non-success statuses are errors.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
