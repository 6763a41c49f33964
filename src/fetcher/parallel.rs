use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::app::{BriefingError, Result};
use crate::fetcher::Fetcher;

pub const DEFAULT_WORKERS: usize = 10;

pub struct ParallelFetcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    semaphore: Arc<Semaphore>,
}

impl ParallelFetcher {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self::with_workers(fetcher, DEFAULT_WORKERS)
    }

    pub fn with_workers(fetcher: Arc<dyn Fetcher + Send + Sync>, workers: usize) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Fetch every URL concurrently, at most `workers` at a time.
    ///
    /// Returns one outcome per URL, in input order, once all of them have
    /// finished.
    pub async fn fetch_all(&self, urls: Vec<String>) -> Vec<(String, Result<Vec<u8>>)> {
        let mut handles = Vec::with_capacity(urls.len());

        for url in &urls {
            let fetcher = self.fetcher.clone();
            let semaphore = self.semaphore.clone();
            let task_url = url.clone();

            handles.push(tokio::spawn(async move {
                fetch_single(&fetcher, &semaphore, &task_url).await
            }));
        }

        urls.into_iter()
            .zip(join_all(handles).await)
            .map(|(url, joined)| {
                let result = joined.unwrap_or_else(|e| {
                    tracing::error!("Task join error for {}: {}", url, e);
                    Err(BriefingError::Task(e.to_string()))
                });
                (url, result)
            })
            .collect()
    }
}

async fn fetch_single(
    fetcher: &Arc<dyn Fetcher + Send + Sync>,
    semaphore: &Semaphore,
    url: &str,
) -> Result<Vec<u8>> {
    let _permit = semaphore
        .acquire()
        .await
        .map_err(|e| BriefingError::Task(e.to_string()))?;
    fetcher.fetch(url).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Echoes the URL back, failing for anything under `/fail`.
    struct EchoFetcher {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for EchoFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if url.contains("/fail") {
                Err(BriefingError::FeedParse("boom".into()))
            } else {
                Ok(url.as_bytes().to_vec())
            }
        }
    }

    fn echo() -> Arc<EchoFetcher> {
        Arc::new(EchoFetcher {
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let fetcher = ParallelFetcher::new(echo());
        let urls: Vec<String> = (0..5).map(|i| format!("https://example.com/{i}")).collect();

        let results = fetcher.fetch_all(urls.clone()).await;

        let returned: Vec<_> = results.iter().map(|(url, _)| url.clone()).collect();
        assert_eq!(returned, urls);
        assert_eq!(results[3].1.as_ref().unwrap(), b"https://example.com/3");
    }

    #[tokio::test]
    async fn test_failures_are_reported_per_url() {
        let fetcher = ParallelFetcher::new(echo());
        let results = fetcher
            .fetch_all(vec![
                "https://example.com/ok".into(),
                "https://example.com/fail".into(),
            ])
            .await;

        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
    }

    #[tokio::test]
    async fn test_worker_limit_is_respected() {
        let inner = echo();
        let fetcher = ParallelFetcher::with_workers(inner.clone(), 2);
        let urls = (0..8).map(|i| format!("https://example.com/{i}")).collect();

        fetcher.fetch_all(urls).await;

        assert!(inner.max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_empty_input() {
        let fetcher = ParallelFetcher::new(echo());
        let results = tokio_test::block_on(fetcher.fetch_all(Vec::new()));
        assert!(results.is_empty());
    }
}
