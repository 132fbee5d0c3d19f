//! Thread crawler
//!
//! Walks the paginated forum thread and turns page HTML into ordered
//! video sequences. The full crawl keeps going when an individual page
//! fails; the latest-page crawl aborts instead, because a partial
//! "latest" has no meaningful state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::client::{ClientConfig, ForumClient};
use crate::error::Result;
use crate::parser::videos::dedup_first_seen;
use crate::parser::{extract_attributed_videos, extract_video_ids, page_count};
use crate::types::VideoEntry;
use crate::url::{FORUM_THREAD_URL, build_page_url};

/// Cooperative cancellation handle for the full-thread crawl
///
/// Polled between page fetches only; cancellation never interrupts a
/// fetch that is already in flight.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the crawl to stop at the next poll point
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Configuration for the thread crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Base URL of the forum thread
    pub thread_url: String,
    /// Whether network scraping is available at all; when false, crawls
    /// return empty and the orchestrator serves whatever is cached
    pub scraping_available: bool,
    /// HTTP client settings (timeout, inter-page pacing)
    pub client: ClientConfig,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            thread_url: FORUM_THREAD_URL.to_string(),
            scraping_available: true,
            client: ClientConfig::default(),
        }
    }
}

/// Crawls the paginated thread and extracts video references
pub struct ThreadCrawler {
    client: ForumClient,
    thread_url: String,
    scraping_available: bool,
}

impl ThreadCrawler {
    /// Create a new crawler with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(CrawlerConfig::default())
    }

    /// Create a new crawler with custom configuration
    pub fn with_config(config: CrawlerConfig) -> Result<Self> {
        let client = ForumClient::with_config(config.client)?;
        Ok(Self {
            client,
            thread_url: config.thread_url,
            scraping_available: config.scraping_available,
        })
    }

    /// Crawl every page of the thread and collect video ids
    ///
    /// Page 1 supplies the page count; its failure aborts the crawl. A
    /// failure on any later page only loses that page's contribution.
    /// Cancellation is polled between pages and returns everything
    /// accumulated so far. The result is globally deduplicated keeping
    /// first-seen order.
    ///
    /// # Errors
    /// `Fetch`/`HttpStatus` when page 1 cannot be retrieved
    pub async fn crawl_all(&self, cancel: &CancelToken) -> Result<Vec<String>> {
        if !self.scraping_available {
            return Ok(Vec::new());
        }

        let first_page = self.client.fetch(&self.thread_url).await?;
        let pages = page_count(&first_page);
        info!(pages, "thread page count determined");

        let mut all_ids = extract_video_ids(&first_page);

        for page in 2..=pages {
            if cancel.is_cancelled() {
                info!(page, "crawl cancelled, returning partial result");
                break;
            }

            let url = build_page_url(&self.thread_url, page);
            match self.client.fetch(&url).await {
                Ok(html) => all_ids.extend(extract_video_ids(&html)),
                Err(e) => warn!(page, error = %e, "skipping unreachable page"),
            }
        }

        let unique = dedup_first_seen(all_ids);
        info!(total = unique.len(), "full crawl finished");
        Ok(unique)
    }

    /// Crawl the authoritative latest page and collect attributed entries
    ///
    /// Fetches page 1 to learn the page count, then the last page when
    /// the thread has more than one.
    ///
    /// # Errors
    /// `Fetch`/`HttpStatus` when either fetch fails; no partial result
    pub async fn crawl_latest_page(&self) -> Result<Vec<VideoEntry>> {
        if !self.scraping_available {
            return Ok(Vec::new());
        }

        let first_page = self.client.fetch(&self.thread_url).await?;
        let pages = page_count(&first_page);

        let html = if pages > 1 {
            self.client
                .fetch(&build_page_url(&self.thread_url, pages))
                .await?
        } else {
            first_page
        };

        let entries = extract_attributed_videos(&html);
        info!(page = pages, entries = entries.len(), "latest page crawled");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_starts_clear() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_token_shared_across_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_crawler_creation() {
        assert!(ThreadCrawler::new().is_ok());
    }

    #[test]
    fn test_crawler_config_default() {
        let config = CrawlerConfig::default();
        assert_eq!(config.thread_url, FORUM_THREAD_URL);
        assert!(config.scraping_available);
    }

    #[tokio::test]
    async fn test_crawl_all_without_scraping_capability() {
        let crawler = ThreadCrawler::with_config(CrawlerConfig {
            scraping_available: false,
            ..CrawlerConfig::default()
        })
        .unwrap();

        let ids = crawler.crawl_all(&CancelToken::new()).await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_crawl_latest_without_scraping_capability() {
        let crawler = ThreadCrawler::with_config(CrawlerConfig {
            scraping_available: false,
            ..CrawlerConfig::default()
        })
        .unwrap();

        let entries = crawler.crawl_latest_page().await.unwrap();
        assert!(entries.is_empty());
    }
}
