//! High-level scraper API
//!
//! Composes the cache stores, the thread crawler and the metadata
//! enricher into the public read operations. Read paths never fail:
//! every error degrades to fewer or older results, and the cache is only
//! overwritten by a successful, non-empty crawl.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::cache::{
    CACHE_VALIDITY, CacheStore, FULL_LIST_FILE, FileStorage, LATEST_LIST_FILE, LatestListStore,
    METADATA_FILE, MetadataStore, VideoListStore,
};
use crate::client::ClientConfig;
use crate::crawler::{CancelToken, CrawlerConfig, ThreadCrawler};
use crate::error::Result;
use crate::metadata::{EnricherConfig, MetadataEnricher};
use crate::types::{VideoEntry, VideoMetadata};
use crate::url::{FORUM_THREAD_URL, OEMBED_URL};

/// Configuration for the scraper facade
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Base URL of the forum thread
    pub thread_url: String,
    /// Base URL of the oEmbed endpoint
    pub oembed_url: String,
    /// Directory holding the three cache files
    pub cache_dir: PathBuf,
    /// Freshness window for the two list caches
    pub cache_validity: Duration,
    /// Typed capability flag; false means cache-only operation
    pub scraping_available: bool,
    /// Client settings for thread pages (15s timeout, 0.5s pacing)
    pub page_client: ClientConfig,
    /// Client settings for oEmbed lookups (5s timeout, 0.2s pacing)
    pub metadata_client: ClientConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            thread_url: FORUM_THREAD_URL.to_string(),
            oembed_url: OEMBED_URL.to_string(),
            cache_dir: PathBuf::from("cache"),
            cache_validity: CACHE_VALIDITY,
            scraping_available: true,
            page_client: ClientConfig::default(),
            metadata_client: ClientConfig {
                requests_per_second: 5.0,
                timeout_secs: 5,
            },
        }
    }
}

/// Main scraper API for the Musik-Tipps thread
///
/// # Example
/// ```no_run
/// use musiktipps_core::{CancelToken, MusiktippsScraper};
///
/// #[tokio::main]
/// async fn main() -> musiktipps_core::Result<()> {
///     let scraper = MusiktippsScraper::new()?;
///     let videos = scraper.get_video_list(false, &CancelToken::new()).await;
///     for (idx, id) in videos.iter().enumerate() {
///         println!("{}. {}", idx + 1, id);
///     }
///     Ok(())
/// }
/// ```
pub struct MusiktippsScraper {
    crawler: ThreadCrawler,
    enricher: MetadataEnricher,
    full_store: VideoListStore,
    latest_store: LatestListStore,
    metadata_store: MetadataStore,
}

impl MusiktippsScraper {
    /// Create a new scraper with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    /// Create a new scraper with custom configuration
    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        let crawler = ThreadCrawler::with_config(CrawlerConfig {
            thread_url: config.thread_url,
            scraping_available: config.scraping_available,
            client: config.page_client,
        })?;
        let enricher = MetadataEnricher::with_config(EnricherConfig {
            oembed_url: config.oembed_url,
            client: config.metadata_client,
        })?;

        let full_store = CacheStore::new(
            Box::new(FileStorage::new(config.cache_dir.join(FULL_LIST_FILE))),
            config.cache_validity,
        );
        let latest_store = LatestListStore::new(
            Box::new(FileStorage::new(config.cache_dir.join(LATEST_LIST_FILE))),
            config.cache_validity,
        );
        let metadata_store =
            MetadataStore::new(Box::new(FileStorage::new(config.cache_dir.join(METADATA_FILE))));

        Ok(Self {
            crawler,
            enricher,
            full_store,
            latest_store,
            metadata_store,
        })
    }

    /// Get the ordered id list of the whole thread
    ///
    /// Serves the cache while fresh, crawls otherwise, and falls back to
    /// the stale cache when a refresh comes back empty. An empty result
    /// means there is truly no data, fresh or cached.
    pub async fn get_video_list(&self, force_refresh: bool, cancel: &CancelToken) -> Vec<String> {
        let cached = self.full_store.read().filter(|(videos, _)| !videos.is_empty());

        if !force_refresh
            && let Some((videos, timestamp)) = &cached
            && self.full_store.is_fresh(*timestamp)
        {
            return videos.clone();
        }

        let crawled = match self.crawler.crawl_all(cancel).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "full crawl failed");
                Vec::new()
            }
        };

        if !crawled.is_empty() {
            if let Err(e) = self.full_store.write(&crawled) {
                warn!(error = %e, "failed to persist video list cache");
            }
            return crawled;
        }

        if let Some((videos, _)) = cached {
            info!("refresh yielded nothing, serving stale video list");
            return videos;
        }

        Vec::new()
    }

    /// Get the attributed entries of the authoritative latest page
    ///
    /// Same cache policy as [`Self::get_video_list`], against the
    /// latest-page store.
    pub async fn get_latest_videos(&self, force_refresh: bool) -> Vec<VideoEntry> {
        let cached = self
            .latest_store
            .read()
            .filter(|(entries, _)| !entries.is_empty());

        if !force_refresh
            && let Some((entries, timestamp)) = &cached
            && self.latest_store.is_fresh(*timestamp)
        {
            return entries.clone();
        }

        let crawled = match self.crawler.crawl_latest_page().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "latest page crawl failed");
                Vec::new()
            }
        };

        if !crawled.is_empty() {
            if let Err(e) = self.latest_store.write(&crawled) {
                warn!(error = %e, "failed to persist latest list cache");
            }
            return crawled;
        }

        if let Some((entries, _)) = cached {
            info!("refresh yielded nothing, serving stale latest list");
            return entries;
        }

        Vec::new()
    }

    /// Resolve title/author metadata for a batch of ids
    pub async fn enrich_metadata(&self, video_ids: &[String]) -> HashMap<String, VideoMetadata> {
        self.enricher.enrich(video_ids, &self.metadata_store).await
    }

    /// Delete all three cache files; idempotent
    pub fn clear_cache(&self) -> Result<()> {
        self.full_store.clear()?;
        self.latest_store.clear()?;
        self.metadata_store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scraper_creation() {
        assert!(MusiktippsScraper::new().is_ok());
    }

    #[test]
    fn test_scraper_config_default() {
        let config = ScraperConfig::default();
        assert_eq!(config.thread_url, FORUM_THREAD_URL);
        assert_eq!(config.oembed_url, OEMBED_URL);
        assert_eq!(config.cache_validity, Duration::from_secs(86400));
        assert!(config.scraping_available);
        assert_eq!(config.page_client.timeout_secs, 15);
        assert_eq!(config.metadata_client.timeout_secs, 5);
    }

    #[test]
    fn test_scraper_with_custom_config() {
        let config = ScraperConfig {
            thread_url: "https://forum.example/thread/music".to_string(),
            scraping_available: false,
            ..ScraperConfig::default()
        };
        assert!(MusiktippsScraper::with_config(config).is_ok());
    }
}
