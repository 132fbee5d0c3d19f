//! Musik-Tipps Scraper Core Library
//!
//! Extracts the curated list of music videos posted as YouTube links in
//! the kodinerds Musik-Tipps forum thread, enriches entries with
//! title/author metadata and caches everything with stale-while-revalidate
//! semantics so repeated lookups avoid re-scraping.
//!
//! # Overview
//!
//! This crate provides:
//! - A paced HTTP client that never bursts against the forum or the
//!   oEmbed endpoint
//! - HTML parsers for pagination markup, raw video-id extraction and
//!   post-attributed extraction
//! - A crawler that walks all thread pages, survives single-page failures
//!   and supports cooperative cancellation
//! - Three durable caches (full list, latest page, metadata) with a TTL
//!   freshness window and graceful degradation to stale data
//!
//! # Example
//!
//! ```no_run
//! use musiktipps_core::{CancelToken, MusiktippsScraper, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = MusiktippsScraper::new()?;
//!
//!     // Full thread, forum order, deduplicated
//!     let videos = scraper.get_video_list(false, &CancelToken::new()).await;
//!     println!("{} videos in the thread", videos.len());
//!
//!     // Latest page with posting users and resolved metadata
//!     let latest = scraper.get_latest_videos(false).await;
//!     let ids: Vec<String> = latest.iter().map(|e| e.video_id.clone()).collect();
//!     let metadata = scraper.enrich_metadata(&ids).await;
//!
//!     for entry in &latest {
//!         if let Some(meta) = metadata.get(&entry.video_id) {
//!             println!("[{}] {} - {}", entry.username, meta.author, meta.title);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
mod client;
mod crawler;
mod error;
mod metadata;
pub mod parser;
mod scraper;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, ForumClient, RateLimiter};

// Re-export error types
pub use error::{MusiktippsError, Result};

// Re-export cache types
pub use cache::{
    CACHE_VALIDITY, CacheStore, FileStorage, LatestListStore, MemoryStorage, MetadataStore,
    Storage, VideoListStore, upgrade_latest,
};

// Re-export crawler types
pub use crawler::{CancelToken, CrawlerConfig, ThreadCrawler};

// Re-export metadata enrichment
pub use metadata::{EnricherConfig, MetadataEnricher};

// Re-export parser functions
pub use parser::{extract_attributed_videos, extract_video_ids, page_count, video_id_from_url};

// Re-export main scraper API
pub use scraper::{MusiktippsScraper, ScraperConfig};

// Re-export data types
pub use types::{UNKNOWN_USER, VideoEntry, VideoMetadata};
