//! Metadata enrichment via oEmbed
//!
//! Resolves title and author for a batch of video ids, one lookup at a
//! time. The metadata cache is consulted first; lookups that fail yield a
//! placeholder that is never cached, so a later successful lookup can
//! still improve the record. The cache is written once per batch.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::cache::MetadataStore;
use crate::client::{ClientConfig, ForumClient};
use crate::error::{MusiktippsError, Result};
use crate::types::VideoMetadata;
use crate::url::{OEMBED_URL, build_oembed_url};

/// Configuration for the metadata enricher
#[derive(Debug, Clone)]
pub struct EnricherConfig {
    /// Base URL of the oEmbed endpoint
    pub oembed_url: String,
    /// HTTP client settings; defaults to 5 rps (0.2s between lookups)
    /// and a 5 second timeout
    pub client: ClientConfig,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            oembed_url: OEMBED_URL.to_string(),
            client: ClientConfig {
                requests_per_second: 5.0,
                timeout_secs: 5,
            },
        }
    }
}

/// oEmbed response body; only the fields the listing needs
#[derive(Debug, Deserialize)]
struct OembedResponse {
    title: String,
    author_name: String,
}

/// Resolves title/author metadata for video ids
pub struct MetadataEnricher {
    client: ForumClient,
    oembed_url: String,
}

impl MetadataEnricher {
    /// Create a new enricher with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(EnricherConfig::default())
    }

    /// Create a new enricher with custom configuration
    pub fn with_config(config: EnricherConfig) -> Result<Self> {
        let client = ForumClient::with_config(config.client)?;
        Ok(Self {
            client,
            oembed_url: config.oembed_url,
        })
    }

    /// Resolve metadata for a batch of ids
    ///
    /// Cached entries are returned as-is; misses go to the oEmbed
    /// endpoint. Any lookup failure falls back to the placeholder without
    /// poisoning the cache. The accumulated cache is persisted once at
    /// the end of the batch.
    pub async fn enrich(
        &self,
        video_ids: &[String],
        store: &MetadataStore,
    ) -> HashMap<String, VideoMetadata> {
        let mut cache = store.read();
        let mut results = HashMap::new();

        for video_id in video_ids {
            if let Some(meta) = cache.get(video_id) {
                results.insert(video_id.clone(), meta.clone());
                continue;
            }

            match self.lookup(video_id).await {
                Ok(meta) => {
                    debug!(%video_id, title = %meta.title, author = %meta.author, "metadata resolved");
                    cache.insert(video_id.clone(), meta.clone());
                    results.insert(video_id.clone(), meta);
                }
                Err(e) => {
                    warn!(%video_id, error = %e, "metadata lookup failed, using placeholder");
                    results.insert(video_id.clone(), VideoMetadata::placeholder(video_id));
                }
            }
        }

        if let Err(e) = store.write(&cache) {
            warn!(error = %e, "failed to persist metadata cache");
        }

        results
    }

    /// One oEmbed lookup
    async fn lookup(&self, video_id: &str) -> Result<VideoMetadata> {
        let url = build_oembed_url(&self.oembed_url, video_id);
        let body = self.client.fetch(&url).await?;

        let response: OembedResponse = serde_json::from_str(&body)
            .map_err(|_| MusiktippsError::MetadataLookup(video_id.to_string()))?;

        Ok(VideoMetadata {
            title: response.title,
            author: response.author_name,
        })
    }
}
