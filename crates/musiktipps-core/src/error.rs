//! Error types for the Musik-Tipps scraper
//!
//! One variant per failure kind so callers can pattern-match on the kind
//! instead of inspecting message strings.

use thiserror::Error;

/// Error type for all Musik-Tipps scraper operations
#[derive(Error, Debug)]
pub enum MusiktippsError {
    /// HTTP request failed (network error or timeout)
    #[error("HTTP request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    /// Failed to parse HTML content
    #[error("failed to parse HTML: {0}")]
    Parse(String),

    /// Cache file could not be read or written
    #[error("cache I/O failed: {0}")]
    CacheIo(#[from] std::io::Error),

    /// Cache file exists but does not deserialize to the expected shape
    #[error("cache record is corrupt: {0}")]
    CacheCorrupt(String),

    /// oEmbed metadata lookup failed for a video
    #[error("metadata lookup failed for {0}")]
    MetadataLookup(String),
}

/// Result type alias for Musik-Tipps operations
pub type Result<T> = std::result::Result<T, MusiktippsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_http_status() {
        let error = MusiktippsError::HttpStatus(503);
        assert_eq!(error.to_string(), "unexpected HTTP status 503");
    }

    #[test]
    fn test_error_display_parse_error() {
        let error = MusiktippsError::Parse("missing pagination element".to_string());
        assert_eq!(
            error.to_string(),
            "failed to parse HTML: missing pagination element"
        );
    }

    #[test]
    fn test_error_display_cache_corrupt() {
        let error = MusiktippsError::CacheCorrupt("not a JSON object".to_string());
        assert_eq!(error.to_string(), "cache record is corrupt: not a JSON object");
    }

    #[test]
    fn test_error_display_metadata_lookup() {
        let error = MusiktippsError::MetadataLookup("dQw4w9WgXcQ".to_string());
        assert_eq!(error.to_string(), "metadata lookup failed for dQw4w9WgXcQ");
    }

    #[test]
    fn test_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = MusiktippsError::from(io);
        assert!(matches!(error, MusiktippsError::CacheIo(_)));
    }
}
