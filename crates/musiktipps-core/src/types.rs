//! Core data types for the Musik-Tipps scraper

use serde::{Deserialize, Serialize};

/// Display name used when a post carries no readable author element
pub const UNKNOWN_USER: &str = "Unknown";

/// One extracted video reference together with the user who posted it
///
/// Identity is the `video_id`; the username is carried along so reposts by
/// different users stay distinguishable in the "latest" listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoEntry {
    /// 11-character YouTube video identifier
    pub video_id: String,

    /// Display name of the posting user, or [`UNKNOWN_USER`]
    pub username: String,
}

impl VideoEntry {
    /// Create an entry for a video whose posting user is not known
    pub fn unattributed(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            username: UNKNOWN_USER.to_string(),
        }
    }
}

/// Title and author resolved through the oEmbed lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video title
    pub title: String,

    /// Channel or artist name
    pub author: String,
}

impl VideoMetadata {
    /// Placeholder used when the lookup fails
    ///
    /// The video id stands in for the title so the listing stays usable.
    /// Placeholders are never written to the metadata cache, so a later
    /// successful lookup can still replace them.
    pub fn placeholder(video_id: &str) -> Self {
        Self {
            title: video_id.to_string(),
            author: "YouTube".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_entry_serialization() {
        let entry = VideoEntry {
            video_id: "dQw4w9WgXcQ".to_string(),
            username: "musicfan42".to_string(),
        };

        let json = serde_json::to_string(&entry).expect("serialization should succeed");
        assert_eq!(json, r#"{"video_id":"dQw4w9WgXcQ","username":"musicfan42"}"#);

        let back: VideoEntry = serde_json::from_str(&json).expect("deserialization should succeed");
        assert_eq!(entry, back);
    }

    #[test]
    fn test_video_entry_unattributed() {
        let entry = VideoEntry::unattributed("abc123def45");
        assert_eq!(entry.video_id, "abc123def45");
        assert_eq!(entry.username, UNKNOWN_USER);
    }

    #[test]
    fn test_metadata_placeholder() {
        let meta = VideoMetadata::placeholder("abc123def45");
        assert_eq!(meta.title, "abc123def45");
        assert_eq!(meta.author, "YouTube");
    }

    #[test]
    fn test_metadata_serialization() {
        let meta = VideoMetadata {
            title: "Never Gonna Give You Up".to_string(),
            author: "Rick Astley".to_string(),
        };

        let json = serde_json::to_string(&meta).expect("serialization should succeed");
        let back: VideoMetadata =
            serde_json::from_str(&json).expect("deserialization should succeed");
        assert_eq!(meta, back);
    }
}
