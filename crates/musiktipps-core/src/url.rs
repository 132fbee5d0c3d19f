//! URL helper functions
//!
//! Builders for forum page URLs, YouTube watch/oEmbed URLs and the
//! playback hand-off URI consumed by the external player.

/// Default base URL of the Musik-Tipps forum thread
pub const FORUM_THREAD_URL: &str = "https://www.kodinerds.net/thread/13225-musik-tipps";

/// Default oEmbed endpoint used for metadata lookups
pub const OEMBED_URL: &str = "https://www.youtube.com/oembed";

/// Plugin scheme of the external player that performs playback
pub const PLAYER_SCHEME: &str = "plugin://plugin.video.youtube";

/// Builds the URL of one thread page
///
/// Page 1 is the bare thread URL; later pages are addressed through the
/// `pageNo` query parameter.
///
/// # Example
/// ```
/// use musiktipps_core::url::build_page_url;
/// let url = build_page_url("https://forum.example/thread/music", 3);
/// assert_eq!(url, "https://forum.example/thread/music?pageNo=3");
/// assert_eq!(build_page_url("https://forum.example/thread/music", 1),
///            "https://forum.example/thread/music");
/// ```
pub fn build_page_url(thread_url: &str, page: usize) -> String {
    if page <= 1 {
        thread_url.to_string()
    } else {
        format!("{}?pageNo={}", thread_url, page)
    }
}

/// Builds the canonical YouTube watch URL for a video id
///
/// # Example
/// ```
/// use musiktipps_core::url::build_watch_url;
/// assert_eq!(build_watch_url("dQw4w9WgXcQ"),
///            "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
/// ```
pub fn build_watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Builds the oEmbed lookup URL for a video id
///
/// The watch URL is percent-encoded into the `url` parameter.
///
/// # Example
/// ```
/// use musiktipps_core::url::{build_oembed_url, OEMBED_URL};
/// let url = build_oembed_url(OEMBED_URL, "dQw4w9WgXcQ");
/// assert_eq!(
///     url,
///     "https://www.youtube.com/oembed?url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3DdQw4w9WgXcQ&format=json"
/// );
/// ```
pub fn build_oembed_url(oembed_base: &str, video_id: &str) -> String {
    let watch_url = build_watch_url(video_id);
    format!(
        "{}?url={}&format=json",
        oembed_base,
        urlencoding::encode(&watch_url)
    )
}

/// Builds the playback hand-off URI for the external player
///
/// The core never plays media itself; the presentation layer invokes this
/// URI to delegate playback.
///
/// # Example
/// ```
/// use musiktipps_core::url::build_playback_url;
/// assert_eq!(build_playback_url("dQw4w9WgXcQ"),
///            "plugin://plugin.video.youtube/play/?video_id=dQw4w9WgXcQ");
/// ```
pub fn build_playback_url(video_id: &str) -> String {
    format!("{}/play/?video_id={}", PLAYER_SCHEME, video_id)
}

/// Builds the thumbnail URL for a video id
///
/// # Example
/// ```
/// use musiktipps_core::url::build_thumbnail_url;
/// assert_eq!(build_thumbnail_url("dQw4w9WgXcQ"),
///            "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg");
/// ```
pub fn build_thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/hqdefault.jpg", video_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_page_url_first_page() {
        let url = build_page_url(FORUM_THREAD_URL, 1);
        assert_eq!(url, FORUM_THREAD_URL);
    }

    #[test]
    fn test_build_page_url_zero_is_first_page() {
        let url = build_page_url(FORUM_THREAD_URL, 0);
        assert_eq!(url, FORUM_THREAD_URL);
    }

    #[test]
    fn test_build_page_url_later_page() {
        let url = build_page_url(FORUM_THREAD_URL, 17);
        assert_eq!(
            url,
            "https://www.kodinerds.net/thread/13225-musik-tipps?pageNo=17"
        );
    }

    #[test]
    fn test_build_watch_url() {
        assert_eq!(
            build_watch_url("abc123def45"),
            "https://www.youtube.com/watch?v=abc123def45"
        );
    }

    #[test]
    fn test_build_oembed_url_encodes_watch_url() {
        let url = build_oembed_url(OEMBED_URL, "abc123def45");
        assert!(url.starts_with("https://www.youtube.com/oembed?url=https%3A%2F%2F"));
        assert!(url.ends_with("&format=json"));
        assert!(!url.contains("watch?v="));
    }

    #[test]
    fn test_build_playback_url() {
        assert_eq!(
            build_playback_url("abc123def45"),
            "plugin://plugin.video.youtube/play/?video_id=abc123def45"
        );
    }

    #[test]
    fn test_build_thumbnail_url() {
        assert_eq!(
            build_thumbnail_url("abc123def45"),
            "https://img.youtube.com/vi/abc123def45/hqdefault.jpg"
        );
    }
}
