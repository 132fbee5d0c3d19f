//! Post-attributed video extraction
//!
//! Partitions a thread page into posts, reads each post's author and runs
//! the video-id scan against the post body only. Duplicates are dropped
//! within a post but deliberately kept across posts: a video re-posted by
//! a different user is a distinct recommendation.

use scraper::{Html, Selector};
use tracing::debug;

use crate::parser::videos::scan_for_ids;
use crate::types::{UNKNOWN_USER, VideoEntry};

/// Extract attributed video entries from a thread page
///
/// Posts are visited in document order. Within a post, ids keep the
/// pattern-scan order and are deduplicated; across posts no dedup is
/// applied. Broken markup degrades to an empty result, never an error.
pub fn extract_attributed_videos(html: &str) -> Vec<VideoEntry> {
    let document = Html::parse_document(html);

    let (Ok(post_selector), Ok(author_selector), Ok(body_selector)) = (
        Selector::parse("article.message"),
        Selector::parse(r#"span[itemprop="name"]"#),
        Selector::parse("div.messageBody"),
    ) else {
        return Vec::new();
    };

    let mut entries = Vec::new();

    for post in document.select(&post_selector) {
        let username = post
            .select(&author_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_USER.to_string());

        let Some(body) = post.select(&body_selector).next() else {
            continue;
        };

        let body_html = body.html();
        let mut seen_in_post = std::collections::HashSet::new();

        for (_, video_id) in scan_for_ids(&body_html) {
            if seen_in_post.insert(video_id.clone()) {
                debug!(%video_id, %username, "found attributed video");
                entries.push(VideoEntry {
                    video_id,
                    username: username.clone(),
                });
            }
        }
    }

    entries
}
