//! Video id extraction
//!
//! Scans raw page HTML for YouTube references in the four embedding
//! conventions used in the thread, plus BBCode `[media]` blocks whose
//! inner URL is re-interpreted through the same conventions. Matches are
//! recorded with their byte offset so the final output follows document
//! order of first occurrence.

use std::collections::HashSet;

use regex::Regex;

/// Direct URL patterns, applied in this fixed order per scan
const ID_PATTERNS: [&str; 4] = [
    r"youtube\.com/embed/([A-Za-z0-9_-]{11})",
    r"youtube-nocookie\.com/embed/([A-Za-z0-9_-]{11})",
    r"youtube\.com/watch\?v=([A-Za-z0-9_-]{11})",
    r"youtu\.be/([A-Za-z0-9_-]{11})",
];

/// BBCode media block; the inner URL goes through [`video_id_from_url`]
const MEDIA_TAG_PATTERN: &str = r"(?i)\[media\]([^\[]+)\[/media\]";

/// Extract all video ids from a document in order of first occurrence
///
/// Matches from all patterns are sorted by byte offset ascending, then
/// deduplicated globally keeping the first occurrence. Every returned id
/// is exactly 11 characters.
pub fn extract_video_ids(html: &str) -> Vec<String> {
    let mut findings = scan_for_ids(html);
    findings.sort_by_key(|(pos, _)| *pos);
    dedup_first_seen(findings.into_iter().map(|(_, id)| id))
}

/// Scan a fragment for video ids, pattern by pattern
///
/// Returns `(byte offset, id)` pairs in pattern-major order; callers that
/// need document order sort by offset afterwards.
pub(crate) fn scan_for_ids(html: &str) -> Vec<(usize, String)> {
    let mut findings = Vec::new();

    for pattern in ID_PATTERNS {
        let Ok(re) = Regex::new(pattern) else { continue };
        for caps in re.captures_iter(html) {
            if let (Some(whole), Some(id)) = (caps.get(0), caps.get(1)) {
                findings.push((whole.start(), id.as_str().to_string()));
            }
        }
    }

    if let Ok(re) = Regex::new(MEDIA_TAG_PATTERN) {
        for caps in re.captures_iter(html) {
            if let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) {
                let url = inner.as_str().replace("&amp;", "&");
                if let Some(id) = video_id_from_url(&url) {
                    findings.push((whole.start(), id));
                }
            }
        }
    }

    findings
}

/// Interpret a URL as a YouTube video reference
///
/// Recognizes watch URLs (`v` query parameter), youtu.be short links and
/// `/embed/` paths on youtube.com or youtube-nocookie.com. A candidate is
/// accepted only if the extracted id is exactly 11 characters.
pub fn video_id_from_url(url: &str) -> Option<String> {
    let candidate = if url.contains("youtube.com") && url.contains("/watch") {
        query_param(url, "v")
    } else if url.contains("youtu.be/") {
        url.split("youtu.be/")
            .nth(1)
            .map(|rest| rest.split(['?', '&', '/']).next().unwrap_or("").to_string())
    } else if (url.contains("youtube.com") || url.contains("youtube-nocookie.com"))
        && url.contains("/embed/")
    {
        url.split("/embed/")
            .nth(1)
            .map(|rest| rest.split(['?', '/']).next().unwrap_or("").to_string())
    } else {
        None
    };

    candidate.filter(|id| is_video_id(id))
}

/// Drop repeated ids, keeping the first occurrence
pub(crate) fn dedup_first_seen(ids: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for id in ids {
        if seen.insert(id.clone()) {
            unique.push(id);
        }
    }

    unique
}

/// True if `s` is a well-formed 11-character video id
pub(crate) fn is_video_id(s: &str) -> bool {
    s.len() == 11
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Read one query parameter from a URL, without percent-decoding
fn query_param(url: &str, key: &str) -> Option<String> {
    let query = url.split('?').nth(1)?;
    for pair in query.split('&') {
        let mut kv = pair.splitn(2, '=');
        if kv.next() == Some(key) {
            return kv.next().map(|v| v.to_string());
        }
    }
    None
}
