//! Pagination parser
//!
//! Determines how many pages the forum thread has from one page's HTML.
//! Undercounting only limits the scrape, so this parser never fails: any
//! missing or malformed markup yields a count of 1.

use regex::Regex;
use scraper::{Html, Selector};

/// Determine the total page count of the thread
///
/// Primary signal is the `count` attribute of the
/// `woltlab-core-pagination` element. When that is absent, falls back to
/// the highest `pageNo` query parameter found in pagination links.
/// Defaults to 1 if neither signal is present.
pub fn page_count(html: &str) -> usize {
    let document = Html::parse_document(html);

    if let Ok(selector) = Selector::parse("woltlab-core-pagination")
        && let Some(element) = document.select(&selector).next()
        && let Some(count) = element.value().attr("count")
        && let Ok(n) = count.trim().parse::<usize>()
        && n >= 1
    {
        return n;
    }

    max_page_from_links(html)
}

/// Fallback scan: highest pageNo query parameter seen anywhere in the page
fn max_page_from_links(html: &str) -> usize {
    let mut max_page = 1;

    if let Ok(re) = Regex::new(r"pageNo=(\d+)") {
        for caps in re.captures_iter(html) {
            if let Ok(n) = caps[1].parse::<usize>() {
                max_page = max_page.max(n);
            }
        }
    }

    max_page
}
