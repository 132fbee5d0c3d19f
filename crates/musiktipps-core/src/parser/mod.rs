//! HTML parsers for the forum thread
//!
//! Contains modules for pagination markup, raw video-id extraction and
//! post-attributed extraction.

pub mod pagination;
pub mod posts;
pub mod videos;

pub use pagination::page_count;
pub use posts::extract_attributed_videos;
pub use videos::{extract_video_ids, video_id_from_url};
