//! Command line front-end for the Musik-Tipps thread scraper
//!
//! Exposes the three operator actions: list the whole thread, list the
//! latest page with users and metadata, and clear the caches. Ctrl-C
//! during a full crawl cancels cooperatively and prints whatever was
//! collected so far.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use musiktipps_core::url::{build_playback_url, build_thumbnail_url};
use musiktipps_core::{CancelToken, MusiktippsScraper, ScraperConfig, VideoMetadata};

#[derive(Parser)]
#[command(name = "musiktipps", version, about = "Music tips from the kodinerds forum thread")]
struct Cli {
    /// Directory holding the cache files
    #[arg(long, default_value = "cache")]
    cache_dir: PathBuf,

    /// Override the forum thread URL
    #[arg(long)]
    thread_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every video of the whole thread in forum order
    All {
        /// Ignore the cache and crawl all pages again
        #[arg(long)]
        refresh: bool,
    },
    /// List the latest page with posting users and resolved metadata
    Latest {
        /// Ignore the cache and fetch the latest page again
        #[arg(long)]
        refresh: bool,
    },
    /// Delete all three cache files
    ClearCache,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ScraperConfig {
        cache_dir: cli.cache_dir,
        ..ScraperConfig::default()
    };
    if let Some(url) = cli.thread_url {
        config.thread_url = url;
    }
    let scraper = MusiktippsScraper::with_config(config)?;

    match cli.command {
        Command::All { refresh } => {
            let cancel = CancelToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    ctrl_c.cancel();
                }
            });

            let videos = scraper.get_video_list(refresh, &cancel).await;
            if videos.is_empty() {
                println!("no data - try clearing the cache and refreshing");
                return Ok(());
            }
            for (idx, video_id) in videos.iter().enumerate() {
                println!("{:4}. {}  {}", idx + 1, video_id, build_playback_url(video_id));
            }
        }
        Command::Latest { refresh } => {
            let entries = scraper.get_latest_videos(refresh).await;
            if entries.is_empty() {
                println!("no data - try clearing the cache and refreshing");
                return Ok(());
            }

            let ids: Vec<String> = entries.iter().map(|e| e.video_id.clone()).collect();
            let metadata = scraper.enrich_metadata(&ids).await;

            for (idx, entry) in entries.iter().enumerate() {
                let meta = metadata
                    .get(&entry.video_id)
                    .cloned()
                    .unwrap_or_else(|| VideoMetadata::placeholder(&entry.video_id));
                println!(
                    "[{}] {}. {} - {}",
                    entry.username,
                    idx + 1,
                    meta.author,
                    meta.title
                );
                println!("      play:  {}", build_playback_url(&entry.video_id));
                println!("      thumb: {}", build_thumbnail_url(&entry.video_id));
            }
        }
        Command::ClearCache => {
            scraper.clear_cache()?;
            println!("cache cleared");
        }
    }

    Ok(())
}
