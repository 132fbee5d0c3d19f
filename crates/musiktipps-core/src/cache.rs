//! Durable caches with TTL freshness and stale fallback
//!
//! Three stores share the same machinery: the full video list and the
//! latest-page list use a `{videos, timestamp}` envelope with a validity
//! window; the metadata store is a flat map that is always consulted and
//! merged, never expired as a whole. Storage is a trait so tests can swap
//! the cache files for an in-memory slot.
//!
//! A read that finds no record, an unreadable record or malformed JSON
//! reports "absent" instead of failing the caller. The timestamp only
//! advances on a successful write.

use std::collections::HashMap;
use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::types::{UNKNOWN_USER, VideoEntry, VideoMetadata};

/// Validity window after which a cached record counts as stale
pub const CACHE_VALIDITY: Duration = Duration::from_secs(86400);

/// File name of the full-thread video list cache
pub const FULL_LIST_FILE: &str = "video_cache.json";

/// File name of the latest-page cache
pub const LATEST_LIST_FILE: &str = "latest_videos_cache.json";

/// File name of the per-video metadata cache
pub const METADATA_FILE: &str = "metadata_cache.json";

/// Current unix time in seconds
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Backing storage for one cache record
pub trait Storage: Send + Sync {
    /// Load the whole record; absent or unreadable content yields `None`
    fn load(&self) -> Option<String>;

    /// Overwrite the whole record
    fn store(&self, contents: &str) -> Result<()>;

    /// Delete the record; absent records are not an error
    fn remove(&self) -> Result<()>;
}

/// File-backed storage, one JSON document per file
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }

    fn store(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // Write-then-rename so readers never see a half-written record
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage for tests and cache-less operation
#[derive(Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Option<String> {
        self.slot.lock().ok()?.clone()
    }

    fn store(&self, contents: &str) -> Result<()> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(contents.to_string());
        }
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
        Ok(())
    }
}

/// On-disk envelope shared by the two list caches
#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    videos: T,
    timestamp: u64,
}

/// TTL-checked cache over one `{videos, timestamp}` record
pub struct CacheStore<T> {
    storage: Box<dyn Storage>,
    validity: Duration,
    _payload: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> CacheStore<T> {
    pub fn new(storage: Box<dyn Storage>, validity: Duration) -> Self {
        Self {
            storage,
            validity,
            _payload: PhantomData,
        }
    }

    /// Read the cached payload and its write timestamp
    ///
    /// Absent or corrupt records yield `None`.
    pub fn read(&self) -> Option<(T, u64)> {
        let raw = self.storage.load()?;
        match serde_json::from_str::<Envelope<T>>(&raw) {
            Ok(envelope) => Some((envelope.videos, envelope.timestamp)),
            Err(e) => {
                warn!(error = %e, "treating corrupt cache record as absent");
                None
            }
        }
    }

    /// Overwrite the record with `payload` stamped with the current time
    pub fn write(&self, payload: &T) -> Result<()> {
        let envelope = Envelope {
            videos: payload,
            timestamp: unix_now(),
        };
        let contents = serde_json::to_string_pretty(&envelope)
            .map_err(|e| crate::error::MusiktippsError::CacheCorrupt(e.to_string()))?;
        self.storage.store(&contents)
    }

    /// Delete the record; idempotent
    pub fn clear(&self) -> Result<()> {
        self.storage.remove()
    }

    /// Whether a record written at `timestamp` is still inside the window
    pub fn is_fresh(&self, timestamp: u64) -> bool {
        unix_now().saturating_sub(timestamp) < self.validity.as_secs()
    }
}

/// One element of the persisted latest-page list
///
/// Legacy records stored plain id strings; current records store full
/// entries. Untagged so both shapes deserialize from the same array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLatestEntry {
    Entry(VideoEntry),
    Id(String),
}

/// Upgrade a persisted latest-page payload to the current shape
///
/// Pure transform: legacy id strings become entries with an unknown user,
/// current entries pass through untouched. The file itself is only
/// rewritten by the next explicit write.
pub fn upgrade_latest(raw: Vec<RawLatestEntry>) -> Vec<VideoEntry> {
    raw.into_iter()
        .map(|element| match element {
            RawLatestEntry::Entry(entry) => entry,
            RawLatestEntry::Id(video_id) => VideoEntry {
                video_id,
                username: UNKNOWN_USER.to_string(),
            },
        })
        .collect()
}

/// Cache of the full-thread id list
pub type VideoListStore = CacheStore<Vec<String>>;

/// Cache of the latest-page entry list, with legacy upgrade on read
pub struct LatestListStore {
    inner: CacheStore<Vec<RawLatestEntry>>,
}

impl LatestListStore {
    pub fn new(storage: Box<dyn Storage>, validity: Duration) -> Self {
        Self {
            inner: CacheStore::new(storage, validity),
        }
    }

    pub fn read(&self) -> Option<(Vec<VideoEntry>, u64)> {
        self.inner
            .read()
            .map(|(raw, timestamp)| (upgrade_latest(raw), timestamp))
    }

    pub fn write(&self, entries: &[VideoEntry]) -> Result<()> {
        let raw: Vec<RawLatestEntry> = entries
            .iter()
            .cloned()
            .map(RawLatestEntry::Entry)
            .collect();
        self.inner.write(&raw)
    }

    pub fn clear(&self) -> Result<()> {
        self.inner.clear()
    }

    pub fn is_fresh(&self, timestamp: u64) -> bool {
        self.inner.is_fresh(timestamp)
    }
}

/// Cache of per-video metadata
///
/// A flat `video_id -> metadata` map without a timestamp: always
/// consulted, merged on write and never expired as a whole.
pub struct MetadataStore {
    storage: Box<dyn Storage>,
}

impl MetadataStore {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Read the whole map; absent or corrupt records yield an empty map
    pub fn read(&self) -> HashMap<String, VideoMetadata> {
        let Some(raw) = self.storage.load() else {
            return HashMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "treating corrupt metadata cache as empty");
                HashMap::new()
            }
        }
    }

    /// Overwrite the map
    pub fn write(&self, metadata: &HashMap<String, VideoMetadata>) -> Result<()> {
        let contents = serde_json::to_string_pretty(metadata)
            .map_err(|e| crate::error::MusiktippsError::CacheCorrupt(e.to_string()))?;
        self.storage.store(&contents)
    }

    /// Delete the record; idempotent
    pub fn clear(&self) -> Result<()> {
        self.storage.remove()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store<T: Serialize + DeserializeOwned>() -> CacheStore<T> {
        CacheStore::new(Box::new(MemoryStorage::new()), CACHE_VALIDITY)
    }

    #[test]
    fn test_read_absent_record() {
        let store: VideoListStore = memory_store();
        assert!(store.read().is_none());
    }

    #[test]
    fn test_write_then_read_is_fresh() {
        let store: VideoListStore = memory_store();
        let videos = vec!["abc123def45".to_string(), "xyz987uvw12".to_string()];

        store.write(&videos).expect("write should succeed");

        let (read_back, timestamp) = store.read().expect("record should exist");
        assert_eq!(read_back, videos);
        assert!(store.is_fresh(timestamp));
    }

    #[test]
    fn test_old_timestamp_is_stale() {
        let store: VideoListStore = memory_store();
        let yesterday_and_more = unix_now() - 90_000;
        assert!(!store.is_fresh(yesterday_and_more));
        assert!(store.is_fresh(unix_now()));
    }

    #[test]
    fn test_corrupt_record_reads_as_absent() {
        let storage = Box::new(MemoryStorage::new());
        storage.store("{not json at all").unwrap();
        let store: VideoListStore = CacheStore::new(storage, CACHE_VALIDITY);
        assert!(store.read().is_none());
    }

    #[test]
    fn test_wrong_shape_reads_as_absent() {
        let storage = Box::new(MemoryStorage::new());
        storage.store(r#"{"videos": 42, "timestamp": "soon"}"#).unwrap();
        let store: VideoListStore = CacheStore::new(storage, CACHE_VALIDITY);
        assert!(store.read().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store: VideoListStore = memory_store();
        store.write(&vec!["abc123def45".to_string()]).unwrap();
        store.clear().expect("first clear should succeed");
        store.clear().expect("second clear should succeed");
        assert!(store.read().is_none());
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store: VideoListStore = CacheStore::new(
            Box::new(FileStorage::new(dir.path().join(FULL_LIST_FILE))),
            CACHE_VALIDITY,
        );

        store.write(&vec!["abc123def45".to_string()]).unwrap();
        let (videos, _) = store.read().expect("record should exist");
        assert_eq!(videos, vec!["abc123def45"]);

        store.clear().unwrap();
        assert!(store.read().is_none());
    }

    #[test]
    fn test_file_storage_remove_missing_file_ok() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path().join("missing.json"));
        assert!(storage.remove().is_ok());
    }

    #[test]
    fn test_upgrade_latest_from_legacy_strings() {
        let raw = vec![
            RawLatestEntry::Id("abc12345678".to_string()),
            RawLatestEntry::Id("def98765432".to_string()),
        ];
        let entries = upgrade_latest(raw);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].video_id, "abc12345678");
        assert_eq!(entries[0].username, UNKNOWN_USER);
        assert_eq!(entries[1].username, UNKNOWN_USER);
    }

    #[test]
    fn test_upgrade_latest_passes_current_entries_through() {
        let entry = VideoEntry {
            video_id: "abc12345678".to_string(),
            username: "alice".to_string(),
        };
        let upgraded = upgrade_latest(vec![RawLatestEntry::Entry(entry.clone())]);
        assert_eq!(upgraded, vec![entry]);
    }

    #[test]
    fn test_latest_store_reads_legacy_file() {
        let storage = Box::new(MemoryStorage::new());
        storage
            .store(r#"{"videos": ["abc12345678"], "timestamp": 1700000000}"#)
            .unwrap();
        let store = LatestListStore::new(storage, CACHE_VALIDITY);

        let (entries, timestamp) = store.read().expect("record should exist");
        assert_eq!(timestamp, 1_700_000_000);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].video_id, "abc12345678");
        assert_eq!(entries[0].username, UNKNOWN_USER);
    }

    #[test]
    fn test_latest_store_legacy_upgrade_does_not_rewrite() {
        let html = r#"{"videos": ["abc12345678"], "timestamp": 1700000000}"#;
        let storage = MemoryStorage::new();
        storage.store(html).unwrap();
        let raw_before = storage.load();

        let store = LatestListStore::new(Box::new(storage), CACHE_VALIDITY);
        store.read().expect("record should exist");

        // Read-side upgrade must not touch the persisted record. The
        // boxed storage is owned by the store now, so re-read through it.
        assert_eq!(store.inner.storage.load(), raw_before);
    }

    #[test]
    fn test_latest_store_roundtrip() {
        let store = LatestListStore::new(Box::new(MemoryStorage::new()), CACHE_VALIDITY);
        let entries = vec![
            VideoEntry {
                video_id: "abc12345678".to_string(),
                username: "alice".to_string(),
            },
            VideoEntry::unattributed("def98765432"),
        ];

        store.write(&entries).unwrap();
        let (read_back, timestamp) = store.read().expect("record should exist");
        assert_eq!(read_back, entries);
        assert!(store.is_fresh(timestamp));
    }

    #[test]
    fn test_metadata_store_roundtrip() {
        let store = MetadataStore::new(Box::new(MemoryStorage::new()));
        let mut map = HashMap::new();
        map.insert(
            "abc12345678".to_string(),
            VideoMetadata {
                title: "Song".to_string(),
                author: "Artist".to_string(),
            },
        );

        store.write(&map).unwrap();
        assert_eq!(store.read(), map);
    }

    #[test]
    fn test_metadata_store_absent_and_corrupt_read_empty() {
        let store = MetadataStore::new(Box::new(MemoryStorage::new()));
        assert!(store.read().is_empty());

        let storage = Box::new(MemoryStorage::new());
        storage.store("][").unwrap();
        let store = MetadataStore::new(storage);
        assert!(store.read().is_empty());
    }
}
