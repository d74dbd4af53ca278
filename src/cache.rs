//! Summaries keyed by the exact abstract text.
//!
//! The in-memory map is the source of truth and sits behind a single mutex;
//! every new entry rewrites the whole JSON file while the lock is held, so
//! flushes never interleave. The file holds `{ "<abstract>": "<summary>" }`.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, warn};

pub struct SummaryCache {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl SummaryCache {
    /// Opens the cache backed by `path`, starting from whatever the file
    /// holds. A missing or unreadable file yields an empty cache.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self { path, entries: Mutex::new(entries) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self, abstract_text: &str) -> Option<String> {
        self.entries.lock().await.get(abstract_text).cloned()
    }

    /// Stores one summary and rewrites the file. The entry stays in memory
    /// even when the write fails.
    pub async fn insert(&self, abstract_text: &str, summary: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(abstract_text.to_string(), summary.to_string());
        persist(&self.path, &entries).await
    }

    /// Forgets every entry and deletes the file.
    pub async fn reset(&self) -> io::Result<()> {
        let mut entries = self.entries.lock().await;
        entries.clear();
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "summary cache reset");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

fn load_entries(path: &Path) -> HashMap<String, String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            warn!(path = %path.display(), "unreadable summary cache, starting empty: {e}");
            return HashMap::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(path = %path.display(), "corrupt summary cache, starting empty: {e}");
        HashMap::new()
    })
}

/// Full overwrite through a sibling temp file so readers never see half a
/// document.
async fn persist(path: &Path, entries: &HashMap<String, String>) -> io::Result<()> {
    let json = serde_json::to_vec(entries)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn read_file(path: &Path) -> HashMap<String, String> {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempdir().unwrap();
        let cache = SummaryCache::open(dir.path().join("cache.json"));
        assert!(cache.is_empty().await);
        assert_eq!(cache.get("anything").await, None);
    }

    #[tokio::test]
    async fn corrupt_file_opens_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{ not json").unwrap();

        let cache = SummaryCache::open(&path);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn existing_file_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, r#"{"an abstract":"a summary"}"#).unwrap();

        let cache = SummaryCache::open(&path);
        assert_eq!(cache.get("an abstract").await.as_deref(), Some("a summary"));
    }

    #[tokio::test]
    async fn insert_rewrites_the_whole_mapping() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let cache = SummaryCache::open(&path);

        cache.insert("A", "summary of A").await.unwrap();
        cache.insert("B", "summary of B").await.unwrap();

        let on_disk = read_file(&path);
        assert_eq!(on_disk.len(), 2);
        assert_eq!(on_disk["A"], "summary of A");
        assert_eq!(on_disk["B"], "summary of B");
        assert!(!dir.path().join("cache.json.tmp").exists());
    }

    #[tokio::test]
    async fn keys_are_matched_verbatim() {
        let dir = tempdir().unwrap();
        let cache = SummaryCache::open(dir.path().join("cache.json"));

        cache.insert("  Spaced abstract\n", "s").await.unwrap();
        assert_eq!(cache.get("Spaced abstract").await, None);
        assert_eq!(cache.get("  Spaced abstract\n").await.as_deref(), Some("s"));
    }

    #[tokio::test]
    async fn reset_clears_memory_and_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let cache = SummaryCache::open(&path);
        cache.insert("A", "S").await.unwrap();

        cache.reset().await.unwrap();

        assert!(cache.is_empty().await);
        assert!(!path.exists());
        // a second reset with no file is fine
        cache.reset().await.unwrap();
    }

    #[tokio::test]
    async fn failed_write_keeps_the_entry_in_memory() {
        let dir = tempdir().unwrap();
        let cache = SummaryCache::open(dir.path().join("missing-dir").join("cache.json"));

        assert!(cache.insert("A", "S").await.is_err());
        assert_eq!(cache.get("A").await.as_deref(), Some("S"));
    }
}
