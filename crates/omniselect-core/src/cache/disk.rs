use std::fmt::Write as _;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::CacheStore;
use crate::error::Result;
use crate::state::CacheEntry;

/// JSON-file store: one file per query under a directory, kept across runs.
pub struct DiskStore<O> {
    dir: PathBuf,
    _marker: PhantomData<fn() -> O>,
}

#[derive(Serialize, Deserialize)]
struct StoredEntry<O> {
    query: String,
    entry: CacheEntry<O>,
}

/// File name derived from a SHA-256 of the query, so entries stay
/// addressable across runs and toolchain versions.
fn key_to_path(dir: &Path, key: &str) -> PathBuf {
    let digest = Sha256::digest(key.as_bytes());
    let mut name = String::with_capacity(37);
    for byte in &digest[..16] {
        let _ = write!(name, "{byte:02x}");
    }
    name.push_str(".json");
    dir.join(name)
}

impl<O> DiskStore<O> {
    /// Store under `~/.cache/omniselect/<namespace>`.
    pub fn new(namespace: &str) -> Result<Self> {
        let dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("omniselect")
            .join(namespace);
        Self::at(dir)
    }

    pub fn at(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            _marker: PhantomData,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl<O> DiskStore<O>
where
    O: DeserializeOwned,
{
    fn read(&self, key: &str) -> Option<CacheEntry<O>> {
        let path = key_to_path(&self.dir, key);
        let data = std::fs::read(&path).ok()?;
        match serde_json::from_slice::<StoredEntry<O>>(&data) {
            // hash collision: the file belongs to another query
            Ok(stored) if stored.query != key => None,
            Ok(stored) => Some(stored.entry),
            Err(e) => {
                tracing::warn!(path = %path.display(), "discarding unreadable cache file: {e}");
                let _ = std::fs::remove_file(&path);
                None
            }
        }
    }
}

impl<O> CacheStore<O> for DiskStore<O>
where
    O: Serialize + DeserializeOwned,
{
    fn contains(&self, key: &str) -> bool {
        self.read(key).is_some()
    }

    fn get(&mut self, key: &str) -> Option<CacheEntry<O>> {
        self.read(key)
    }

    fn set(&mut self, key: &str, entry: CacheEntry<O>) {
        let path = key_to_path(&self.dir, key);
        let stored = StoredEntry {
            query: key.to_string(),
            entry,
        };
        match serde_json::to_vec(&stored) {
            Ok(data) => {
                if let Err(e) = std::fs::write(&path, data) {
                    tracing::warn!(path = %path.display(), "failed to write cache file: {e}");
                }
            }
            Err(e) => tracing::warn!("failed to serialize cache entry: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_store_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let mut store: DiskStore<String> = DiskStore::at(tmp.path()).unwrap();
            store.set(
                "cafe",
                CacheEntry {
                    page: 2,
                    options: vec!["Café Central".to_string()],
                    has_reached_last_page: true,
                },
            );
        }

        let mut reopened: DiskStore<String> = DiskStore::at(tmp.path()).unwrap();
        assert!(reopened.contains("cafe"));
        let entry = reopened.get("cafe").unwrap();
        assert_eq!(entry.page, 2);
        assert_eq!(entry.options, vec!["Café Central".to_string()]);
        assert!(entry.has_reached_last_page);
        assert!(!reopened.contains("tea"));
    }

    #[test]
    fn test_disk_store_drops_corrupt_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store: DiskStore<u32> = DiskStore::at(tmp.path()).unwrap();
        let path = key_to_path(tmp.path(), "broken");
        std::fs::write(&path, b"not json").unwrap();

        assert!(store.get("broken").is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_file_name_is_stable() {
        // first 16 bytes of SHA-256("cafe")
        assert_eq!(
            key_to_path(Path::new("/cache"), "cafe"),
            Path::new("/cache/a860b858265b22dad3aaf1165cfc2936.json")
        );
        assert_ne!(
            key_to_path(Path::new("/cache"), "cafe"),
            key_to_path(Path::new("/cache"), "tea")
        );
    }
}
