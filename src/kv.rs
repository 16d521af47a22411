//! JSON-file key-value store.
//!
//! The whole file is one JSON object of named slots. It is read once at open,
//! mirrored in memory, and rewritten wholesale on every [`KvStore::set`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("store I/O failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// A key-value store backed by a single JSON file, or by nothing at all
/// when opened with [`KvStore::in_memory`].
#[derive(Debug)]
pub struct KvStore {
    path: Option<PathBuf>,
    slots: Map<String, Value>,
}

impl KvStore {
    /// Open (or lazily create) the store file at `path`.
    ///
    /// A missing file is an empty store; the file and its parent directory
    /// are created on the first write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, KvError> {
        let path = path.as_ref().to_path_buf();

        let slots = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Map::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(source) => return Err(KvError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), slots = slots.len(), "key-value store opened");
        Ok(Self {
            path: Some(path),
            slots,
        })
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            slots: Map::new(),
        }
    }

    /// Read and deserialize a slot. `Ok(None)` when the slot is unset.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, KvError> {
        self.slots
            .get(key)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .map_err(KvError::from)
    }

    /// Read a slot, falling back to `T::default()` when unset.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, KvError> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    /// Replace a slot and persist the whole store before returning.
    ///
    /// The mirror only changes once the file is written; on error the store
    /// still holds what is on disk.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), KvError> {
        let value = serde_json::to_value(value)?;
        let mut slots = self.slots.clone();
        slots.insert(key.to_string(), value);
        self.flush(&slots)?;
        self.slots = slots;
        Ok(())
    }

    /// Write `slots` to disk (tmp file, then rename over the store file).
    fn flush(&self, slots: &Map<String, Value>) -> Result<(), KvError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err(parent))?;
        }

        let json = serde_json::to_vec_pretty(slots)?;
        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, json).map_err(io_err(&tmp_path))?;
        std::fs::rename(&tmp_path, path).map_err(io_err(path))?;

        tracing::trace!(path = %path.display(), "key-value store flushed");
        Ok(())
    }
}

fn io_err(at: &Path) -> impl FnOnce(std::io::Error) -> KvError {
    let path = at.to_path_buf();
    move |source| KvError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_slot_is_none() {
        let store = KvStore::in_memory();
        let value: Option<Vec<String>> = store.get("nothing-here").unwrap();
        assert!(value.is_none());
        let fallback: Vec<String> = store.get_or_default("nothing-here").unwrap();
        assert!(fallback.is_empty());
    }

    #[test]
    fn set_persists_and_reopens() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("store.json");

        let mut store = KvStore::open(&path).unwrap();
        assert!(!path.exists(), "open must not create the file");

        store.set("colors", &vec!["red", "green"]).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());

        let reopened = KvStore::open(&path).unwrap();
        let colors: Vec<String> = reopened.get("colors").unwrap().unwrap();
        assert_eq!(colors, vec!["red", "green"]);
    }

    #[test]
    fn other_slots_survive_a_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        std::fs::write(&path, r#"{"windowBounds": {"width": 1200}}"#).unwrap();

        let mut store = KvStore::open(&path).unwrap();
        store.set("count", &3u32).unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["windowBounds"]["width"], 1200);
        assert_eq!(raw["count"], 3);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = KvStore::open(&path).unwrap_err();
        assert!(matches!(err, KvError::Json(_)));
    }

    #[test]
    fn failed_write_keeps_previous_value() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        let mut store = KvStore::open(&path).unwrap();
        store.set("count", &1u32).unwrap();

        // A directory in the way of the tmp file makes the write fail.
        let tmp_path = path.with_extension("tmp");
        std::fs::create_dir(&tmp_path).unwrap();

        let err = store.set("count", &2u32).unwrap_err();
        match err {
            KvError::Io { path: at, .. } => assert_eq!(at, tmp_path),
            other => panic!("expected Io error, got {other:?}"),
        }
        assert_eq!(store.get::<u32>("count").unwrap(), Some(1));

        let reopened = KvStore::open(&path).unwrap();
        assert_eq!(reopened.get::<u32>("count").unwrap(), Some(1));
    }

    #[test]
    fn empty_file_is_an_empty_store() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        std::fs::write(&path, "").unwrap();

        let store = KvStore::open(&path).unwrap();
        assert!(store.get::<u32>("anything").unwrap().is_none());
    }
}
