use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use color_eyre::eyre::Result;
use tracing::warn;

/// Narrow key-value interface to whatever outlives a session.
pub trait ScoreStore {
    fn read(&self, key: &str) -> Result<Option<u64>>;
    fn write(&mut self, key: &str, value: u64) -> Result<()>;
}

/// A JSON object of integers in a single file, rewritten atomically.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: HashMap<String, u64>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                warn!("Ignoring unreadable store {}: {e}", path.display());
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&self.entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<u64>> {
        Ok(self.entries.get(key).copied())
    }

    fn write(&mut self, key: &str, value: u64) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.save()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore(HashMap<String, u64>);

impl ScoreStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<u64>> {
        Ok(self.0.get(key).copied())
    }

    fn write(&mut self, key: &str, value: u64) -> Result<()> {
        self.0.insert(key.to_string(), value);
        Ok(())
    }
}

/// Reads a score, treating a missing or unreadable entry as zero.
pub fn read_score(store: &dyn ScoreStore, key: &str) -> u64 {
    match store.read(key) {
        Ok(value) => value.unwrap_or(0),
        Err(e) => {
            warn!("Failed to read `{key}`: {e}");
            0
        },
    }
}

/// Stores `score` under `key` if it beats the stored value and returns the best of the two.
pub fn record_best(store: &mut dyn ScoreStore, key: &str, score: u64) -> u64 {
    let best = read_score(store, key);
    if score > best {
        if let Err(e) = store.write(key, score) {
            warn!("Failed to persist `{key}`: {e}");
        }
        score
    } else {
        best
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn temp_store_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("storm-bird-{}-{name}", std::process::id())).join("store.json")
    }

    #[test]
    fn test_record_best_keeps_maximum() {
        let mut store = MemoryStore::default();
        assert_eq!(record_best(&mut store, "high_score", 3), 3);
        assert_eq!(record_best(&mut store, "high_score", 1), 3);
        assert_eq!(read_score(&store, "high_score"), 3);
        assert_eq!(record_best(&mut store, "high_score", 7), 7);
        assert_eq!(read_score(&store, "high_score"), 7);
    }

    #[test]
    fn test_missing_key_reads_as_zero() {
        let store = MemoryStore::default();
        assert_eq!(read_score(&store, "high_score"), 0);
    }

    #[test]
    fn test_file_store_survives_reopen() -> Result<()> {
        let path = temp_store_path("reopen");
        let _ = fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path);
        store.write("high_score", 12)?;

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.read("high_score")?, Some(12));
        assert!(!path.with_extension("json.tmp").exists());

        fs::remove_dir_all(path.parent().unwrap())?;
        Ok(())
    }

    #[test]
    fn test_corrupt_file_starts_empty() -> Result<()> {
        let path = temp_store_path("corrupt");
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(&path, "not json")?;

        let store = JsonFileStore::open(&path);
        assert_eq!(store.read("high_score")?, None);

        fs::remove_dir_all(path.parent().unwrap())?;
        Ok(())
    }
}
