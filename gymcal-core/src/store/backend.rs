//! Key-value persistence backends for the workout store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{GymcalError, GymcalResult};

const PROBE_KEY: &str = "__storage_test__";
const TEMP_SUFFIX: &str = ".tmp";

/// String key-value storage with all-or-nothing batch writes.
pub trait Backend {
    fn get(&self, key: &str) -> GymcalResult<Option<String>>;

    /// Write every entry or none of them. Fails with `QuotaExceeded` when the
    /// result would not fit.
    fn set_many(&mut self, entries: &[(&str, &str)]) -> GymcalResult<()>;

    fn remove(&mut self, key: &str) -> GymcalResult<()>;

    fn keys(&self) -> GymcalResult<Vec<String>>;

    fn set(&mut self, key: &str, value: &str) -> GymcalResult<()> {
        self.set_many(&[(key, value)])
    }

    /// Move a value to a new key. Backends that store raw bytes keep them
    /// untouched, even when they are not valid UTF-8.
    fn rename(&mut self, from: &str, to: &str) -> GymcalResult<()> {
        let value = self
            .get(from)?
            .ok_or_else(|| GymcalError::Storage(format!("No value stored under '{}'", from)))?;
        self.set(to, &value)?;
        self.remove(from)
    }

    /// Check that the backend accepts writes.
    fn is_available(&mut self) -> bool {
        self.set(PROBE_KEY, PROBE_KEY).is_ok() && self.remove(PROBE_KEY).is_ok()
    }
}

fn entry_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}

fn check_quota(capacity: Option<u64>, needed: u64) -> GymcalResult<()> {
    match capacity {
        Some(capacity) if needed > capacity => {
            Err(GymcalError::QuotaExceeded { needed, capacity })
        }
        _ => Ok(()),
    }
}

/// In-memory backend, mostly for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: BTreeMap<String, String>,
    capacity: Option<u64>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: u64) -> Self {
        MemoryBackend {
            entries: BTreeMap::new(),
            capacity: Some(capacity),
        }
    }

    fn used_excluding(&self, skip: &[(&str, &str)]) -> u64 {
        self.entries
            .iter()
            .filter(|(k, _)| !skip.iter().any(|(s, _)| s == k))
            .map(|(k, v)| entry_size(k, v))
            .sum()
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> GymcalResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> GymcalResult<()> {
        let incoming: u64 = entries.iter().map(|(k, v)| entry_size(k, v)).sum();
        check_quota(self.capacity, self.used_excluding(entries) + incoming)?;

        for (key, value) in entries {
            self.entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> GymcalResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> GymcalResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// One file per key inside a data directory.
///
/// Writes go to a temp file first and are renamed into place, so a failed
/// save never leaves a truncated blob behind.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
    capacity: Option<u64>,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>, capacity: Option<u64>) -> Self {
        FileBackend {
            dir: dir.into(),
            capacity,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> GymcalResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');

        if !valid {
            return Err(GymcalError::Storage(format!("Invalid storage key '{}'", key)));
        }
        Ok(self.dir.join(key))
    }

    fn used_excluding(&self, skip: &[(&str, &str)]) -> GymcalResult<u64> {
        let mut used = 0;
        for key in self.keys()? {
            if skip.iter().any(|(s, _)| *s == key) {
                continue;
            }
            let len = std::fs::metadata(self.dir.join(&key))?.len();
            used += key.len() as u64 + len;
        }
        Ok(used)
    }
}

impl Backend for FileBackend {
    fn get(&self, key: &str) -> GymcalResult<Option<String>> {
        let path = self.path_for(key)?;

        if path.exists() {
            Ok(Some(std::fs::read_to_string(&path)?))
        } else {
            Ok(None)
        }
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> GymcalResult<()> {
        std::fs::create_dir_all(&self.dir)?;

        if self.capacity.is_some() {
            let incoming: u64 = entries.iter().map(|(k, v)| entry_size(k, v)).sum();
            check_quota(self.capacity, self.used_excluding(entries)? + incoming)?;
        }

        // Stage every value before touching the live files
        let mut staged = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let path = self.path_for(key)?;
            let temp = self.dir.join(format!(".{}{}", key, TEMP_SUFFIX));
            if let Err(e) = std::fs::write(&temp, value) {
                for (temp, _) in &staged {
                    let _ = std::fs::remove_file(temp);
                }
                return Err(e.into());
            }
            staged.push((temp, path));
        }

        for (temp, path) in staged {
            std::fs::rename(&temp, &path)?;
            debug!("Wrote {}", path.display());
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> GymcalResult<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> GymcalResult<()> {
        let from = self.path_for(from)?;
        let to = self.path_for(to)?;
        std::fs::rename(&from, &to)?;
        debug!("Moved {} to {}", from.display(), to.display());
        Ok(())
    }

    fn keys(&self) -> GymcalResult<Vec<String>> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Ok(Vec::new());
        };

        let mut keys: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().to_str().map(String::from))
            .filter(|name| !name.starts_with('.'))
            .collect();

        keys.sort();
        Ok(keys)
    }
}
