//! Key-value persistence gateway.
//!
//! All values are strings, mirroring a mobile key-value store. Typed access
//! lives in [`crate::records`]; this module only moves strings.

use crate::{Error, Result};
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// String key-value storage used by the trackers
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Write several keys together. Implementations that can do this in one
    /// atomic write should override the default.
    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Run a read-modify-write as one unit.
    ///
    /// `f` sees a staged copy of every key. Its writes are committed only if
    /// it returns `Ok`, and no other writer can interleave between the read
    /// and the commit.
    fn transact(&mut self, f: &mut dyn FnMut(&mut MemoryStore) -> Result<()>) -> Result<()>;
}

/// In-memory store, used by tests and embedders
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn transact(&mut self, f: &mut dyn FnMut(&mut MemoryStore) -> Result<()>) -> Result<()> {
        let mut staged = self.clone();
        f(&mut staged)?;
        *self = staged;
        Ok(())
    }
}

/// A single JSON object on disk holding every key.
///
/// Reads take a shared lock on the data file. Writes hold an exclusive lock
/// on a sidecar `.lock` file for the whole read-modify-write, then replace
/// the data file atomically via a temp file and rename.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("json.lock")
    }

    /// Read the whole map. Missing or corrupt files read as empty.
    pub fn load_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            tracing::debug!("No store file at {:?}, starting empty", self.path);
            return Ok(BTreeMap::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
            Ok(map) => {
                tracing::debug!("Loaded {} keys from {:?}", map.len(), self.path);
                Ok(map)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse store file {:?}: {}. Treating as empty.",
                    self.path,
                    e
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, map: &BTreeMap<String, String>) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Persistence("store path missing parent".into()))?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(map)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Apply `f` to the stored map under an exclusive lock and write it back.
    /// Nothing is written if `f` fails.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> Result<T>,
    {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;

        let result = self.load_all().and_then(|mut map| {
            let value = f(&mut map)?;
            self.write_all(&map)?;
            Ok(value)
        });

        lock.unlock()?;
        let value = result?;
        tracing::debug!("Saved store to {:?}", self.path);
        Ok(value)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.update(|map| {
            map.insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<()> {
        self.update(|map| {
            for (key, value) in entries {
                map.insert(key.to_string(), value.clone());
            }
            Ok(())
        })
    }

    fn transact(&mut self, f: &mut dyn FnMut(&mut MemoryStore) -> Result<()>) -> Result<()> {
        self.update(|map| {
            let mut staged = MemoryStore {
                values: std::mem::take(map),
            };
            f(&mut staged)?;
            *map = staged.values;
            Ok(())
        })
    }
}
