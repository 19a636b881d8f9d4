use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A string-valued slot store. Each key holds one serialized blob.
pub trait KeyValueStore {
    /// Read a slot. Absent slots yield `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a slot.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Reject slot names that would escape the data directory or name no file.
pub fn check_slot_name(key: &str) -> Result<()> {
    if key.is_empty() || key == "." || key == ".." {
        return Err(anyhow!("invalid slot name '{key}'"));
    }
    if key.contains(['/', '\\', '\0']) {
        return Err(anyhow!("slot name '{key}' must not contain path separators"));
    }
    Ok(())
}

/// In-memory slots, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot without going through a `PolygonStore`.
    pub fn with_slot(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(key.into(), value.into());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per slot under a directory (`<dir>/<key>.json`).
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on the first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        check_slot_name(key)?;
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("read slot {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        check_slot_name(key)?;
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create data directory {}", self.dir.display()))?;

        // Write beside the target, then rename over it.
        let path = self.slot_path(key);
        let staging = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&staging, value)
            .with_context(|| format!("write slot {}", staging.display()))?;
        fs::rename(&staging, &path)
            .with_context(|| format!("replace slot {}", path.display()))
    }
}
