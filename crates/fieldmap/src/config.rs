use crate::storage::{check_slot_name, FileStore};
use crate::store::{PolygonStore, DEFAULT_SLOT};
use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// Where a file-backed polygon store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding one JSON file per slot.
    pub data_dir: PathBuf,
    /// Name of the slot holding the polygon collection.
    pub slot: String,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            slot: DEFAULT_SLOT.to_string(),
        }
    }

    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    /// Resolve the config from optional overrides, falling back to
    /// `~/.fieldmap` and the default slot.
    pub fn resolve(data_dir: Option<PathBuf>, slot: Option<String>) -> Result<Self> {
        let slot = slot.unwrap_or_else(|| DEFAULT_SLOT.to_string());
        check_slot_name(&slot)?;
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => Self::default_data_dir()?,
        };
        Ok(Self { data_dir, slot })
    }

    /// The default data directory (`~/.fieldmap`).
    pub fn default_data_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("could not determine home directory"))?;
        Ok(home.join(".fieldmap"))
    }

    /// Open a file-backed store for this config.
    pub fn open_store(&self) -> Result<PolygonStore<FileStore>> {
        check_slot_name(&self.slot)?;
        PolygonStore::open_slot(FileStore::new(&self.data_dir), self.slot.clone())
    }
}
