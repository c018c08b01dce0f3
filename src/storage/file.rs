use crate::{
    error::{ProviderError, Result},
    storage::traits::PreferenceStore,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Preferences persisted as one flat JSON object, rewritten on every change.
#[derive(Debug)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFilePreferenceStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|e| {
                ProviderError::StorageError(format!("cannot read {}: {}", path.display(), e))
            })?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };

        log::debug!("Opened preference file {} ({} entries)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ProviderError::StorageError(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json).map_err(|e| {
            ProviderError::StorageError(format!("cannot write {}: {}", self.path.display(), e))
        })
    }
}

fn poisoned<E>(_: E) -> ProviderError {
    ProviderError::StorageError("preference file lock poisoned".into())
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut updated = entries.clone();
        updated.remove(key);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }
}
