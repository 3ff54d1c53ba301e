//! Persisted dark-mode preference.
//!
//! The preference lives in a single string-keyed slot holding `"true"` or
//! `"false"`. [`FileStorage`] keeps slots in a TOML table on disk so the flag
//! survives restarts; [`MemoryStorage`] backs tests.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::project_dirs;
use crate::document::Document;

/// String-keyed durable slots.
pub trait Storage {
  fn get_item(&self, key: &str) -> Option<String>;
  fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
  fn get_item(&self, key: &str) -> Option<String> {
    (**self).get_item(key)
  }

  fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
    (**self).set_item(key, value)
  }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
  slots: HashMap<String, String>,
}

impl Storage for MemoryStorage {
  fn get_item(&self, key: &str) -> Option<String> {
    self.slots.get(key).cloned()
  }

  fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
    self.slots.insert(key.to_string(), value.to_string());
    Ok(())
  }
}

/// Slots persisted as a TOML table. Unreadable or corrupt files start empty.
#[derive(Debug)]
pub struct FileStorage {
  path: PathBuf,
  slots: BTreeMap<String, String>,
}

impl FileStorage {
  pub fn open(path: impl Into<PathBuf>) -> Self {
    let path = path.into();
    let slots = std::fs::read_to_string(&path)
      .ok()
      .and_then(|content| match toml::from_str(&content) {
        Ok(slots) => Some(slots),
        Err(e) => {
          warn!(path = %path.display(), err = %e, "prefs: discarding corrupt preference file");
          None
        }
      })
      .unwrap_or_default();
    Self { path, slots }
  }

  /// `prefs.toml` in the platform config dir, if one can be determined.
  pub fn open_default() -> Option<Self> {
    project_dirs().map(|dirs| Self::open(dirs.config_dir().join("prefs.toml")))
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl Storage for FileStorage {
  fn get_item(&self, key: &str) -> Option<String> {
    self.slots.get(key).cloned()
  }

  fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
    self.slots.insert(key.to_string(), value.to_string());
    if let Some(dir) = self.path.parent() {
      std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = toml::to_string(&self.slots).context("Failed to serialize preferences")?;
    std::fs::write(&self.path, content).with_context(|| format!("Failed to write {}", self.path.display()))
  }
}

pub struct PreferenceStore<S> {
  storage: S,
  key: String,
}

impl<S: Storage> PreferenceStore<S> {
  pub fn new(storage: S, key: impl Into<String>) -> Self {
    Self { storage, key: key.into() }
  }

  /// Persisted flag; absent or unrecognised values read as `false`.
  pub fn load(&self) -> bool {
    self.storage.get_item(&self.key).is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
  }

  /// Persist the flag. Storage failures are logged, not propagated.
  pub fn save(&mut self, value: bool) {
    let raw = if value { "true" } else { "false" };
    match self.storage.set_item(&self.key, raw) {
      Ok(()) => debug!(key = %self.key, value, "prefs: saved"),
      Err(e) => warn!(key = %self.key, err = %format!("{:#}", e), "prefs: failed to save preference"),
    }
  }

  /// Flip, persist and return the new value.
  pub fn toggle(&mut self) -> bool {
    let value = !self.load();
    self.save(value);
    value
  }

  pub fn apply_to_document(&self, value: bool, document: &mut Document) {
    document.set_dark_mode(value);
  }

  pub fn storage(&self) -> &S {
    &self.storage
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::document::Layout;

  #[test]
  fn uninitialized_store_reads_false() {
    let store = PreferenceStore::new(MemoryStorage::default(), "darkMode");
    assert!(!store.load());
  }

  #[test]
  fn unexpected_values_read_false() {
    for raw in ["yes", "1", "", "tru", "false"] {
      let mut storage = MemoryStorage::default();
      storage.set_item("darkMode", raw).unwrap();
      assert!(!PreferenceStore::new(storage, "darkMode").load(), "{:?} should read as false", raw);
    }
  }

  #[test]
  fn save_writes_string_slot() {
    let mut store = PreferenceStore::new(MemoryStorage::default(), "darkMode");
    store.save(true);
    assert_eq!(store.storage().get_item("darkMode").as_deref(), Some("true"));
    store.save(false);
    assert_eq!(store.storage().get_item("darkMode").as_deref(), Some("false"));
  }

  #[test]
  fn toggle_flips_and_persists() {
    let mut store = PreferenceStore::new(MemoryStorage::default(), "darkMode");
    assert!(store.toggle());
    assert!(store.load());
    assert!(!store.toggle());
    assert!(!store.load());
  }

  #[test]
  fn survives_reload_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("prefs.toml");

    let mut store = PreferenceStore::new(FileStorage::open(&path), "darkMode");
    assert!(!store.load());
    store.save(true);

    let reloaded = PreferenceStore::new(FileStorage::open(&path), "darkMode");
    assert!(reloaded.load());
  }

  #[test]
  fn corrupt_file_reads_false() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.toml");
    std::fs::write(&path, "darkMode = [1, 2").unwrap();
    assert!(!PreferenceStore::new(FileStorage::open(&path), "darkMode").load());
  }

  #[test]
  fn non_string_slot_reads_false() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.toml");
    std::fs::write(&path, "darkMode = true\n").unwrap();
    assert!(!PreferenceStore::new(FileStorage::open(&path), "darkMode").load());
  }

  #[test]
  fn apply_sets_root_flag() {
    let store = PreferenceStore::new(MemoryStorage::default(), "darkMode");
    let mut doc = Document::new(Layout::default());
    store.apply_to_document(true, &mut doc);
    assert!(doc.dark_mode);
    store.apply_to_document(false, &mut doc);
    assert!(!doc.dark_mode);
  }
}
