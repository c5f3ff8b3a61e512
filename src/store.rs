//! Key/value stores for saved panel positions
//!
//! A store maps a caller-chosen key (e.g. `pos:general-chat`) to an opaque
//! string. Stores are shared by every attached panel, so they take `&self`
//! and keep their state behind a `RefCell`; everything runs on the UI thread.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Persistence contract used by draggable panels.
///
/// Both operations may fail; callers decide whether a failure matters.
pub trait PositionStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// Store that lives for the duration of the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl PositionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// File-backed store
// ============================================================================

/// On-disk layout of the positions file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    /// Schema version for forward compatibility
    #[serde(default)]
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// JSON file store (`~/.config/panel-drag/positions.json` by default).
///
/// The file is read once on open; every `set` rewrites it.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStore {
    pub const CURRENT_VERSION: u32 = 1;

    /// Open a store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<StoreFile>(&contents) {
                Ok(file) => file.entries,
                Err(e) => {
                    tracing::warn!(
                        "Ignoring corrupt position store at {}: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read position store at {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        tracing::debug!(
            "Opened position store at {} ({} entries)",
            path.display(),
            entries.len()
        );
        Self {
            path,
            entries: RefCell::new(entries),
        }
    }

    /// Open the store in the user config directory
    pub fn open_default() -> Option<Self> {
        crate::config_paths::positions_file().map(|path| Self::open(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Forget every saved position
    pub fn clear(&self) -> Result<()> {
        self.commit(BTreeMap::new())
    }

    /// Write `entries` to disk and only then make them the live set, so a
    /// failed write leaves the store as it was.
    fn commit(&self, entries: BTreeMap<String, String>) -> Result<()> {
        self.write(&entries)?;
        *self.entries.borrow_mut() = entries;
        Ok(())
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let file = StoreFile {
            version: Self::CURRENT_VERSION,
            entries: entries.clone(),
        };
        let contents = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

impl PositionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.borrow().clone();
        entries.insert(key.to_string(), value.to_string());
        self.commit(entries)
    }
}
