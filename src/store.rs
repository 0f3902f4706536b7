//! Session persistence
//!
//! The durable key-value bridge that keeps cart state across reloads.
//! Writes are best-effort: the in-memory cart is always authoritative,
//! and a failed write only leaves stale persisted state behind until the
//! next successful one.

use std::{
    fs, io,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use rustc_hash::FxHashMap;
use thiserror::Error;

pub mod debounce;
pub mod records;

/// Keys shared with payloads written by earlier sessions.
pub mod keys {
    /// Serialized cart entries.
    pub const CART_ITEMS: &str = "cartItems";

    /// Serialized saved-for-later entries.
    pub const SAVED_FOR_LATER: &str = "savedForLater";

    /// Last submitted promo code text.
    pub const PROMO_CODE: &str = "promoCode";
}

/// Errors surfaced by store implementations.
///
/// Callers on the cart path never see these; the debounced writer logs
/// and swallows them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The shared map's lock was poisoned.
    #[error("store lock poisoned")]
    Poisoned,

    /// Reading or writing the backing file failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The backing file's contents could not be encoded or decoded.
    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

/// A durable string key-value store.
pub trait KeyValueStore: Send + 'static {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the value could not be persisted.
    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store.
///
/// Clones share the same underlying map, so one clone can be handed to a
/// session while another observes it or outlives it.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<FxHashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_poisoned| StoreError::Poisoned)?;

        entries.insert(key.to_string(), value.to_string());

        Ok(())
    }
}

/// File-backed store holding every key in one JSON document.
///
/// Reads the whole document per lookup, which is fine at cart scale. The
/// file is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<FxHashMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(FxHashMap::default()),
            Err(error) => Err(error.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().ok().and_then(|mut entries| entries.remove(key))
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;

        entries.insert(key.to_string(), value.to_string());
        fs::write(&self.path, serde_json::to_string(&entries)?)?;

        Ok(())
    }
}
