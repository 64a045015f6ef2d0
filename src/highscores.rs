//! High score persistence
//!
//! Only the best score survives restarts. Storage is behind a small trait:
//! a JSON file on native, LocalStorage on the web, memory in tests.
//! Failures never reach the simulation: a bad read means zero, a bad write
//! is logged and dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// The durable fields (just the one)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u64,
}

/// Why a load/save failed
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Backing store missing (no home dir, no LocalStorage, ...)
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "storage I/O error: {e}"),
            StorageError::Json(e) => write!(f, "corrupt high score data: {e}"),
            StorageError::Unavailable(why) => write!(f, "storage unavailable: {why}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Json(e) => Some(e),
            StorageError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Json(e)
    }
}

/// Somewhere a `HighScoreRecord` can live
pub trait HighScoreStore {
    fn load(&self) -> Result<HighScoreRecord, StorageError>;
    fn save(&mut self, record: &HighScoreRecord) -> Result<(), StorageError>;
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load(&self) -> Result<HighScoreRecord, StorageError> {
        (**self).load()
    }

    fn save(&mut self, record: &HighScoreRecord) -> Result<(), StorageError> {
        (**self).save(record)
    }
}

/// In-process store (tests, or when nothing durable exists)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub record: Option<HighScoreRecord>,
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<HighScoreRecord, StorageError> {
        Ok(self.record.unwrap_or_default())
    }

    fn save(&mut self, record: &HighScoreRecord) -> Result<(), StorageError> {
        self.record = Some(*record);
        Ok(())
    }
}

/// JSON file on disk (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    /// Overrides the data directory when set
    pub const DATA_DIR_ENV: &'static str = "NEON_STACK_DATA_DIR";
    const FILE_NAME: &'static str = "highscore.json";

    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$NEON_STACK_DATA_DIR/highscore.json`, else the platform data dir
    pub fn default_location() -> Result<Self, StorageError> {
        let dir = match std::env::var_os(Self::DATA_DIR_ENV) {
            Some(dir) => std::path::PathBuf::from(dir),
            None => dirs::data_dir()
                .ok_or_else(|| StorageError::Unavailable("no data directory".to_string()))?
                .join("neon-stack"),
        };
        Ok(Self::new(dir.join(Self::FILE_NAME)))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HighScoreStore for FileStore {
    fn load(&self) -> Result<HighScoreRecord, StorageError> {
        let json = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&mut self, record: &HighScoreRecord) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Browser LocalStorage (wasm32 only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "neon_stack_highscore";

    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("LocalStorage".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&self) -> Result<HighScoreRecord, StorageError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Ok(serde_json::from_str(&json)?),
            Ok(None) => Ok(HighScoreRecord::default()),
            Err(_) => Err(StorageError::Unavailable("LocalStorage read".to_string())),
        }
    }

    fn save(&mut self, record: &HighScoreRecord) -> Result<(), StorageError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(record)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StorageError::Unavailable("LocalStorage write".to_string()))
    }
}

/// Load-at-startup / save-on-change hooks around a store
pub struct HighScoreKeeper<S: HighScoreStore> {
    store: S,
    persisted: u64,
    /// Last value we tried to write, so a dead store isn't hammered every frame
    attempted: u64,
}

impl<S: HighScoreStore> HighScoreKeeper<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            persisted: 0,
            attempted: 0,
        }
    }

    /// Initial high score; any failure counts as "no score yet"
    pub fn load_initial(&mut self) -> u64 {
        match self.store.load() {
            Ok(record) => {
                log::info!("Loaded high score {}", record.high_score);
                self.persisted = record.high_score;
            }
            Err(e) => {
                log::warn!("Could not load high score, starting from 0: {e}");
                self.persisted = 0;
            }
        }
        self.attempted = self.persisted;
        self.persisted
    }

    /// Persist the state's high score if it beat the stored one.
    /// Returns true when a save succeeded.
    pub fn observe(&mut self, state: &GameState) -> bool {
        if state.high_score <= self.attempted {
            return false;
        }
        self.attempted = state.high_score;
        let record = HighScoreRecord {
            high_score: state.high_score,
        };
        match self.store.save(&record) {
            Ok(()) => {
                log::info!("High score saved ({})", record.high_score);
                self.persisted = record.high_score;
                true
            }
            Err(e) => {
                log::warn!("Failed to save high score {}: {e}", record.high_score);
                false
            }
        }
    }

    /// Last value known to be on disk/in storage
    pub fn persisted(&self) -> u64 {
        self.persisted
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
