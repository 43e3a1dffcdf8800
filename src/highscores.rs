//! High score persistence
//!
//! A single best score, persisted to LocalStorage on the web and to a JSON file
//! natively. Storage failures never reach gameplay: the score is kept in memory
//! for the rest of the session and a warning is logged.

use anyhow::Result;
#[cfg(not(target_arch = "wasm32"))]
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Backend that stores the best score
pub trait HighScoreStore {
    /// Stored score, `0` when nothing has been saved yet
    fn load(&mut self) -> Result<u64>;
    fn save(&mut self, score: u64) -> Result<()>;
}

/// Keeps the score for the lifetime of the process only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(value: u64) -> Self {
        Self { value }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<u64> {
        Ok(self.value)
    }

    fn save(&mut self, score: u64) -> Result<()> {
        self.value = score;
        Ok(())
    }
}

/// On-disk record
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u64,
}

/// JSON file store for native builds
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HighScoreStore for FileStore {
    fn load(&mut self) -> Result<u64> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("reading high score from {}", self.path.display()));
            }
        };
        let record: HighScoreRecord = serde_json::from_str(&json)
            .with_context(|| format!("parsing high score in {}", self.path.display()))?;
        Ok(record.high_score)
    }

    fn save(&mut self, score: u64) -> Result<()> {
        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score: score })?;
        // Write to a sibling file first so a crash never leaves a torn record
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("writing high score to {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

/// Browser LocalStorage store. The value is a bare JSON number.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "highScore";

    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| anyhow::anyhow!("LocalStorage unavailable"))
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&mut self) -> Result<u64> {
        let storage = Self::storage()?;
        let item = storage
            .get_item(Self::STORAGE_KEY)
            .map_err(|_| anyhow::anyhow!("LocalStorage read refused"))?;
        match item {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(0),
        }
    }

    fn save(&mut self, score: u64) -> Result<()> {
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &score.to_string())
            .map_err(|_| anyhow::anyhow!("LocalStorage write refused"))
    }
}

/// Best score plus the store it is persisted to
pub struct HighScore {
    best: u64,
    store: Box<dyn HighScoreStore>,
    /// Cleared after a storage failure; the session then runs in memory only
    persistent: bool,
}

impl std::fmt::Debug for HighScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScore")
            .field("best", &self.best)
            .field("persistent", &self.persistent)
            .finish()
    }
}

impl HighScore {
    /// Read the stored score, falling back to 0 if the store fails
    pub fn load(mut store: Box<dyn HighScoreStore>) -> Self {
        let (best, persistent) = match store.load() {
            Ok(best) => {
                log::info!("Loaded high score {}", best);
                (best, true)
            }
            Err(e) => {
                log::warn!("High score unavailable, keeping it in memory: {:#}", e);
                (0, false)
            }
        };
        Self {
            best,
            store,
            persistent,
        }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Record a finished run's score. Returns true if it is a new best.
    pub fn submit(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        if self.persistent {
            match self.store.save(score) {
                Ok(()) => log::info!("New high score {} saved", score),
                Err(e) => {
                    log::warn!("High score not saved, keeping it in memory: {:#}", e);
                    self.persistent = false;
                }
            }
        }
        true
    }
}
