//! Persistence gateway.
//!
//! The plan is stored as one JSON document under [`STORAGE_KEY`] in a
//! string key-value store. Failures never reach the user: loading falls back
//! to `None` (and the caller to a default plan), saving is logged.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::plan::Plan;

/// Key the plan document lives under; shared with the browser build's
/// localStorage payload.
pub const STORAGE_KEY: &str = "gym_planner_canvas_v1";

const APP_HOME_DIR: &str = ".gymplan";

/// Durable string store. `get` returns `Ok(None)` for a missing key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store with an optional byte quota, mirroring browser storage
/// limits.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(StoreError::QuotaExceeded {
                    size: value.len(),
                    quota,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.gymplan`.
    pub fn in_home() -> Result<Self, StoreError> {
        let mut home = dirs::home_dir().ok_or(StoreError::NoHome)?;
        home.push(APP_HOME_DIR);
        Ok(Self::new(home))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })?;
        // Write-then-rename so a crash never leaves a half-written plan.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })
    }
}

/// Loads and saves a [`Plan`] through a [`KeyValueStore`].
pub struct PlanStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl PlanStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            key: STORAGE_KEY.to_string(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// `None` when nothing is stored or the payload can't be read; the
    /// returned plan has been repaired.
    pub fn load(&self) -> Option<Plan> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("no stored plan under '{}'", self.key);
                return None;
            }
            Err(e) => {
                log::warn!("failed to read stored plan: {e}");
                return None;
            }
        };
        match serde_json::from_str::<Plan>(&raw) {
            Ok(mut plan) => {
                if plan.repair() {
                    log::info!("stored plan repaired on load");
                }
                Some(plan)
            }
            Err(e) => {
                log::warn!("stored plan is corrupt, ignoring it: {e}");
                None
            }
        }
    }

    /// Stored plan, or a fresh default one.
    pub fn load_or_default(&self) -> Plan {
        self.load().unwrap_or_else(Plan::new_default)
    }

    pub fn save(&mut self, plan: &Plan) -> Result<(), StoreError> {
        let json = serde_json::to_string(plan)?;
        self.backend.set(&self.key, &json)?;
        log::debug!("saved plan ({} bytes)", json.len());
        Ok(())
    }

    /// Saves and logs failures instead of returning them.
    pub fn save_logged(&mut self, plan: &Plan) -> bool {
        match self.save(plan) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("failed to save plan: {e}");
                false
            }
        }
    }
}
