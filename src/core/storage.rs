use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;
use tracing::warn;

/// Persistence port. Core logic only ever sees keyed JSON slots; the GUI
/// injects a durable store, tests inject [`MemoryStore`].
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> anyhow::Result<()>;
    fn remove(&mut self, key: &str) -> anyhow::Result<()>;
}

/// Slot keys shared with the persisted file layout. These are an external
/// contract; renaming them orphans existing user data.
pub mod keys {
    pub const USERS: &str = "users";
    pub const CURRENT_USER: &str = "currentUser";

    pub fn statuses(profile_name: &str) -> String {
        format!("countryStatuses_{profile_name}")
    }
}

/// In-memory store for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> anyhow::Result<()> {
        self.slots.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}

const STORE_FILE_NAME: &str = "store.json";

/// Durable store: all slots live in one JSON object file, rewritten on
/// every mutation. State volumes here are a few kilobytes, so the
/// whole-file write keeps durability simple.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    slots: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Open (or create) the store under `data_dir`. A corrupt or
    /// unreadable file is treated as no prior state: persisted data is an
    /// advisory cache, never the sole source of truth.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> anyhow::Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {data_dir:?}"))?;
        let path = data_dir.join(STORE_FILE_NAME);

        let slots = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(slots) => slots,
                Err(e) => {
                    warn!(?path, error = %e, "store file is not valid JSON, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(?path, error = %e, "store file unreadable, starting empty");
                BTreeMap::new()
            }
        };

        Ok(Self { path, slots })
    }

    /// Default platform location, e.g. `~/.local/share/travelmarks`.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("travelmarks")
    }

    fn flush(&self) -> anyhow::Result<()> {
        let raw = serde_json::to_string_pretty(&self.slots)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write store file {:?}", self.path))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> anyhow::Result<()> {
        self.slots.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        if self.slots.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
