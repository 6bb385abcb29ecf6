// src/storage.rs
//
// String key/value store persisted as one JSON object under the store dir.
// Stands in for the browser's localStorage: values are strings, JSON-typed
// entries go through `get_json`/`set_json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::consts::LOCAL_STORAGE_FILE;
use crate::core::lock;
use crate::error::Result;

pub const IMPORT_TAB_STATE: &str = "importTabState";
pub const IMPORT_ENTERED_PRICES: &str = "importTabEnteredPrices";
pub const ROUTES_TAB_STATE: &str = "routes_tab_state";
pub const ADD_AIRCRAFT_FORM: &str = "add_aircraft_form";
pub const ADD_AIRCRAFT_LAST_EDITED: &str = "add_aircraft_last_edited";

pub struct LocalStore {
    path: Option<PathBuf>,
    values: Mutex<BTreeMap<String, String>>,
}

impl LocalStore {
    /// Load `<dir>/local_storage.json`, creating the dir if needed. A missing
    /// or unreadable file starts empty.
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
        let path = dir.join(LOCAL_STORAGE_FILE);
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                logw!("LocalStore: {} unreadable ({}), starting empty", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Ok(Self { path: Some(path), values: Mutex::new(values) })
    }

    /// Not backed by a file.
    pub fn in_memory() -> Self {
        Self { path: None, values: Mutex::new(BTreeMap::new()) }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    /// Typed read; a value that does not parse reads as absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        serde_json::from_str(&raw).ok()
    }

    pub fn set(&self, key: &str, value: impl Into<String>) {
        lock(&self.values).insert(s!(key), value.into());
        self.persist();
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(key, raw),
            Err(e) => loge!("LocalStore: could not encode {}: {}", key, e),
        }
    }

    pub fn remove(&self, key: &str) {
        let removed = lock(&self.values).remove(key).is_some();
        if removed {
            self.persist();
        }
    }

    /// Start-of-session cleanup: drop the aircraft draft and forget the
    /// import country so each session starts unselected.
    pub fn clear_on_start(&self) {
        self.remove(ADD_AIRCRAFT_FORM);
        self.remove(ADD_AIRCRAFT_LAST_EDITED);

        if let Some(mut state) = self.get_json::<serde_json::Value>(IMPORT_TAB_STATE) {
            if let Some(obj) = state.as_object_mut() {
                obj.insert(s!("country"), serde_json::Value::String(s!()));
                self.set_json(IMPORT_TAB_STATE, &state);
            }
        }
    }

    fn persist(&self) {
        let Some(path) = &self.path else { return };
        let snapshot = lock(&self.values).clone();
        let write = serde_json::to_string_pretty(&snapshot)
            .map_err(crate::ConsoleError::from)
            .and_then(|text| fs::write(path, text).map_err(Into::into));
        if let Err(e) = write {
            loge!("LocalStore: write {} failed: {}", path.display(), e);
        }
    }
}
