use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Well-known storage keys. Values are JSON-serialized strings.
pub mod keys {
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const USER_PROFILE: &str = "user_profile";
    pub const THEME: &str = "theme";
    pub const LANGUAGE: &str = "language";

    /// Key for arbitrary namespaced UI state.
    pub fn ui_state(namespace: &str) -> String {
        format!("ui:{namespace}")
    }
}

/// A change to a stored key. `value` is `None` for removals.
#[derive(Debug, Clone)]
pub struct StorageEvent {
    pub key: String,
    pub value: Option<String>,
}

/// Process-wide string-keyed store with JSON-serialized values and a
/// change broadcast, so state kept in sync with storage (theme, language)
/// can re-hydrate when another owner mutates the same key.
///
/// All mutations happen under the write lock; subscribers observe changes
/// in the order they were applied.
#[derive(Clone)]
pub struct Storage {
    values: Arc<RwLock<HashMap<String, String>>>,
    changes: broadcast::Sender<StorageEvent>,
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(32);
        Self {
            values: Arc::new(RwLock::new(HashMap::new())),
            changes,
        }
    }

    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.values.read().unwrap().get(key).cloned()
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, %err, "stored value failed to parse");
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set_raw(key, raw),
            Err(err) => {
                tracing::warn!(key, %err, "value failed to serialize");
            }
        }
    }

    pub fn set_raw(&self, key: &str, raw: String) {
        self.values
            .write()
            .unwrap()
            .insert(key.to_string(), raw.clone());
        let _ = self.changes.send(StorageEvent {
            key: key.to_string(),
            value: Some(raw),
        });
    }

    pub fn remove(&self, key: &str) {
        let removed = self.values.write().unwrap().remove(key);
        if removed.is_some() {
            let _ = self.changes.send(StorageEvent {
                key: key.to_string(),
                value: None,
            });
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.read().unwrap().contains_key(key)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.changes.subscribe()
    }
}
