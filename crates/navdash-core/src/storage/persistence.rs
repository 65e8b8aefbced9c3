//! Persistence adapter
//!
//! Mirrors entity collections and settings into a `KeyValueBackend` under
//! namespaced keys:
//!
//! - `<ns>_links`      - JSON array of links
//! - `<ns>_categories` - JSON array of categories
//! - `<ns>_settings`   - JSON settings object
//! - `<ns>_version`    - schema version, written with every links save
//!
//! Loads never fail: missing data is `None`, and corrupt or schema-invalid
//! data is logged and also reported as `None`, so the caller falls back to
//! defaults. Saves return a typed `PersistenceError` instead of panicking.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::backend::KeyValueBackend;
use super::error::PersistenceError;
use crate::models::{Entity, EntityKind};
use crate::settings::Settings;
use crate::validate;

/// Schema version written alongside every links save
pub const CURRENT_VERSION: &str = "1.0.0";

const SETTINGS: &str = "settings";
const VERSION: &str = "version";

/// What happened to a storage key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Saved,
    Cleared,
}

/// Notification sent to subscribers after a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    /// Full namespaced key
    pub key: String,
    pub kind: ChangeKind,
}

/// Handle returned by [`Persistence::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn(&StorageChange)>;

/// Typed, validated access to the key-value backend
pub struct Persistence {
    backend: Box<dyn KeyValueBackend>,
    namespace: String,
    quota_bytes: Option<u64>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Persistence {
    pub fn new(backend: Box<dyn KeyValueBackend>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
            quota_bytes: None,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Limit total stored bytes; writes that would exceed it fail with
    /// `QuotaExceeded`
    pub fn with_quota(mut self, quota_bytes: Option<u64>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn quota_bytes(&self) -> Option<u64> {
        self.quota_bytes
    }

    /// Full backend key for a collection or slot name
    pub fn key(&self, name: &str) -> String {
        format!("{}_{}", self.namespace, name)
    }

    // ==================== Collections ====================

    /// Serialize and store a whole collection
    pub fn save<T: Entity>(&mut self, items: &[T]) -> Result<(), PersistenceError> {
        let key = self.key(T::KIND.collection_name());
        let data = to_json(&key, items)?;

        if T::KIND == EntityKind::Link {
            let version_key = self.key(VERSION);
            self.write(&[
                (key.as_str(), data.as_str()),
                (version_key.as_str(), CURRENT_VERSION),
            ])
        } else {
            self.write(&[(key.as_str(), data.as_str())])
        }
    }

    /// Load a collection
    ///
    /// `Some(vec![])` is a persisted empty collection, distinct from `None`
    /// (nothing stored, or stored data rejected).
    pub fn load<T: Entity>(&self) -> Option<Vec<T>> {
        let key = self.key(T::KIND.collection_name());
        let mut value = self.read_json(&key)?;

        if !validate::is_valid_array(&value, T::is_valid) {
            warn!(key = %key, "Invalid {} data format, ignoring stored value", T::KIND);
            return None;
        }
        if let Value::Array(items) = &mut value {
            items.iter_mut().for_each(validate::normalize_numbers);
        }

        match serde_json::from_value(value) {
            Ok(items) => Some(items),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to decode stored {} data", T::KIND);
                None
            }
        }
    }

    // ==================== Settings ====================

    pub fn save_settings(&mut self, settings: &Settings) -> Result<(), PersistenceError> {
        let key = self.key(SETTINGS);
        let data = to_json(&key, settings)?;
        self.write(&[(key.as_str(), data.as_str())])
    }

    pub fn load_settings(&self) -> Option<Settings> {
        let key = self.key(SETTINGS);
        let value = self.read_json(&key)?;

        if !validate::is_valid_settings(&value) {
            warn!(key = %key, "Invalid settings data format, ignoring stored value");
            return None;
        }

        match serde_json::from_value(value) {
            Ok(settings) => Some(settings),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to decode stored settings");
                None
            }
        }
    }

    // ==================== Maintenance ====================

    /// Remove every key this adapter owns
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        let keys: Vec<String> = ["links", "categories", SETTINGS, VERSION]
            .iter()
            .map(|name| self.key(name))
            .collect();

        for key in &keys {
            self.backend
                .remove(key)
                .map_err(|e| PersistenceError::from_storage(key.as_str(), e))?;
        }
        for key in keys {
            self.notify(StorageChange {
                key,
                kind: ChangeKind::Cleared,
            });
        }
        Ok(())
    }

    /// Schema version of the stored data, if any has been written
    pub fn version(&self) -> Option<String> {
        let key = self.key(VERSION);
        match self.backend.get(&key) {
            Ok(version) => version,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read stored version");
                None
            }
        }
    }

    /// Estimated bytes used by the whole backend
    pub fn storage_size(&self) -> Option<u64> {
        match self.backend.used_bytes() {
            Ok(size) => Some(size),
            Err(e) => {
                warn!(error = %e, "Failed to calculate storage size");
                None
            }
        }
    }

    // ==================== Subscriptions ====================

    /// Register a callback run after every successful save or clear
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&StorageChange) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    // ==================== Internals ====================

    fn read_json(&self, key: &str) -> Option<Value> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "Failed to read stored value");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Failed to parse stored JSON");
                None
            }
        }
    }

    fn write(&mut self, entries: &[(&str, &str)]) -> Result<(), PersistenceError> {
        let primary = entries.first().map(|(k, _)| *k).unwrap_or_default();
        self.check_quota(entries)?;

        self.backend.set_many(entries).map_err(|e| {
            let err = PersistenceError::from_storage(primary, e);
            warn!(key = primary, error = %err, "Write failed");
            err
        })?;

        let bytes: usize = entries.iter().map(|(_, v)| v.len()).sum();
        debug!(key = primary, bytes, backend = self.backend.name(), "Saved");
        for (key, _) in entries {
            self.notify(StorageChange {
                key: key.to_string(),
                kind: ChangeKind::Saved,
            });
        }
        Ok(())
    }

    /// Project the post-write size and reject writes over the quota
    fn check_quota(&self, entries: &[(&str, &str)]) -> Result<(), PersistenceError> {
        let Some(quota) = self.quota_bytes else {
            return Ok(());
        };
        let primary = entries.first().map(|(k, _)| *k).unwrap_or_default();

        let mut projected = self
            .backend
            .used_bytes()
            .map_err(|e| PersistenceError::from_storage(primary, e))?;
        for (key, value) in entries {
            let existing = self
                .backend
                .get(key)
                .map_err(|e| PersistenceError::from_storage(*key, e))?;
            if let Some(old) = existing {
                projected = projected.saturating_sub((key.len() + old.len()) as u64);
            }
            projected += (key.len() + value.len()) as u64;
        }

        if projected > quota {
            warn!(key = primary, projected, quota, "Storage quota exceeded");
            return Err(PersistenceError::QuotaExceeded {
                key: primary.to_string(),
                details: format!(
                    "{} bytes needed but the quota is {} bytes. Export your data and clear some space.",
                    projected, quota
                ),
            });
        }
        Ok(())
    }

    fn notify(&self, change: StorageChange) {
        for (_, listener) in &self.listeners {
            listener(&change);
        }
    }
}

fn to_json<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, PersistenceError> {
    serde_json::to_string(value).map_err(|e| PersistenceError::WriteFailure {
        key: key.to_string(),
        details: format!("serialization failed: {}", e),
    })
}
