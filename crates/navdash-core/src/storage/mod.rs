//! Storage layer
//!
//! Persists collections and settings as JSON strings under namespaced keys.
//!
//! ## Architecture
//!
//! - **Backends**: string key-value media (SQLite, a directory of files,
//!   or memory), selected by `Config::backend`
//! - **Persistence**: typed adapter on top of a backend; validates on load,
//!   classifies write errors, enforces the quota
//!
//! Every mutation is written through to the backend immediately.

pub mod backend;
pub mod error;
pub mod files;
pub mod persistence;
pub mod schema;
pub mod sqlite;

pub use backend::{KeyValueBackend, MemoryBackend};
pub use error::{PersistenceError, StorageError, StorageResult};
pub use files::FileBackend;
pub use persistence::{ChangeKind, ListenerId, Persistence, StorageChange, CURRENT_VERSION};
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
pub use sqlite::SqliteBackend;

use tracing::debug;

use crate::config::{BackendKind, Config};

/// Open the backend selected by the configuration
pub fn open_backend(config: &Config) -> StorageResult<Box<dyn KeyValueBackend>> {
    debug!(backend = %config.backend, data_dir = ?config.data_dir, "Opening storage backend");
    let backend: Box<dyn KeyValueBackend> = match config.backend {
        BackendKind::Sqlite => Box::new(SqliteBackend::open(&config.sqlite_path())?),
        BackendKind::Files => Box::new(FileBackend::open(config.files_dir())?),
        BackendKind::Memory => Box::new(MemoryBackend::new()),
    };
    Ok(backend)
}

/// Open the configured backend wrapped in a persistence adapter
pub fn open_persistence(config: &Config) -> StorageResult<Persistence> {
    let backend = open_backend(config)?;
    Ok(Persistence::new(backend, config.namespace.clone()).with_quota(config.quota()))
}
