//! navdash Core Library
//!
//! This crate provides the core functionality for navdash, a local-first
//! navigation dashboard of categorized links.
//!
//! # Architecture
//!
//! - **Collections**: ordered in-memory links and categories, the source of
//!   truth while the program runs
//! - **Persistence**: JSON values under namespaced keys in a pluggable
//!   key-value backend (SQLite by default), written through on every change
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//!
//! // Add a link
//! let input = LinkInput::new("Rust", "https://rust-lang.org").category("Dev");
//! store.add_link(input).into_durable()?;
//!
//! // Query links
//! let found = store.search("rust");
//! ```
//!
//! # Modules
//!
//! - `store`: Unified storage interface (main entry point)
//! - `models`: Links, categories and their input/patch types
//! - `collection`: Ordered collections with dense `order` fields
//! - `storage`: Key-value backends and the persistence adapter
//! - `transfer`: Import (parse, validate, merge) and export
//! - `search`: Link filtering and web search engines
//! - `settings`: User preferences
//! - `validate`: Schema checks for untrusted JSON
//! - `config`: Application configuration

pub mod collection;
pub mod config;
pub mod defaults;
pub mod error;
pub mod models;
pub mod search;
pub mod settings;
pub mod storage;
pub mod store;
pub mod transfer;
pub mod validate;

pub use collection::{CategoryCollection, Collection, LinkCollection};
pub use config::{BackendKind, Config};
pub use error::{CoreError, CoreResult};
pub use models::{
    Category, CategoryInput, CategoryPatch, Entity, EntityKind, Link, LinkInput, LinkPatch,
};
pub use settings::{LayoutMode, Settings, SettingsPatch, ThemeMode};
pub use storage::{Persistence, PersistenceError, StorageError};
pub use store::{CategoryDeletion, Store, WriteOutcome};
pub use transfer::{ExportDocument, ImportCounts, ImportPlan};
