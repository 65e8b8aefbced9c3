//! Unified storage interface
//!
//! The `Store` owns both collections and the settings, and coordinates:
//! - `Collection` mutations (the in-memory source of truth)
//! - `Persistence` (write-through after every successful mutation)
//!
//! ## Durability
//!
//! A mutation that succeeds in memory stays applied even if saving it fails.
//! Mutating methods therefore return a [`WriteOutcome`] carrying the result
//! and the save status separately; callers surface the save error without
//! losing the change.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;
//!
//! let outcome = store.add_link(LinkInput::new("Rust", "https://rust-lang.org"));
//! if let Err(e) = &outcome.saved {
//!     eprintln!("not saved: {}", e);
//! }
//!
//! let plan = store.prepare_import(&json)?;
//! println!("{}", plan.counts);
//! store.commit_import(plan)?;
//! ```

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::collection::{CategoryCollection, LinkCollection};
use crate::config::{BackendKind, Config};
use crate::defaults::{default_categories, default_links};
use crate::error::{CoreError, CoreResult};
use crate::models::{
    new_id, now_millis, Category, CategoryInput, CategoryPatch, EntityKind, Link, LinkInput,
    LinkPatch,
};
use crate::search;
use crate::settings::{Settings, SettingsPatch};
use crate::storage::{open_persistence, Persistence, PersistenceError};
use crate::transfer::{plan_import, ExportDocument, ImportCounts, ImportPlan};

/// Result of a mutation plus whether it reached durable storage
#[must_use = "a failed save is only visible through `saved`"]
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome<T> {
    pub value: T,
    pub saved: Result<(), PersistenceError>,
}

impl<T> WriteOutcome<T> {
    fn new(value: T, saved: Result<(), PersistenceError>) -> Self {
        Self { value, saved }
    }

    pub fn is_durable(&self) -> bool {
        self.saved.is_ok()
    }

    /// The value if it was saved, otherwise the save error
    pub fn into_durable(self) -> Result<T, PersistenceError> {
        self.saved.map(|()| self.value)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WriteOutcome<U> {
        WriteOutcome {
            value: f(self.value),
            saved: self.saved,
        }
    }
}

/// What deleting a category changed
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDeletion {
    pub category: Category,
    /// Links that lost their category
    pub unassigned: usize,
}

/// Unified storage interface for navdash
pub struct Store {
    links: LinkCollection,
    categories: CategoryCollection,
    settings: Settings,
    persistence: Persistence,
    config: Config,
    /// Bumped on every in-memory change; guards prepared imports
    revision: u64,
}

impl Store {
    /// Open the store using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    pub fn open_with_config(config: Config) -> Result<Self> {
        if config.backend != BackendKind::Memory {
            config.ensure_data_dir()?;
        }
        let persistence = open_persistence(&config).with_context(|| {
            format!("Failed to open {} storage in {:?}", config.backend, config.data_dir)
        })?;
        Ok(Self::with_persistence(persistence, config))
    }

    /// Build a store on an already opened persistence adapter
    pub fn with_persistence(persistence: Persistence, config: Config) -> Self {
        let mut store = Self {
            links: LinkCollection::new(),
            categories: CategoryCollection::new(),
            settings: Settings::default(),
            persistence,
            config,
            revision: 0,
        };
        store.rehydrate();
        store
    }

    /// Replace in-memory state with what is currently persisted
    ///
    /// Missing or rejected data falls back to the seed data (or empty
    /// collections when seeding is disabled).
    pub fn rehydrate(&mut self) {
        let links = match self.persistence.load::<Link>() {
            Some(links) => links,
            None if self.config.seed_defaults => default_links(now_millis()),
            None => Vec::new(),
        };
        let categories = match self.persistence.load::<Category>() {
            Some(categories) => categories,
            None if self.config.seed_defaults => default_categories(now_millis()),
            None => Vec::new(),
        };
        let settings = self.persistence.load_settings().unwrap_or_default();

        self.load_links(links);
        self.load_categories(categories);
        self.settings = settings;
        debug!(
            links = self.links.len(),
            categories = self.categories.len(),
            "Store rehydrated"
        );
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// Mutable adapter access, for subscribing to storage changes
    pub fn persistence_mut(&mut self) -> &mut Persistence {
        &mut self.persistence
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ==================== Link Operations ====================

    pub fn links(&self) -> &[Link] {
        self.links.items()
    }

    pub fn get_link(&self, id: &str) -> Option<&Link> {
        self.links.get(id)
    }

    /// Add a new link at the end
    pub fn add_link(&mut self, input: LinkInput) -> WriteOutcome<Link> {
        let link = self.links.add_link(input, new_id(), now_millis()).clone();
        self.changed();
        let saved = self.save_links();
        WriteOutcome::new(link, saved)
    }

    /// Update fields of an existing link
    pub fn update_link(&mut self, patch: LinkPatch) -> CoreResult<WriteOutcome<Link>> {
        let link = self.links.update_link(patch, now_millis())?.clone();
        self.changed();
        Ok(WriteOutcome::new(link, self.save_links()))
    }

    /// Delete a link
    pub fn delete_link(&mut self, id: &str) -> CoreResult<WriteOutcome<Link>> {
        let link = self.links.delete(id)?;
        self.changed();
        Ok(WriteOutcome::new(link, self.save_links()))
    }

    /// Move a link from one display index to another
    pub fn reorder_links(&mut self, from: usize, to: usize) -> CoreResult<WriteOutcome<()>> {
        self.links.reorder(from, to, now_millis())?;
        self.changed();
        Ok(WriteOutcome::new((), self.save_links()))
    }

    /// Delete several links; an unknown id deletes nothing
    pub fn delete_links(&mut self, ids: &[String]) -> CoreResult<WriteOutcome<Vec<Link>>> {
        let removed = self.links.delete_many(ids)?;
        self.changed();
        Ok(WriteOutcome::new(removed, self.save_links()))
    }

    /// Assign (or with `None`, clear) the category of several links
    ///
    /// Returns how many links were changed. An unknown id changes nothing.
    pub fn set_links_category(
        &mut self,
        ids: &[String],
        category: Option<&str>,
    ) -> CoreResult<WriteOutcome<usize>> {
        if let Some(missing) = ids.iter().find(|id| !self.links.contains(id)) {
            return Err(CoreError::not_found(EntityKind::Link, missing.as_str()));
        }

        let now = now_millis();
        let category = category.filter(|c| !c.is_empty()).map(str::to_string);
        for id in ids {
            let mut patch = LinkPatch::new(id.as_str());
            patch.category = Some(category.clone());
            self.links.update_link(patch, now)?;
        }
        self.changed();
        Ok(WriteOutcome::new(ids.len(), self.save_links()))
    }

    /// Replace all links, e.g. after another process wrote them
    ///
    /// Records are sorted by `order` and renumbered. Nothing is persisted.
    pub fn load_links(&mut self, links: Vec<Link>) {
        self.links.load(links);
        self.changed();
    }

    // ==================== Category Operations ====================

    pub fn categories(&self) -> &[Category] {
        self.categories.items()
    }

    pub fn get_category(&self, id: &str) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn find_category(&self, name: &str) -> Option<&Category> {
        self.categories.find_by_name(name)
    }

    /// Add a new category at the end; names must be unique and non-empty
    pub fn add_category(&mut self, input: CategoryInput) -> CoreResult<WriteOutcome<Category>> {
        self.check_category_name(&input.name, None)?;
        let category = self
            .categories
            .add_category(input, new_id(), now_millis())
            .clone();
        self.changed();
        Ok(WriteOutcome::new(category, self.save_categories()))
    }

    /// Update a category; a rename is carried over to its links
    pub fn update_category(
        &mut self,
        patch: CategoryPatch,
    ) -> CoreResult<WriteOutcome<Category>> {
        let old_name = self
            .categories
            .get(&patch.id)
            .map(|category| category.name.clone())
            .ok_or_else(|| CoreError::not_found(EntityKind::Category, patch.id.as_str()))?;
        let renamed_to = patch.name.clone().filter(|name| *name != old_name);
        if let Some(name) = &renamed_to {
            self.check_category_name(name, Some(patch.id.as_str()))?;
        }

        let now = now_millis();
        let category = self.categories.update_category(patch, now)?.clone();
        self.changed();
        let mut saved = self.save_categories();

        if let Some(new_name) = renamed_to {
            let moved = self.rename_links_category(&old_name, Some(&new_name), now);
            debug!(from = %old_name, to = %new_name, links = moved, "Category renamed");
            if moved > 0 {
                saved = saved.and(self.save_links());
            }
            if self.settings.current_category == old_name {
                self.settings.current_category = new_name;
                saved = saved.and(self.save_settings());
            }
        }

        Ok(WriteOutcome::new(category, saved))
    }

    /// Delete a category, leaving its links uncategorized
    pub fn delete_category(&mut self, id: &str) -> CoreResult<WriteOutcome<CategoryDeletion>> {
        let name = self
            .categories
            .get(id)
            .map(|category| category.name.clone())
            .ok_or_else(|| CoreError::not_found(EntityKind::Category, id))?;

        let now = now_millis();
        let unassigned = self.rename_links_category(&name, None, now);
        let category = self.categories.delete(id)?;
        self.changed();

        let mut saved = Ok(());
        if unassigned > 0 {
            saved = self.save_links();
        }
        saved = saved.and(self.save_categories());
        if self.settings.current_category == name {
            self.settings.current_category = self
                .categories
                .items()
                .first()
                .map(|category| category.name.clone())
                .unwrap_or_default();
            saved = saved.and(self.save_settings());
        }

        debug!(name = %name, unassigned, "Category deleted");
        Ok(WriteOutcome::new(
            CategoryDeletion {
                category,
                unassigned,
            },
            saved,
        ))
    }

    /// Move a category from one display index to another
    pub fn reorder_categories(&mut self, from: usize, to: usize) -> CoreResult<WriteOutcome<()>> {
        self.categories.reorder(from, to, now_millis())?;
        self.changed();
        Ok(WriteOutcome::new((), self.save_categories()))
    }

    /// Replace all categories; nothing is persisted
    pub fn load_categories(&mut self, categories: Vec<Category>) {
        self.categories.load(categories);
        self.changed();
    }

    fn check_category_name(&self, name: &str, own_id: Option<&str>) -> CoreResult<()> {
        if name.trim().is_empty() {
            return Err(CoreError::validation("category name cannot be empty"));
        }
        match self.categories.find_by_name(name) {
            Some(existing) if Some(existing.id.as_str()) != own_id => Err(
                CoreError::validation(format!("a category named '{}' already exists", name)),
            ),
            _ => Ok(()),
        }
    }

    /// Point every link in category `from` at `to`; returns the count
    fn rename_links_category(&mut self, from: &str, to: Option<&str>, now: i64) -> usize {
        let ids: Vec<String> = self
            .links
            .items()
            .iter()
            .filter(|link| link.in_category(from))
            .map(|link| link.id.clone())
            .collect();

        for id in &ids {
            let mut patch = LinkPatch::new(id.as_str());
            patch.category = Some(to.map(str::to_string));
            if let Err(e) = self.links.update_link(patch, now) {
                warn!(id = %id, error = %e, "Failed to move link to new category");
            }
        }
        ids.len()
    }

    // ==================== Settings ====================

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) -> CoreResult<WriteOutcome<Settings>> {
        self.settings.apply(patch)?;
        Ok(WriteOutcome::new(self.settings.clone(), self.save_settings()))
    }

    pub fn reset_settings(&mut self) -> WriteOutcome<Settings> {
        self.settings = Settings::default();
        WriteOutcome::new(self.settings.clone(), self.save_settings())
    }

    // ==================== Import / Export ====================

    /// Parse and merge an import without changing anything
    pub fn prepare_import(&self, raw: &str) -> CoreResult<ImportPlan> {
        plan_import(
            raw,
            self.links.items(),
            self.categories.items(),
            now_millis(),
            self.revision,
        )
    }

    /// Apply a prepared import
    ///
    /// Rejected if the store changed since the plan was computed.
    pub fn commit_import(&mut self, plan: ImportPlan) -> CoreResult<WriteOutcome<ImportCounts>> {
        if plan.base_revision != self.revision {
            return Err(CoreError::StaleImport {
                expected: plan.base_revision,
                actual: self.revision,
            });
        }

        self.load_links(plan.links);
        self.load_categories(plan.categories);
        let saved = self.save_links().and(self.save_categories());
        info!(counts = %plan.counts, "Import committed");
        Ok(WriteOutcome::new(plan.counts, saved))
    }

    /// Tree-shaped snapshot of all data
    pub fn export(&self) -> ExportDocument {
        ExportDocument::build(self.links.items(), self.categories.items(), now_millis())
    }

    /// Wipe storage and start over with the seed data
    pub fn reset_to_defaults(&mut self) -> WriteOutcome<()> {
        let cleared = self.persistence.clear();
        if let Err(e) = &cleared {
            warn!(error = %e, "Failed to clear storage before reset");
        }

        let now = now_millis();
        self.load_links(default_links(now));
        self.load_categories(default_categories(now));
        self.settings = Settings::default();

        let saved = cleared
            .and(self.save_links())
            .and(self.save_categories())
            .and(self.save_settings());
        info!(links = self.links.len(), "Store reset to defaults");
        WriteOutcome::new((), saved)
    }

    // ==================== Queries ====================

    /// Links matching `query` (see [`search::search_links`])
    pub fn search(&self, query: &str) -> Vec<&Link> {
        search::search_links(self.links.items(), query)
    }

    /// Links in one category, or every link
    pub fn links_in_category(&self, category: Option<&str>) -> Vec<&Link> {
        search::filter_by_category(self.links.items(), category)
    }

    /// All tags with usage counts
    pub fn tags_with_counts(&self) -> BTreeMap<String, usize> {
        search::tag_counts(self.links.items())
    }

    /// Web search URL for `query` using the configured engine
    pub fn web_search_url(&self, query: &str) -> String {
        search::search_url(&self.settings.search_engine, query)
    }

    // ==================== Persistence ====================

    fn changed(&mut self) {
        self.revision += 1;
    }

    fn save_links(&mut self) -> Result<(), PersistenceError> {
        self.persistence.save(self.links.items())
    }

    fn save_categories(&mut self) -> Result<(), PersistenceError> {
        self.persistence.save(self.categories.items())
    }

    fn save_settings(&mut self) -> Result<(), PersistenceError> {
        self.persistence.save_settings(&self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileBackend, MemoryBackend};
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn config() -> Config {
        Config {
            backend: BackendKind::Memory,
            seed_defaults: false,
            ..Config::default()
        }
    }

    fn empty_store() -> Store {
        let persistence = Persistence::new(Box::new(MemoryBackend::new()), "nav");
        Store::with_persistence(persistence, config())
    }

    fn orders(links: &[Link]) -> Vec<usize> {
        links.iter().map(|l| l.order).collect()
    }

    fn add(store: &mut Store, name: &str, url: &str, category: Option<&str>) -> Link {
        let mut input = LinkInput::new(name, url);
        if let Some(category) = category {
            input = input.category(category);
        }
        let outcome = store.add_link(input);
        assert!(outcome.is_durable());
        outcome.value
    }

    #[test]
    fn test_add_delete_renumbers() {
        let mut store = empty_store();
        let x = add(&mut store, "X", "http://x.com", None);
        assert_eq!(x.order, 0);
        let y = add(&mut store, "Y", "http://y.com", None);
        assert_eq!(y.order, 1);

        store.delete_link(&x.id).unwrap().into_durable().unwrap();
        assert_eq!(store.links().len(), 1);
        assert_eq!(store.get_link(&y.id).unwrap().order, 0);
    }

    #[test]
    fn test_mutations_are_written_through() {
        let mut store = empty_store();
        add(&mut store, "X", "http://x.com", None);
        add(&mut store, "Y", "http://y.com", None);
        store.reorder_links(1, 0).unwrap().into_durable().unwrap();

        let persisted = store.persistence().load::<Link>().unwrap();
        assert_eq!(persisted, store.links());
        assert_eq!(persisted[0].name, "Y");
    }

    #[test]
    fn test_failed_operations_change_nothing() {
        let mut store = empty_store();
        add(&mut store, "X", "http://x.com", None);
        let before = store.links().to_vec();
        let revision = store.revision();

        assert!(matches!(
            store.delete_link("nope"),
            Err(CoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.reorder_links(0, 5),
            Err(CoreError::InvalidRange { .. })
        ));
        assert!(matches!(
            store.update_link(LinkPatch::new("nope")),
            Err(CoreError::NotFound { .. })
        ));
        assert_eq!(store.links(), before.as_slice());
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_delete_category_cascades() {
        let mut store = empty_store();
        let work = store
            .add_category(CategoryInput::new("Work"))
            .unwrap()
            .value;
        store.add_category(CategoryInput::new("Home")).unwrap();
        for i in 0..3 {
            add(&mut store, &format!("W{}", i), &format!("https://w{}.com", i), Some("Work"));
        }
        add(&mut store, "H", "https://h.com", Some("Home"));

        let deletion = store.delete_category(&work.id).unwrap();
        assert!(deletion.is_durable());
        assert_eq!(deletion.value.unassigned, 3);

        assert_eq!(store.links().len(), 4);
        assert!(store.find_category("Work").is_none());
        assert_eq!(store.links_in_category(Some("Work")).len(), 0);
        assert_eq!(
            store.links().iter().filter(|l| l.category.is_none()).count(),
            3
        );
        assert_eq!(store.categories()[0].order, 0);

        let persisted = store.persistence().load::<Link>().unwrap();
        assert_eq!(persisted.iter().filter(|l| l.category.is_none()).count(), 3);
    }

    #[test]
    fn test_rename_category_moves_links() {
        let mut store = empty_store();
        let work = store
            .add_category(CategoryInput::new("Work"))
            .unwrap()
            .value;
        add(&mut store, "A", "https://a.com", Some("Work"));
        store
            .update_settings(SettingsPatch {
                current_category: Some("Work".to_string()),
                ..Default::default()
            })
            .unwrap();

        let mut patch = CategoryPatch::new(work.id.as_str());
        patch.name = Some("Job".to_string());
        store.update_category(patch).unwrap().into_durable().unwrap();

        assert_eq!(store.links()[0].category_name(), Some("Job"));
        assert_eq!(store.settings().current_category, "Job");
    }

    #[test]
    fn test_category_names_must_be_unique() {
        let mut store = empty_store();
        store.add_category(CategoryInput::new("Work")).unwrap();
        let home = store
            .add_category(CategoryInput::new("Home"))
            .unwrap()
            .value;

        assert!(matches!(
            store.add_category(CategoryInput::new("Work")),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            store.add_category(CategoryInput::new("  ")),
            Err(CoreError::Validation(_))
        ));

        let mut patch = CategoryPatch::new(home.id.as_str());
        patch.name = Some("Work".to_string());
        assert!(store.update_category(patch).is_err());

        // keeping your own name is fine
        let mut patch = CategoryPatch::new(home.id.as_str());
        patch.name = Some("Home".to_string());
        patch.icon = Some("HomeOutlined".to_string());
        assert!(store.update_category(patch).is_ok());
    }

    #[test]
    fn test_batch_operations_are_all_or_nothing() {
        let mut store = empty_store();
        let a = add(&mut store, "A", "https://a.com", None);
        let b = add(&mut store, "B", "https://b.com", None);
        add(&mut store, "C", "https://c.com", None);

        let bad = vec![a.id.clone(), "missing".to_string()];
        assert!(store.set_links_category(&bad, Some("Work")).is_err());
        assert!(store.delete_links(&bad).is_err());
        assert_eq!(store.links().len(), 3);
        assert!(store.links().iter().all(|l| l.category.is_none()));

        let ids = vec![a.id.clone(), b.id.clone()];
        let outcome = store.set_links_category(&ids, Some("Work")).unwrap();
        assert_eq!(outcome.value, 2);
        assert_eq!(store.links_in_category(Some("Work")).len(), 2);

        let removed = store.delete_links(&ids).unwrap().value;
        assert_eq!(removed.len(), 2);
        assert_eq!(orders(store.links()), [0]);
    }

    #[test]
    fn test_failed_save_keeps_mutation() {
        let persistence =
            Persistence::new(Box::new(MemoryBackend::new()), "nav").with_quota(Some(10));
        let mut store = Store::with_persistence(persistence, config());

        let outcome = store.add_link(LinkInput::new("X", "http://x.com"));
        let err = outcome.saved.clone().unwrap_err();
        assert!(err.is_quota_exceeded());
        assert_eq!(store.links().len(), 1);
        assert!(store.persistence().load::<Link>().is_none());
    }

    #[test]
    fn test_import_twice_is_idempotent() {
        let mut source = empty_store();
        source.add_category(CategoryInput::new("Work")).unwrap();
        add(&mut source, "A", "https://a.com", Some("Work"));
        add(&mut source, "B", "https://b.com", None);
        let json = source.export().to_json_pretty().unwrap();

        let mut store = empty_store();
        let plan = store.prepare_import(&json).unwrap();
        assert_eq!(plan.counts.new_links, 2);
        assert_eq!(plan.counts.new_categories, 1);
        store.commit_import(plan).unwrap().into_durable().unwrap();

        let plan = store.prepare_import(&json).unwrap();
        assert_eq!(plan.counts.new_links, 0);
        assert_eq!(plan.counts.updated_links, 2);
        assert_eq!(plan.counts.new_categories, 0);
        assert_eq!(plan.counts.updated_categories, 1);
        store.commit_import(plan).unwrap().into_durable().unwrap();

        assert_eq!(store.links().len(), 2);
        assert_eq!(store.links()[0].category_name(), Some("Work"));
        assert_eq!(orders(store.links()), [0, 1]);
    }

    #[test]
    fn test_prepared_import_changes_nothing_until_commit() {
        let mut store = empty_store();
        add(&mut store, "A", "https://a.com", None);
        let json = r#"[{"id":"n","name":"N","url":"https://n.com","description":"",
                        "order":0,"createdAt":1,"updatedAt":1}]"#;

        let plan = store.prepare_import(json).unwrap();
        assert_eq!(plan.links.len(), 2);
        assert_eq!(store.links().len(), 1);

        // any mutation in between makes the plan stale
        add(&mut store, "B", "https://b.com", None);
        assert!(matches!(
            store.commit_import(plan),
            Err(CoreError::StaleImport { .. })
        ));
        assert_eq!(store.links().len(), 2);
    }

    #[test]
    fn test_invalid_import_never_enters_store() {
        let mut store = empty_store();
        add(&mut store, "A", "https://a.com", None);
        let json = r#"{"links":[{"id":"n","name":"N","description":"","order":0,"createdAt":1,"updatedAt":1}]}"#;
        assert!(matches!(
            store.prepare_import(json),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(store.links().len(), 1);
    }

    #[test]
    fn test_seed_defaults_only_when_absent() {
        let seeded = Store::with_persistence(
            Persistence::new(Box::new(MemoryBackend::new()), "nav"),
            Config {
                seed_defaults: true,
                ..config()
            },
        );
        assert!(!seeded.links().is_empty());
        assert!(!seeded.categories().is_empty());

        // an explicitly empty collection is not replaced by seed data
        let mut backend = MemoryBackend::new();
        use crate::storage::KeyValueBackend;
        backend.set("nav_links", "[]").unwrap();
        let store = Store::with_persistence(
            Persistence::new(Box::new(backend), "nav"),
            Config {
                seed_defaults: true,
                ..config()
            },
        );
        assert!(store.links().is_empty());
        assert!(!store.categories().is_empty());
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut store = empty_store();
        add(&mut store, "A", "https://a.com", None);
        store
            .update_settings(SettingsPatch {
                grid_columns: Some(3),
                ..Default::default()
            })
            .unwrap();

        store.reset_to_defaults().into_durable().unwrap();
        assert_eq!(store.links().len(), default_links(0).len());
        assert_eq!(store.settings(), &Settings::default());
        assert_eq!(
            store.persistence().load::<Category>().unwrap().len(),
            default_categories(0).len()
        );
    }

    #[test]
    fn test_settings_update_is_validated() {
        let mut store = empty_store();
        let bad = SettingsPatch {
            theme: Some(crate::settings::ThemeMode::Dark),
            grid_columns: Some(40),
            ..Default::default()
        };
        assert!(store.update_settings(bad).is_err());
        assert_eq!(store.settings(), &Settings::default());
        assert!(store.persistence().load_settings().is_none());
    }

    #[test]
    fn test_reopen_sqlite_store() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().join("data"),
            backend: BackendKind::Sqlite,
            seed_defaults: false,
            ..Config::default()
        };

        let links = {
            let mut store = Store::open_with_config(config.clone()).unwrap();
            store.add_category(CategoryInput::new("Work")).unwrap();
            add(&mut store, "A", "https://a.com", Some("Work"));
            add(&mut store, "B", "https://b.com", None);
            store.links().to_vec()
        };

        let store = Store::open_with_config(config).unwrap();
        assert_eq!(store.links(), links.as_slice());
        assert_eq!(store.categories()[0].name, "Work");
        assert_eq!(store.persistence().version().as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_rehydrate_after_external_write() {
        let temp_dir = TempDir::new().unwrap();
        let open = || {
            let backend = FileBackend::open(temp_dir.path()).unwrap();
            Store::with_persistence(Persistence::new(Box::new(backend), "nav"), config())
        };

        let mut writer = open();
        let mut reader = open();

        let notified = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notified);
        writer
            .persistence_mut()
            .subscribe(move |_| counter.set(counter.get() + 1));

        add(&mut writer, "A", "https://a.com", None);
        assert!(notified.get() > 0);
        assert!(reader.links().is_empty());

        reader.rehydrate();
        assert_eq!(reader.links(), writer.links());
    }

    #[test]
    fn test_search_and_tags() {
        let mut store = empty_store();
        add(&mut store, "Rust", "https://rust-lang.org", None);
        let _ = store.add_link(LinkInput::new("Go", "https://go.dev").tag("lang"));
        let _ = store.add_link(LinkInput::new("Zig", "https://ziglang.org").tag("lang"));

        assert_eq!(store.search("rust").len(), 1);
        assert_eq!(store.search("").len(), 3);
        assert_eq!(store.tags_with_counts().get("lang"), Some(&2));
        assert_eq!(
            store.web_search_url("a b"),
            "https://www.google.com/search?q=a+b"
        );
    }
}
