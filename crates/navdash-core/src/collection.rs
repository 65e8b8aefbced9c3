//! Ordered entity collections
//!
//! A `Collection<T>` is the in-memory authority for one entity kind. It keeps
//! its records in display order and guarantees that after every successful
//! mutation the `order` fields read exactly `0..len`.
//!
//! Collections know nothing about persistence or about the other entity
//! kind: cascading between links and categories is the job of `Store`.

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::models::{Category, CategoryInput, CategoryPatch, Entity, Link, LinkInput, LinkPatch};

/// An ordered collection of one entity kind
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
}

pub type LinkCollection = Collection<Link>;
pub type CategoryCollection = Collection<Category>;

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from arbitrary records (see [`Collection::load`])
    pub fn from_items(items: Vec<T>) -> Self {
        let mut collection = Self::new();
        collection.load(items);
        collection
    }

    /// Snapshot of all records in display order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Display index of a record
    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Append a record at the end, assigning it the next order slot
    pub fn append(&mut self, mut item: T) -> &T {
        let index = self.items.len();
        item.set_order(index);
        debug!(kind = %T::KIND, id = item.id(), order = index, "appended");
        self.items.push(item);
        &self.items[index]
    }

    /// Apply `change` to the record with `id` and refresh its `updatedAt`
    pub fn update_with<F>(&mut self, id: &str, now: i64, change: F) -> CoreResult<&T>
    where
        F: FnOnce(&mut T),
    {
        let index = self
            .position(id)
            .ok_or_else(|| CoreError::not_found(T::KIND, id))?;

        let item = &mut self.items[index];
        change(item);
        item.touch(now);
        debug!(kind = %T::KIND, id, "updated");
        Ok(&self.items[index])
    }

    /// Remove a record and close the gap in the ordering
    pub fn delete(&mut self, id: &str) -> CoreResult<T> {
        let index = self
            .position(id)
            .ok_or_else(|| CoreError::not_found(T::KIND, id))?;

        let removed = self.items.remove(index);
        self.renumber();
        debug!(kind = %T::KIND, id, remaining = self.items.len(), "deleted");
        Ok(removed)
    }

    /// Remove several records at once
    ///
    /// Every id is checked before anything is removed, so an unknown id
    /// leaves the collection untouched.
    pub fn delete_many(&mut self, ids: &[String]) -> CoreResult<Vec<T>> {
        if let Some(missing) = ids.iter().find(|id| !self.contains(id)) {
            return Err(CoreError::not_found(T::KIND, missing.as_str()));
        }

        let (removed, kept): (Vec<T>, Vec<T>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| ids.iter().any(|id| id == item.id()));
        self.items = kept;
        self.renumber();
        debug!(kind = %T::KIND, count = removed.len(), "batch deleted");
        Ok(removed)
    }

    /// Move the record at `from` so that it ends up at index `to`
    ///
    /// Splice semantics: remove then reinsert. Every record gets a fresh
    /// `order` and `updatedAt`.
    pub fn reorder(&mut self, from: usize, to: usize, now: i64) -> CoreResult<()> {
        let len = self.items.len();
        if from >= len || to >= len {
            return Err(CoreError::InvalidRange { from, to, len });
        }

        let moved = self.items.remove(from);
        self.items.insert(to, moved);
        for (index, item) in self.items.iter_mut().enumerate() {
            item.set_order(index);
            item.touch(now);
        }
        debug!(kind = %T::KIND, from, to, "reordered");
        Ok(())
    }

    /// Replace the whole collection
    ///
    /// Records are stable-sorted by their `order` and then renumbered so the
    /// ordering is dense even if the input had gaps or ties. Timestamps are
    /// left as given.
    pub fn load(&mut self, mut items: Vec<T>) {
        items.sort_by_key(|item| item.order());
        self.items = items;
        self.renumber();
        debug!(kind = %T::KIND, count = self.items.len(), "loaded");
    }

    fn renumber(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.set_order(index);
        }
    }
}

impl Collection<Link> {
    /// Create a link from input with a fresh id
    pub fn add_link(&mut self, input: LinkInput, id: String, now: i64) -> &Link {
        self.append(Link::from_input(input, id, now))
    }

    pub fn update_link(&mut self, patch: LinkPatch, now: i64) -> CoreResult<&Link> {
        let id = patch.id.clone();
        self.update_with(&id, now, |link| patch.apply(link))
    }
}

impl Collection<Category> {
    /// Create a category from input with a fresh id
    pub fn add_category(&mut self, input: CategoryInput, id: String, now: i64) -> &Category {
        self.append(Category::from_input(input, id, now))
    }

    pub fn update_category(&mut self, patch: CategoryPatch, now: i64) -> CoreResult<&Category> {
        let id = patch.id.clone();
        self.update_with(&id, now, |category| patch.apply(category))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Category> {
        self.items().iter().find(|category| category.name == name)
    }
}
