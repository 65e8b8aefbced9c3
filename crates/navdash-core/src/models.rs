//! Data models for navdash
//!
//! Defines the two entity kinds, Link and Category, together with the
//! input/patch types used by the mutation operations. Field names are
//! serialized in camelCase so persisted data and import/export files share
//! one JSON layout.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::validate;

/// Current epoch time in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate a fresh opaque entity id
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Which kind of entity a record is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Link,
    Category,
}

impl EntityKind {
    /// Collection name used for persistence keys
    pub fn collection_name(self) -> &'static str {
        match self {
            EntityKind::Link => "links",
            EntityKind::Category => "categories",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Link => write!(f, "Link"),
            EntityKind::Category => write!(f, "Category"),
        }
    }
}

/// Behaviour shared by every ordered, persisted record
pub trait Entity: Clone + Serialize + DeserializeOwned {
    const KIND: EntityKind;

    fn id(&self) -> &str;
    fn order(&self) -> usize;
    fn set_order(&mut self, order: usize);
    /// Refresh `updatedAt`
    fn touch(&mut self, now: i64);
    /// Schema check on an untyped JSON value
    fn is_valid(value: &Value) -> bool;
}

/// A navigation link
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub name: String,
    pub url: String,
    pub description: String,
    /// Icon URL or symbolic icon name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Hex color behind the icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Icon-to-background ratio, display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_scale: Option<f64>,
    /// Name of the owning category; empty or absent means uncategorized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub order: usize,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Link {
    /// Build a new record from creation input
    ///
    /// `order` is left at zero; the collection assigns the real slot.
    pub fn from_input(input: LinkInput, id: String, now: i64) -> Self {
        Self {
            id,
            name: input.name,
            url: input.url,
            description: input.description,
            icon: input.icon,
            background_color: input.background_color,
            icon_scale: input.icon_scale,
            category: input.category.filter(|c| !c.is_empty()),
            tags: input.tags,
            order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// The category name, treating an empty string as uncategorized
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// Whether this link belongs to the named category
    pub fn in_category(&self, name: &str) -> bool {
        self.category_name() == Some(name)
    }
}

impl Entity for Link {
    const KIND: EntityKind = EntityKind::Link;

    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> usize {
        self.order
    }

    fn set_order(&mut self, order: usize) {
        self.order = order;
    }

    fn touch(&mut self, now: i64) {
        self.updated_at = now;
    }

    fn is_valid(value: &Value) -> bool {
        validate::is_valid_link(value)
    }
}

/// Fields supplied when creating a link
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkInput {
    pub name: String,
    pub url: String,
    pub description: String,
    pub icon: Option<String>,
    pub background_color: Option<String>,
    pub icon_scale: Option<f64>,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

impl LinkInput {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Partial update for a link
///
/// `None` leaves a field untouched. For optional fields, `Some(None)` clears
/// the value. Ordering and timestamps are not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkPatch {
    pub id: String,
    pub name: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub icon: Option<Option<String>>,
    pub background_color: Option<Option<String>>,
    pub icon_scale: Option<Option<f64>>,
    pub category: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl LinkPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// True when the patch would not change any field
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.url.is_none()
            && self.description.is_none()
            && self.icon.is_none()
            && self.background_color.is_none()
            && self.icon_scale.is_none()
            && self.category.is_none()
            && self.tags.is_none()
    }

    pub(crate) fn apply(self, link: &mut Link) {
        if let Some(name) = self.name {
            link.name = name;
        }
        if let Some(url) = self.url {
            link.url = url;
        }
        if let Some(description) = self.description {
            link.description = description;
        }
        if let Some(icon) = self.icon {
            link.icon = icon;
        }
        if let Some(color) = self.background_color {
            link.background_color = color;
        }
        if let Some(scale) = self.icon_scale {
            link.icon_scale = scale;
        }
        if let Some(category) = self.category {
            link.category = category.filter(|c| !c.is_empty());
        }
        if let Some(tags) = self.tags {
            link.tags = tags;
        }
    }
}

/// A named group of links
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    /// Unique display label, referenced by `Link::category`
    pub name: String,
    /// Symbolic icon name
    pub icon: String,
    pub order: usize,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Category {
    pub fn from_input(input: CategoryInput, id: String, now: i64) -> Self {
        Self {
            id,
            name: input.name,
            icon: input.icon,
            order: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Category {
    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> usize {
        self.order
    }

    fn set_order(&mut self, order: usize) {
        self.order = order;
    }

    fn touch(&mut self, now: i64) {
        self.updated_at = now;
    }

    fn is_valid(value: &Value) -> bool {
        validate::is_valid_category(value)
    }
}

/// Fields supplied when creating a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    pub icon: String,
}

/// Icon used for categories created without one
pub const DEFAULT_CATEGORY_ICON: &str = "AppstoreOutlined";

impl CategoryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: DEFAULT_CATEGORY_ICON.to_string(),
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

/// Partial update for a category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub id: String,
    pub name: Option<String>,
    pub icon: Option<String>,
}

impl CategoryPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub(crate) fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(icon) = self.icon {
            category.icon = icon;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_link() -> Link {
        Link::from_input(
            LinkInput::new("Rust", "https://rust-lang.org")
                .description("The Rust language")
                .category("Dev")
                .tag("lang"),
            "l-1".to_string(),
            1_000,
        )
    }

    #[test]
    fn test_link_from_input() {
        let link = sample_link();
        assert_eq!(link.id, "l-1");
        assert_eq!(link.order, 0);
        assert_eq!(link.created_at, 1_000);
        assert_eq!(link.updated_at, 1_000);
        assert_eq!(link.category_name(), Some("Dev"));
        assert_eq!(link.tags, vec!["lang"]);
    }

    #[test]
    fn test_empty_category_is_uncategorized() {
        let link = Link::from_input(
            LinkInput::new("X", "http://x.com").category(""),
            new_id(),
            0,
        );
        assert!(link.category.is_none());
        assert!(link.category_name().is_none());
    }

    #[test]
    fn test_link_serializes_camel_case() {
        let mut link = sample_link();
        link.background_color = Some("#1890ff".to_string());
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["backgroundColor"], "#1890ff");
        assert_eq!(json["createdAt"], 1_000);
        assert!(json.get("icon").is_none());
        assert!(json.get("iconScale").is_none());
    }

    #[test]
    fn test_link_deserializes_without_optionals() {
        let json = r#"{"id":"a","name":"A","url":"a.com","description":"","order":3,"createdAt":1,"updatedAt":2}"#;
        let link: Link = serde_json::from_str(json).unwrap();
        assert_eq!(link.order, 3);
        assert!(link.tags.is_empty());
        assert!(link.category.is_none());
    }

    #[test]
    fn test_patch_sets_and_clears_fields() {
        let mut link = sample_link();
        link.icon = Some("StarOutlined".to_string());

        let mut patch = LinkPatch::new("l-1");
        patch.name = Some("Rust Lang".to_string());
        patch.icon = Some(None);
        patch.category = Some(Some(String::new()));
        assert!(!patch.is_empty());
        patch.apply(&mut link);

        assert_eq!(link.name, "Rust Lang");
        assert!(link.icon.is_none());
        assert!(link.category.is_none());
        assert_eq!(link.url, "https://rust-lang.org");
    }

    #[test]
    fn test_empty_patch() {
        assert!(LinkPatch::new("x").is_empty());
    }

    #[test]
    fn test_category_input_default_icon() {
        let category = Category::from_input(CategoryInput::new("Work"), "c".to_string(), 5);
        assert_eq!(category.icon, DEFAULT_CATEGORY_ICON);
        assert_eq!(category.created_at, 5);
    }

    #[test]
    fn test_entity_kind_collection_names() {
        assert_eq!(<Link as Entity>::KIND.collection_name(), "links");
        assert_eq!(<Category as Entity>::KIND.collection_name(), "categories");
        assert_eq!(EntityKind::Category.to_string(), "Category");
    }

    #[test]
    fn test_new_id_is_unique() {
        assert_ne!(new_id(), new_id());
    }
}
