//! Merging imported records into existing collections
//!
//! Links are matched by `url`, categories by `name`. Both functions are pure:
//! they take the current records and return the merged list plus how many
//! entries were new or updated. Results are densely ordered.
//!
//! Ordering policy:
//! - links: existing links keep their relative order with matched ones
//!   replaced in place, new links follow in import order
//! - categories: matched categories keep their `order`, new ones take the
//!   first free slot at or above their imported `order`

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::{new_id, Category, Entity, Link};

/// A merged collection with change counts
#[derive(Debug, Clone, PartialEq)]
pub struct Merged<T> {
    pub items: Vec<T>,
    pub new: usize,
    pub updated: usize,
}

/// Merge imported links into `existing`
///
/// `existing` must be in display order. When several existing links share a
/// url, the first one is the match target; each existing link is matched at
/// most once, so a repeated url in the import becomes a new link.
pub fn merge_links(existing: &[Link], imported: Vec<Link>, now: i64) -> Merged<Link> {
    let mut by_url: HashMap<&str, usize> = HashMap::new();
    for (index, link) in existing.iter().enumerate() {
        by_url.entry(link.url.as_str()).or_insert(index);
    }

    let mut items = existing.to_vec();
    let mut ids: HashSet<String> = existing.iter().map(|l| l.id.clone()).collect();
    let mut appended = Vec::new();
    let mut updated = 0;

    for link in imported {
        match by_url.remove(link.url.as_str()) {
            Some(index) => {
                let current = &items[index];
                items[index] = Link {
                    id: current.id.clone(),
                    created_at: current.created_at,
                    updated_at: now,
                    ..link
                };
                updated += 1;
            }
            None => {
                let mut link = link;
                link.updated_at = now;
                claim_id(&mut link.id, &mut ids);
                appended.push(link);
            }
        }
    }

    let new = appended.len();
    items.extend(appended);
    renumber(&mut items);

    Merged {
        items,
        new,
        updated,
    }
}

/// Merge imported categories into `existing`
///
/// A name repeated within the import updates the category it already
/// produced, so merged names stay unique.
pub fn merge_categories(
    existing: &[Category],
    imported: Vec<Category>,
    now: i64,
) -> Merged<Category> {
    let mut by_name: HashMap<String, usize> = HashMap::new();
    for (index, category) in existing.iter().enumerate() {
        by_name.entry(category.name.clone()).or_insert(index);
    }

    // a free slot always exists at or above this one
    let fallback_start = existing.len() + imported.len();
    let mut items = existing.to_vec();
    let mut ids: HashSet<String> = existing.iter().map(|c| c.id.clone()).collect();
    let mut used_orders: BTreeSet<usize> = existing.iter().map(|c| c.order).collect();
    let mut touched: HashSet<usize> = HashSet::new();
    let mut new = 0;
    let mut updated = 0;

    for category in imported {
        match by_name.get(category.name.as_str()).copied() {
            Some(index) => {
                let current = &items[index];
                items[index] = Category {
                    id: current.id.clone(),
                    order: current.order,
                    created_at: current.created_at,
                    updated_at: now,
                    ..category
                };
                if index < existing.len() && touched.insert(index) {
                    updated += 1;
                }
            }
            None => {
                let mut category = category;
                let mut order = category.order;
                while used_orders.contains(&order) {
                    order = order.checked_add(1).unwrap_or(fallback_start);
                }
                used_orders.insert(order);

                category.order = order;
                category.updated_at = now;
                claim_id(&mut category.id, &mut ids);
                by_name.insert(category.name.clone(), items.len());
                items.push(category);
                new += 1;
            }
        }
    }

    items.sort_by_key(|category| category.order);
    renumber(&mut items);

    Merged {
        items,
        new,
        updated,
    }
}

/// Keep `id` if unused, otherwise replace it with a fresh one
fn claim_id(id: &mut String, ids: &mut HashSet<String>) {
    if id.is_empty() || ids.contains(id.as_str()) {
        *id = new_id();
    }
    ids.insert(id.clone());
}

fn renumber<T: Entity>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_order(index);
    }
}
