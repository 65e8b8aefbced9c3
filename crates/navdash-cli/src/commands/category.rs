//! Category command handlers

use anyhow::{bail, Result};

use navdash_core::{Category, CategoryInput, CategoryPatch, Store};

use crate::output::{short_id, Output};
use crate::prompt::confirm;

/// Create a new category
pub fn add(store: &mut Store, name: String, icon: Option<String>, output: &Output) -> Result<()> {
    let mut input = CategoryInput::new(name.trim());
    if let Some(icon) = icon {
        input = input.icon(icon);
    }

    let category = output.outcome(store.add_category(input)?);

    output.success(&format!("Created category: {}", category.name));
    output.print_category(&category);
    Ok(())
}

/// List categories with link counts
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let mut counts = std::collections::BTreeMap::new();
    for link in store.links() {
        if let Some(name) = link.category_name() {
            *counts.entry(name.to_string()).or_insert(0) += 1;
        }
    }
    output.print_categories(store.categories(), &counts);
    Ok(())
}

/// Rename a category or change its icon
pub fn edit(
    store: &mut Store,
    id: String,
    name: Option<String>,
    icon: Option<String>,
    output: &Output,
) -> Result<()> {
    let category = resolve_category(store, &id)?;

    let mut patch = CategoryPatch::new(category.id.as_str());
    patch.name = name.map(|n| n.trim().to_string());
    patch.icon = icon;
    if patch.name.is_none() && patch.icon.is_none() {
        bail!("Nothing to change. Pass --name or --icon.");
    }

    let updated = output.outcome(store.update_category(patch)?);

    output.success(&format!("Category updated: {}", updated.name));
    output.print_category(&updated);
    Ok(())
}

/// Delete a category; its links become uncategorized
pub fn delete(store: &mut Store, id: String, yes: bool, output: &Output) -> Result<()> {
    let category = resolve_category(store, &id)?.clone();

    if output.should_prompt() && !yes {
        let count = store.links_in_category(Some(&category.name)).len();
        println!(
            "Delete category: {} - {} ({} link(s) will become uncategorized)",
            short_id(&category.id),
            category.name,
            count
        );
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let deletion = output.outcome(store.delete_category(&category.id)?);

    output.success(&format!(
        "Deleted category {}; {} link(s) uncategorized",
        deletion.category.name, deletion.unassigned
    ));
    Ok(())
}

/// Move a category to a new position (0-based)
pub fn move_to(store: &mut Store, id: String, position: usize, output: &Output) -> Result<()> {
    let category = resolve_category(store, &id)?;
    let (name, from) = (category.name.clone(), category.order);

    output.outcome(store.reorder_categories(from, position)?);

    output.success(&format!(
        "Moved category {} from position {} to {}",
        name, from, position
    ));
    Ok(())
}

/// Resolve a category by exact name, full id or unique id prefix
pub fn resolve_category<'a>(store: &'a Store, key: &str) -> Result<&'a Category> {
    if let Some(category) = store.find_category(key) {
        return Ok(category);
    }
    if let Some(category) = store.get_category(key) {
        return Ok(category);
    }

    let matches: Vec<_> = store
        .categories()
        .iter()
        .filter(|c| c.id.starts_with(key))
        .collect();

    match matches.as_slice() {
        [] => bail!("No category found matching: {}", key),
        [category] => Ok(*category),
        _ => {
            eprintln!("Multiple categories match '{}':", key);
            for category in &matches {
                eprintln!("  {} - {}", category.id, category.name);
            }
            bail!("Ambiguous ID. Please provide more characters or the full name.");
        }
    }
}
