//! Link command handlers

use anyhow::{bail, Context, Result};

use navdash_core::validate::is_hex_color;
use navdash_core::{Link, LinkInput, LinkPatch, Store};

use crate::output::{short_id, Output};
use crate::prompt::{confirm, is_interactive, prompt_with_default, split_list};

/// Optional fields shared by `link add` and `link edit`
#[derive(Debug, Default)]
pub struct LinkFields {
    pub name: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Create a new link
pub fn add(store: &mut Store, fields: LinkFields, output: &Output) -> Result<()> {
    let url = fields.url.context("A URL is required")?;
    let url = normalize_url(&url)?;
    let name = fields.name.unwrap_or_else(|| default_name(&url));
    if let Some(ref color) = fields.color {
        check_color(color)?;
    }

    let mut input = LinkInput::new(name, url);
    input.description = fields.description.unwrap_or_default();
    input.tags = fields.tags;
    input.icon = fields.icon;
    input.background_color = fields.color;
    if let Some(category) = fields.category {
        if store.find_category(&category).is_none() {
            output.warning(&format!(
                "Category '{}' does not exist; create it with `navdash category add`",
                category
            ));
        }
        input = input.category(category);
    }

    let link = output.outcome(store.add_link(input));

    output.success(&format!("Created link: {}", link.id));
    output.print_link(&link);

    Ok(())
}

/// List links, optionally filtered by category or tag
pub fn list(
    store: &Store,
    category: Option<String>,
    uncategorized: bool,
    tag: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut links = store.links_in_category(category.as_deref());
    if uncategorized {
        links.retain(|link| link.category_name().is_none());
    }
    if let Some(ref tag) = tag {
        links.retain(|link| link.tags.iter().any(|t| t == tag));
    }

    output.print_links(&links);
    Ok(())
}

/// Show a single link
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let link = resolve_link(store, &id)?;
    output.print_link(link);
    Ok(())
}

/// Edit a link
///
/// With no field flags and an interactive terminal, prompts for each field.
pub fn edit(
    store: &mut Store,
    id: String,
    fields: LinkFields,
    clear_category: bool,
    output: &Output,
) -> Result<()> {
    let link = resolve_link(store, &id)?.clone();

    let mut patch = LinkPatch::new(link.id.as_str());
    let no_flags = fields.name.is_none()
        && fields.url.is_none()
        && fields.description.is_none()
        && fields.category.is_none()
        && fields.tags.is_empty()
        && fields.icon.is_none()
        && fields.color.is_none()
        && !clear_category;

    if no_flags {
        if !is_interactive() {
            bail!("Nothing to change. Pass --name, --url, --description, --category or --tag.");
        }
        prompt_patch(&link, &mut patch)?;
    } else {
        if let Some(ref color) = fields.color {
            if !color.is_empty() {
                check_color(color)?;
            }
        }
        patch.name = fields.name;
        patch.url = fields.url.as_deref().map(normalize_url).transpose()?;
        patch.description = fields.description;
        if !fields.tags.is_empty() {
            patch.tags = Some(fields.tags);
        }
        if clear_category {
            patch.category = Some(None);
        } else if let Some(category) = fields.category {
            patch.category = Some(Some(category));
        }
        patch.icon = fields.icon.map(|icon| (!icon.is_empty()).then_some(icon));
        patch.background_color = fields.color.map(|color| (!color.is_empty()).then_some(color));
    }

    if patch.is_empty() {
        output.message("No changes.");
        return Ok(());
    }

    let updated = output.outcome(store.update_link(patch)?);

    output.success("Link updated");
    output.print_link(&updated);

    Ok(())
}

fn prompt_patch(link: &Link, patch: &mut LinkPatch) -> Result<()> {
    println!("Editing link: {}", link.id);
    println!("Press Enter to keep current value, or type new value.\n");

    patch.name = prompt_with_default("Name", &link.name)?;
    patch.url = prompt_with_default("URL", &link.url)?
        .as_deref()
        .map(normalize_url)
        .transpose()?;
    patch.description = prompt_with_default("Description", &link.description)?;
    if let Some(category) =
        prompt_with_default("Category (- for none)", link.category_name().unwrap_or(""))?
    {
        patch.category = Some((category != "-").then_some(category));
    }
    if let Some(tags) = prompt_with_default("Tags (comma-separated)", &link.tags.join(", "))? {
        patch.tags = Some(split_list(&tags));
    }
    Ok(())
}

/// Delete one or more links
pub fn delete(store: &mut Store, ids: Vec<String>, yes: bool, output: &Output) -> Result<()> {
    let links: Vec<Link> = ids
        .iter()
        .map(|id| resolve_link(store, id).cloned())
        .collect::<Result<_>>()?;

    if output.should_prompt() && !yes {
        for link in &links {
            println!("Delete link: {} - {}", short_id(&link.id), link.name);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let ids: Vec<String> = links.into_iter().map(|link| link.id).collect();
    let removed = if let [id] = ids.as_slice() {
        vec![output.outcome(store.delete_link(id)?)]
    } else {
        output.outcome(store.delete_links(&ids)?)
    };

    output.success(&format!("Deleted {} link(s)", removed.len()));

    Ok(())
}

/// Move a link to a new position (0-based)
pub fn move_to(store: &mut Store, id: String, position: usize, output: &Output) -> Result<()> {
    let link = resolve_link(store, &id)?;
    let (link_id, from) = (link.id.clone(), link.order);

    output.outcome(store.reorder_links(from, position)?);

    output.success(&format!(
        "Moved link {} from position {} to {}",
        short_id(&link_id),
        from,
        position
    ));
    Ok(())
}

/// Open a link in the default browser
pub fn open(store: &Store, id: String, output: &Output) -> Result<()> {
    let link = resolve_link(store, &id)?;
    ::open::that(&link.url).with_context(|| format!("Failed to open {}", link.url))?;
    output.success(&format!("Opened {}", link.url));
    Ok(())
}

/// Assign several links to a category, or clear it
pub fn categorize(
    store: &mut Store,
    ids: Vec<String>,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    let ids: Vec<String> = ids
        .iter()
        .map(|id| resolve_link(store, id).map(|link| link.id.clone()))
        .collect::<Result<_>>()?;

    if let Some(ref name) = category {
        if store.find_category(name).is_none() {
            bail!(
                "Category '{}' does not exist; create it with `navdash category add`",
                name
            );
        }
    }

    let changed = output.outcome(store.set_links_category(&ids, category.as_deref())?);

    match category {
        Some(name) => output.success(&format!("Moved {} link(s) to {}", changed, name)),
        None => output.success(&format!("Cleared the category of {} link(s)", changed)),
    }
    Ok(())
}

/// Resolve a link by full id or unique id prefix
pub fn resolve_link<'a>(store: &'a Store, id: &str) -> Result<&'a Link> {
    if let Some(link) = store.get_link(id) {
        return Ok(link);
    }

    let matches: Vec<_> = store
        .links()
        .iter()
        .filter(|l| l.id.starts_with(id))
        .collect();

    match matches.as_slice() {
        [] => bail!("No link found matching: {}", id),
        [link] => Ok(*link),
        _ => {
            eprintln!("Multiple links match '{}':", id);
            for link in &matches {
                eprintln!("  {} - {}", link.id, link.name);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// Require an absolute URL, adding `https://` when the scheme is missing
fn normalize_url(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };
    let parsed = url::Url::parse(&candidate).with_context(|| format!("Invalid URL: {}", raw))?;
    if parsed.host_str().is_none() {
        bail!("Invalid URL: {} has no host", raw);
    }
    Ok(candidate)
}

fn check_color(color: &str) -> Result<()> {
    if !is_hex_color(color) {
        bail!("Invalid color: {} (expected #rgb or #rrggbb)", color);
    }
    Ok(())
}

/// Host name without `www.`, used when no name is given
fn default_name(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("example.com").unwrap(), "https://example.com");
        assert_eq!(
            normalize_url(" http://example.com/a ").unwrap(),
            "http://example.com/a"
        );
        assert!(normalize_url("http://").is_err());
        assert!(normalize_url("not a url").is_err());
    }

    #[test]
    fn test_default_name() {
        assert_eq!(default_name("https://www.rust-lang.org/learn"), "rust-lang.org");
        assert_eq!(default_name("https://docs.rs"), "docs.rs");
    }

    #[test]
    fn test_check_color() {
        assert!(check_color("#1677ff").is_ok());
        assert!(check_color("#abc").is_ok());
        assert!(check_color("blue").is_err());
        assert!(check_color("#12").is_err());
    }
}
