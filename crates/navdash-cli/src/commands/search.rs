//! Search command handlers

use anyhow::{bail, Context, Result};

use navdash_core::search::search_url;
use navdash_core::Store;

use crate::output::Output;

/// Find links by name, description, URL or tag
pub fn links(store: &Store, query: String, category: Option<String>, output: &Output) -> Result<()> {
    let mut found = store.search(&query);
    if let Some(ref name) = category {
        found.retain(|link| link.in_category(name));
    }
    output.print_links(&found);
    Ok(())
}

/// Search the web with the configured engine or an explicit one
pub fn web(
    store: &Store,
    query: Vec<String>,
    engine: Option<String>,
    print: bool,
    output: &Output,
) -> Result<()> {
    let query = query.join(" ");
    if query.trim().is_empty() {
        bail!("Search query cannot be empty");
    }

    let url = match engine {
        Some(ref id) => search_url(id, &query),
        None => store.web_search_url(&query),
    };

    if print {
        if output.is_json() {
            output.json(&serde_json::json!({ "url": url }));
        } else {
            println!("{}", url);
        }
        return Ok(());
    }

    open::that(&url).with_context(|| format!("Failed to open {}", url))?;
    output.success(&format!("Opened {}", url));
    Ok(())
}
