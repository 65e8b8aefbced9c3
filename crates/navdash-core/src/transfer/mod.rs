//! Import and export
//!
//! Import is two-step: [`plan_import`] parses, validates and merges against
//! the current collections without touching them, and the store commits the
//! resulting [`ImportPlan`] only after the caller confirms.

pub mod export;
pub mod merge;
pub mod parse;

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::{CoreError, CoreResult};
use crate::models::{Category, Link};

pub use export::{ExportDocument, ExportNode};
pub use merge::{merge_categories, merge_links, Merged};
pub use parse::{parse_import, Dataset, ImportShape};

/// Largest accepted import file
pub const MAX_IMPORT_BYTES: u64 = 5 * 1024 * 1024;

/// How an import changes the collections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportCounts {
    pub new_links: usize,
    pub updated_links: usize,
    pub new_categories: usize,
    pub updated_categories: usize,
}

impl ImportCounts {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for ImportCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "links: {} new, {} updated; categories: {} new, {} updated",
            self.new_links, self.updated_links, self.new_categories, self.updated_categories
        )
    }
}

/// Merged collections awaiting confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPlan {
    pub links: Vec<Link>,
    pub categories: Vec<Category>,
    pub counts: ImportCounts,
    pub shape: ImportShape,
    /// Non-fatal findings, e.g. an empty link list
    pub warnings: Vec<String>,
    /// Store revision the merge was computed against
    pub base_revision: u64,
}

/// Parse `raw` and merge it into the given collections
pub fn plan_import(
    raw: &str,
    links: &[Link],
    categories: &[Category],
    now: i64,
    base_revision: u64,
) -> CoreResult<ImportPlan> {
    let (shape, dataset) = parse_import(raw)?;

    let mut warnings = Vec::new();
    if dataset.links.is_empty() {
        warnings.push("The file contains no links".to_string());
    }

    let merged_links = merge_links(links, dataset.links, now);
    let merged_categories = merge_categories(categories, dataset.categories, now);

    let counts = ImportCounts {
        new_links: merged_links.new,
        updated_links: merged_links.updated,
        new_categories: merged_categories.new,
        updated_categories: merged_categories.updated,
    };
    info!(?shape, %counts, "Import prepared");

    Ok(ImportPlan {
        links: merged_links.items,
        categories: merged_categories.items,
        counts,
        shape,
        warnings,
        base_revision,
    })
}

/// Check an import file's name and size before reading it
pub fn check_import_file(path: &Path, size: u64) -> CoreResult<()> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(CoreError::validation(format!(
            "{} is not a .json file",
            path.display()
        )));
    }
    if size > MAX_IMPORT_BYTES {
        return Err(CoreError::validation(format!(
            "{} is {} bytes; the limit is {} bytes",
            path.display(),
            size,
            MAX_IMPORT_BYTES
        )));
    }
    Ok(())
}
