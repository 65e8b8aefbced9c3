//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use std::collections::BTreeMap;

use chrono::{Local, TimeZone};
use serde::Serialize;

use navdash_core::{Category, Link, PersistenceError, Settings, WriteOutcome};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print any serializable value as pretty JSON
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize output: {}", e),
        }
    }

    /// Print a single link
    pub fn print_link(&self, link: &Link) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", link.id);
                println!("Name:        {}", link.name);
                println!("URL:         {}", link.url);
                if !link.description.is_empty() {
                    println!("Description: {}", link.description);
                }
                println!(
                    "Category:    {}",
                    link.category_name().unwrap_or("(uncategorized)")
                );
                if !link.tags.is_empty() {
                    println!("Tags:        {}", link.tags.join(", "));
                }
                if let Some(ref icon) = link.icon {
                    println!("Icon:        {}", icon);
                }
                if let Some(ref color) = link.background_color {
                    println!("Background:  {}", color);
                }
                println!("Position:    {}", link.order);
                println!("Created:     {}", format_millis(link.created_at));
                println!("Updated:     {}", format_millis(link.updated_at));
            }
            OutputFormat::Json => self.json(link),
            OutputFormat::Quiet => {
                println!("{}", link.id);
            }
        }
    }

    /// Print a list of links
    pub fn print_links(&self, links: &[&Link]) {
        match self.format {
            OutputFormat::Human => {
                if links.is_empty() {
                    println!("No links found.");
                    return;
                }
                for link in links {
                    println!(
                        "{:>3} | {} | {} | {} | {}",
                        link.order,
                        short_id(&link.id),
                        truncate(&link.name, 25),
                        truncate(link.category_name().unwrap_or("-"), 15),
                        truncate(&link.url, 45)
                    );
                }
                println!("\n{} link(s)", links.len());
            }
            OutputFormat::Json => self.json(links),
            OutputFormat::Quiet => {
                for link in links {
                    println!("{}", link.id);
                }
            }
        }
    }

    /// Print categories with the number of links in each
    pub fn print_categories(&self, categories: &[Category], counts: &BTreeMap<String, usize>) {
        match self.format {
            OutputFormat::Human => {
                if categories.is_empty() {
                    println!("No categories found.");
                    return;
                }
                for category in categories {
                    println!(
                        "{:>3} | {} | {} ({}) | {}",
                        category.order,
                        short_id(&category.id),
                        category.name,
                        counts.get(&category.name).copied().unwrap_or(0),
                        category.icon
                    );
                }
                println!("\n{} categor{}", categories.len(), plural_y(categories.len()));
            }
            OutputFormat::Json => {
                let json: Vec<_> = categories
                    .iter()
                    .map(|category| {
                        serde_json::json!({
                            "id": category.id,
                            "name": category.name,
                            "icon": category.icon,
                            "order": category.order,
                            "createdAt": category.created_at,
                            "updatedAt": category.updated_at,
                            "linkCount": counts.get(&category.name).copied().unwrap_or(0),
                        })
                    })
                    .collect();
                self.json(&json);
            }
            OutputFormat::Quiet => {
                for category in categories {
                    println!("{}", category.id);
                }
            }
        }
    }

    /// Print a single category
    pub fn print_category(&self, category: &Category) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", category.id);
                println!("Name:     {}", category.name);
                println!("Icon:     {}", category.icon);
                println!("Position: {}", category.order);
                println!("Created:  {}", format_millis(category.created_at));
                println!("Updated:  {}", format_millis(category.updated_at));
            }
            OutputFormat::Json => self.json(category),
            OutputFormat::Quiet => println!("{}", category.id),
        }
    }

    /// Print a list of tags
    pub fn print_tags(&self, tags: &BTreeMap<String, usize>) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for (name, count) in tags {
                    println!("{} ({})", name, count);
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => {
                let json_tags: Vec<_> = tags
                    .iter()
                    .map(|(name, count)| serde_json::json!({"name": name, "count": count}))
                    .collect();
                self.json(&json_tags);
            }
            OutputFormat::Quiet => {
                for name in tags.keys() {
                    println!("{}", name);
                }
            }
        }
    }

    pub fn print_settings(&self, settings: &Settings) {
        match self.format {
            OutputFormat::Human => {
                println!("Settings:");
                println!("  theme:           {}", settings.theme);
                println!("  searchEngine:    {}", settings.search_engine);
                println!("  layout:          {}", settings.layout);
                println!("  currentCategory: {}", settings.current_category);
                println!("  showDescription: {}", settings.show_description);
                println!("  gridColumns:     {}", settings.grid_columns);
            }
            OutputFormat::Json => self.json(settings),
            OutputFormat::Quiet => {}
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (even in quiet mode)
    pub fn warning(&self, message: &str) {
        eprintln!("⚠ {}", message);
    }

    /// Report a mutation that was applied but could not be saved
    pub fn save_failed(&self, error: &PersistenceError) {
        if error.is_quota_exceeded() {
            self.warning(&format!("Change applied but not saved, storage is full: {}", error));
        } else {
            self.warning(&format!("Change applied but not saved: {}", error));
        }
    }

    /// Report the save status of a mutation and hand back its value
    pub fn outcome<T>(&self, outcome: WriteOutcome<T>) -> T {
        if let Err(ref e) = outcome.saved {
            self.save_failed(e);
        }
        outcome.value
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Format epoch milliseconds in local time
pub fn format_millis(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M").to_string(),
        None => millis.to_string(),
    }
}

/// First 8 characters of an id
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((index, _)) => &id[..index],
        None => id,
    }
}

fn plural_y(count: usize) -> &'static str {
    if count == 1 {
        "y"
    } else {
        "ies"
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
