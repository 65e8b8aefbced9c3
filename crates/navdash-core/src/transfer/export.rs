//! Tree-shaped export
//!
//! Categories are written in display order, each with its links. Links
//! without a known category go into a trailing node with an empty name so an
//! export always carries every link.

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::models::{Category, Link};
use crate::storage::CURRENT_VERSION;

/// A category with its links nested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportNode {
    #[serde(flatten)]
    pub category: Category,
    pub links: Vec<Link>,
}

/// The export file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub export_time: i64,
    pub data: Vec<ExportNode>,
}

impl ExportDocument {
    /// Group `links` under `categories`
    pub fn build(links: &[Link], categories: &[Category], now: i64) -> Self {
        let mut categories: Vec<&Category> = categories.iter().collect();
        categories.sort_by_key(|category| category.order);
        let mut links: Vec<&Link> = links.iter().collect();
        links.sort_by_key(|link| link.order);

        let mut data: Vec<ExportNode> = categories
            .iter()
            .map(|category| ExportNode {
                category: (*category).clone(),
                links: links
                    .iter()
                    .filter(|link| link.in_category(&category.name))
                    .map(|link| (*link).clone())
                    .collect(),
            })
            .collect();

        let orphans: Vec<Link> = links
            .iter()
            .filter(|link| match link.category_name() {
                Some(name) => !categories.iter().any(|c| c.name == name),
                None => true,
            })
            .map(|link| (*link).clone())
            .collect();

        if !orphans.is_empty() {
            data.push(ExportNode {
                category: Category {
                    id: String::new(),
                    name: String::new(),
                    icon: String::new(),
                    order: categories.len(),
                    created_at: now,
                    updated_at: now,
                },
                links: orphans,
            });
        }

        Self {
            version: CURRENT_VERSION.to_string(),
            export_time: now,
            data,
        }
    }

    pub fn link_count(&self) -> usize {
        self.data.iter().map(|node| node.links.len()).sum()
    }

    pub fn to_json_pretty(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Suggested file name, e.g. `navdash-export-2024-01-31.json`
    pub fn file_name(&self) -> String {
        let date = chrono::DateTime::from_timestamp_millis(self.export_time)
            .map(|time| time.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| self.export_time.to_string());
        format!("navdash-export-{}.json", date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryInput, LinkInput};
    use crate::transfer::parse::{parse_import, ImportShape};

    fn sample() -> (Vec<Link>, Vec<Category>) {
        let mut work = Category::from_input(CategoryInput::new("Work"), "w".into(), 1);
        work.order = 1;
        let mut home = Category::from_input(CategoryInput::new("Home"), "h".into(), 1);
        home.order = 0;

        let specs = [
            ("a", "https://a.com", Some("Work")),
            ("b", "https://b.com", Some("Home")),
            ("c", "https://c.com", None),
            ("d", "https://d.com", Some("Gone")),
            ("e", "https://e.com", Some("Work")),
        ];
        let links = specs
            .iter()
            .enumerate()
            .map(|(order, (id, url, category))| {
                let mut input = LinkInput::new(id.to_uppercase(), *url);
                if let Some(category) = category {
                    input = input.category(*category);
                }
                let mut link = Link::from_input(input, id.to_string(), 5);
                link.order = order;
                link
            })
            .collect();

        (links, vec![work, home])
    }

    #[test]
    fn test_groups_by_category_in_order() {
        let (links, categories) = sample();
        let doc = ExportDocument::build(&links, &categories, 42);

        assert_eq!(doc.version, CURRENT_VERSION);
        assert_eq!(doc.export_time, 42);
        let names: Vec<_> = doc.data.iter().map(|n| n.category.name.as_str()).collect();
        assert_eq!(names, ["Home", "Work", ""]);

        let work: Vec<_> = doc.data[1].links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(work, ["a", "e"]);
        let orphans: Vec<_> = doc.data[2].links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(orphans, ["c", "d"]);
        assert_eq!(doc.link_count(), links.len());
    }

    #[test]
    fn test_no_trailing_node_without_orphans() {
        let (links, categories) = sample();
        let links: Vec<_> = links
            .into_iter()
            .filter(|l| matches!(l.category_name(), Some("Work" | "Home")))
            .collect();
        let doc = ExportDocument::build(&links, &categories, 42);
        assert_eq!(doc.data.len(), 2);
    }

    #[test]
    fn test_json_layout() {
        let (links, categories) = sample();
        let json = ExportDocument::build(&links, &categories, 42)
            .to_json_pretty()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["exportTime"], 42);
        let node = &value["data"][0];
        assert_eq!(node["name"], "Home");
        assert_eq!(node["createdAt"], 1);
        assert!(node["links"].is_array());
    }

    #[test]
    fn test_export_then_parse_preserves_data() {
        let (links, categories) = sample();
        let json = ExportDocument::build(&links, &categories, 42)
            .to_json_pretty()
            .unwrap();

        let (shape, dataset) = parse_import(&json).unwrap();
        assert_eq!(shape, ImportShape::Tree);
        assert_eq!(dataset.categories.len(), 2);
        assert_eq!(dataset.links.len(), links.len());

        // orphan "d" lost its dangling category, everything else is intact
        for (parsed, original) in dataset.links.iter().zip(&links) {
            assert_eq!(parsed.id, original.id);
            assert_eq!(parsed.order, original.order);
            if original.id != "d" {
                assert_eq!(parsed, original);
            }
        }
    }

    #[test]
    fn test_file_name() {
        let doc = ExportDocument::build(&[], &[], 1_706_659_200_000);
        assert_eq!(doc.file_name(), "navdash-export-2024-01-31.json");
    }
}
