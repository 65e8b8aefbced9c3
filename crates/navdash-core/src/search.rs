//! Link search and web search engines
//!
//! `search_links` is the in-app filter: a case-insensitive substring match
//! with no ranking. The engine table turns a query into a web search URL.

use std::collections::BTreeMap;

use serde::Serialize;
use url::form_urlencoded;

use crate::models::Link;

/// A preset web search engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEngine {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    /// URL with a `{query}` placeholder
    pub search_url: &'static str,
}

pub const SEARCH_ENGINES: &[SearchEngine] = &[
    SearchEngine {
        id: "google",
        name: "Google",
        icon: "GoogleOutlined",
        search_url: "https://www.google.com/search?q={query}",
    },
    SearchEngine {
        id: "bing",
        name: "Bing",
        icon: "SearchOutlined",
        search_url: "https://www.bing.com/search?q={query}",
    },
    SearchEngine {
        id: "yahoo",
        name: "Yahoo",
        icon: "YahooOutlined",
        search_url: "https://search.yahoo.com/search?p={query}",
    },
    SearchEngine {
        id: "baidu",
        name: "Baidu",
        icon: "SearchOutlined",
        search_url: "https://www.baidu.com/s?wd={query}",
    },
    SearchEngine {
        id: "yandex",
        name: "Yandex",
        icon: "SearchOutlined",
        search_url: "https://yandex.com/search/?text={query}",
    },
    SearchEngine {
        id: "duckduckgo",
        name: "DuckDuckGo",
        icon: "SearchOutlined",
        search_url: "https://duckduckgo.com/?q={query}",
    },
];

/// Look up an engine by id, falling back to Google
pub fn search_engine(id: &str) -> &'static SearchEngine {
    SEARCH_ENGINES
        .iter()
        .find(|engine| engine.id == id)
        .unwrap_or(&SEARCH_ENGINES[0])
}

/// Whether `id` names a preset engine
pub fn is_known_engine(id: &str) -> bool {
    SEARCH_ENGINES.iter().any(|engine| engine.id == id)
}

/// Web search URL for `query` on the given engine
pub fn search_url(engine_id: &str, query: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    search_engine(engine_id)
        .search_url
        .replace("{query}", &encoded)
}

/// Links matching `query` in name, description, url or any tag
///
/// A blank query matches everything. Order is preserved.
pub fn search_links<'a>(links: &'a [Link], query: &str) -> Vec<&'a Link> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return links.iter().collect();
    }

    links
        .iter()
        .filter(|link| {
            link.name.to_lowercase().contains(&query)
                || link.description.to_lowercase().contains(&query)
                || link.url.to_lowercase().contains(&query)
                || link
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&query))
        })
        .collect()
}

/// Links in the named category, or all links when `category` is `None`
pub fn filter_by_category<'a>(links: &'a [Link], category: Option<&str>) -> Vec<&'a Link> {
    match category {
        Some(name) => links.iter().filter(|link| link.in_category(name)).collect(),
        None => links.iter().collect(),
    }
}

/// Usage count per tag, sorted by tag name
pub fn tag_counts(links: &[Link]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for tag in links.iter().flat_map(|link| &link.tags) {
        *counts.entry(tag.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinkInput;

    fn links() -> Vec<Link> {
        vec![
            Link::from_input(
                LinkInput::new("Rust Book", "https://doc.rust-lang.org/book/")
                    .description("The Rust Programming Language")
                    .category("Docs")
                    .tag("rust")
                    .tag("learning"),
                "1".into(),
                0,
            ),
            Link::from_input(
                LinkInput::new("GitHub", "https://github.com")
                    .description("Code hosting")
                    .tag("git"),
                "2".into(),
                0,
            ),
            Link::from_input(
                LinkInput::new("crates.io", "https://crates.io")
                    .category("Docs")
                    .tag("Rust"),
                "3".into(),
                0,
            ),
        ]
    }

    fn ids(found: &[&Link]) -> Vec<String> {
        found.iter().map(|l| l.id.clone()).collect()
    }

    #[test]
    fn test_blank_query_returns_everything() {
        let links = links();
        assert_eq!(search_links(&links, "").len(), 3);
        assert_eq!(search_links(&links, "   \t").len(), 3);
    }

    #[test]
    fn test_matches_each_field_case_insensitively() {
        let links = links();
        assert_eq!(ids(&search_links(&links, "GITHUB")), ["2"]);
        assert_eq!(ids(&search_links(&links, "programming")), ["1"]);
        assert_eq!(ids(&search_links(&links, "crates.io")), ["3"]);
        assert_eq!(ids(&search_links(&links, "learn")), ["1"]);
        assert_eq!(ids(&search_links(&links, " rust ")), ["1", "3"]);
        assert!(search_links(&links, "python").is_empty());
    }

    #[test]
    fn test_filter_by_category() {
        let links = links();
        assert_eq!(ids(&filter_by_category(&links, Some("Docs"))), ["1", "3"]);
        assert!(filter_by_category(&links, Some("Nope")).is_empty());
        assert_eq!(filter_by_category(&links, None).len(), 3);
    }

    #[test]
    fn test_tag_counts() {
        let counts = tag_counts(&links());
        assert_eq!(counts.get("rust"), Some(&1));
        assert_eq!(counts.get("Rust"), Some(&1));
        assert_eq!(counts.get("git"), Some(&1));
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn test_search_url_encodes_query() {
        assert_eq!(
            search_url("duckduckgo", "rust & c++"),
            "https://duckduckgo.com/?q=rust+%26+c%2B%2B"
        );
        assert_eq!(
            search_url("baidu", "hello"),
            "https://www.baidu.com/s?wd=hello"
        );
    }

    #[test]
    fn test_unknown_engine_falls_back_to_google() {
        assert_eq!(search_engine("altavista").id, "google");
        assert!(!is_known_engine("altavista"));
        assert_eq!(
            search_url("altavista", "q"),
            "https://www.google.com/search?q=q"
        );
    }
}
