//! Import file parsing and normalization
//!
//! Three shapes are accepted:
//!
//! - tree: `{ "version", "exportTime", "data": [category node with "links"] }`
//! - flat: `{ "links": [...], "categories": [...] }` (categories optional)
//! - bare array of links
//!
//! All of them normalize to a [`Dataset`]. Any malformed record aborts the
//! whole parse; nothing partial is returned.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::models::{Category, Link};
use crate::validate::{is_valid_category, is_valid_link, normalize_numbers};

/// Normalized import content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Links sorted by their own `order`
    pub links: Vec<Link>,
    pub categories: Vec<Category>,
}

/// Which layout the input used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportShape {
    Tree,
    Flat,
    LinkArray,
}

/// Parse and validate an import payload
pub fn parse_import(raw: &str) -> CoreResult<(ImportShape, Dataset)> {
    let value: Value = serde_json::from_str(raw)?;

    match value {
        Value::Array(items) => Ok((ImportShape::LinkArray, flat(items, Vec::new())?)),
        Value::Object(mut obj) => {
            if let Some(data) = obj.remove("data") {
                let Value::Array(nodes) = data else {
                    return Err(CoreError::validation("\"data\" must be an array"));
                };
                return Ok((ImportShape::Tree, tree(nodes)?));
            }

            let links = match obj.remove("links") {
                Some(Value::Array(links)) => links,
                Some(_) => return Err(CoreError::validation("\"links\" must be an array")),
                None => {
                    return Err(CoreError::validation(
                        "Unrecognized file format: expected \"data\" or \"links\"",
                    ))
                }
            };
            let categories = match obj.remove("categories") {
                Some(Value::Array(categories)) => categories,
                None | Some(Value::Null) => Vec::new(),
                Some(_) => {
                    return Err(CoreError::validation("\"categories\" must be an array"))
                }
            };
            Ok((ImportShape::Flat, flat(links, categories)?))
        }
        _ => Err(CoreError::validation(
            "Unrecognized file format: expected an object or an array",
        )),
    }
}

fn flat(links: Vec<Value>, categories: Vec<Value>) -> CoreResult<Dataset> {
    let mut dataset = Dataset::default();

    for (index, value) in categories.into_iter().enumerate() {
        if !is_valid_category(&value) {
            return Err(CoreError::validation(format!(
                "category at index {} is missing a required field or has a wrong type",
                index
            )));
        }
        dataset.categories.push(decode(value)?);
    }

    for (index, value) in links.into_iter().enumerate() {
        if !is_valid_link(&value) {
            return Err(CoreError::validation(format!(
                "link at index {} is missing a required field or has a wrong type",
                index
            )));
        }
        dataset.links.push(decode(value)?);
    }

    dataset.links.sort_by_key(|link| link.order);
    Ok(dataset)
}

fn tree(nodes: Vec<Value>) -> CoreResult<Dataset> {
    let mut dataset = Dataset::default();

    for (index, node) in nodes.into_iter().enumerate() {
        let Value::Object(mut node) = node else {
            return Err(CoreError::validation(format!(
                "category node at index {} is not an object",
                index
            )));
        };

        let links = match node.remove("links") {
            Some(Value::Array(links)) => links,
            None | Some(Value::Null) => Vec::new(),
            Some(_) => {
                return Err(CoreError::validation(format!(
                    "\"links\" of category node at index {} must be an array",
                    index
                )))
            }
        };

        let Some(name) = node_name(&node) else {
            return Err(CoreError::validation(format!(
                "\"name\" of category node at index {} must be a string",
                index
            )));
        };
        if !name.is_empty() {
            let value = Value::Object(node);
            if !is_valid_category(&value) {
                return Err(CoreError::validation(format!(
                    "category node at index {} is missing a required field or has a wrong type",
                    index
                )));
            }
            dataset.categories.push(decode(value)?);
        }

        for (link_index, value) in links.into_iter().enumerate() {
            if !is_valid_link(&value) {
                return Err(CoreError::validation(format!(
                    "link at index {} in category node {} is missing a required field or has a wrong type",
                    link_index, index
                )));
            }
            let mut link: Link = decode(value)?;
            link.category = (!name.is_empty()).then(|| name.clone());
            dataset.links.push(link);
        }
    }

    dataset.links.sort_by_key(|link| link.order);
    Ok(dataset)
}

/// Node name; a missing name reads as the unnamed node, any other
/// non-string is `None`
fn node_name(node: &Map<String, Value>) -> Option<String> {
    match node.get("name") {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(name)) => Some(name.clone()),
        Some(_) => None,
    }
}

fn decode<T: DeserializeOwned>(mut value: Value) -> CoreResult<T> {
    normalize_numbers(&mut value);
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn link(id: &str, url: &str, order: u64) -> Value {
        json!({
            "id": id,
            "name": id.to_uppercase(),
            "url": url,
            "description": "",
            "order": order,
            "createdAt": 100,
            "updatedAt": 200
        })
    }

    fn category(id: &str, name: &str, order: u64) -> Value {
        json!({
            "id": id,
            "name": name,
            "icon": "StarOutlined",
            "order": order,
            "createdAt": 100,
            "updatedAt": 200
        })
    }

    #[test]
    fn test_tree_shape_assigns_node_name() {
        let mut work = category("c1", "Work", 0);
        work["links"] = json!([link("a", "https://a.com", 1), link("b", "https://b.com", 0)]);
        let raw = json!({ "version": "1.0.0", "exportTime": 1, "data": [work] }).to_string();

        let (shape, dataset) = parse_import(&raw).unwrap();
        assert_eq!(shape, ImportShape::Tree);
        assert_eq!(dataset.categories.len(), 1);
        assert_eq!(dataset.categories[0].name, "Work");
        // sorted by their own order
        let ids: Vec<_> = dataset.links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert!(dataset.links.iter().all(|l| l.in_category("Work")));
    }

    #[test]
    fn test_tree_node_category_overrides_link_field() {
        let mut node = category("c1", "Work", 0);
        let mut stray = link("a", "https://a.com", 0);
        stray["category"] = json!("Home");
        node["links"] = json!([stray]);
        let raw = json!({ "data": [node] }).to_string();

        let (_, dataset) = parse_import(&raw).unwrap();
        assert_eq!(dataset.links[0].category_name(), Some("Work"));
    }

    #[test]
    fn test_tree_unnamed_node_is_uncategorized() {
        let node = json!({
            "id": "", "name": "", "icon": "", "order": 3, "createdAt": 1, "updatedAt": 1,
            "links": [link("a", "https://a.com", 0)]
        });
        let raw = json!({ "version": "1.0.0", "exportTime": 1, "data": [node] }).to_string();

        let (_, dataset) = parse_import(&raw).unwrap();
        assert!(dataset.categories.is_empty());
        assert_eq!(dataset.links.len(), 1);
        assert!(dataset.links[0].category.is_none());
    }

    #[test]
    fn test_tree_node_with_non_string_name_rejected() {
        let node = json!({
            "id": "c1", "name": 5, "icon": "", "order": 0, "createdAt": 1, "updatedAt": 1,
            "links": [link("a", "https://a.com", 0)]
        });
        let raw = json!({ "data": [node] }).to_string();

        let err = parse_import(&raw).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ref msg) if msg.contains("index 0")));
    }

    #[test]
    fn test_tree_node_without_name_is_uncategorized() {
        let node = json!({ "links": [link("a", "https://a.com", 0)] });
        let raw = json!({ "data": [node] }).to_string();

        let (_, dataset) = parse_import(&raw).unwrap();
        assert!(dataset.categories.is_empty());
        assert!(dataset.links[0].category.is_none());
    }

    #[test]
    fn test_fractional_and_negative_numbers_accepted() {
        let mut half = link("a", "https://a.com", 0);
        half["order"] = json!(1.5);
        half["createdAt"] = json!(100.2);
        let mut negative = link("b", "https://b.com", 0);
        negative["order"] = json!(-1);
        let mut work = category("c1", "Work", 0);
        work["order"] = json!(-3.5);
        let raw = json!({ "links": [half, negative], "categories": [work] }).to_string();

        let (_, dataset) = parse_import(&raw).unwrap();
        let orders: Vec<_> = dataset.links.iter().map(|l| (l.id.as_str(), l.order)).collect();
        assert_eq!(orders, [("b", 0), ("a", 2)]);
        assert_eq!(dataset.links[1].created_at, 100);
        assert_eq!(dataset.categories[0].order, 0);
    }

    #[test]
    fn test_flat_shape() {
        let raw = json!({
            "links": [link("a", "https://a.com", 0)],
            "categories": [category("c1", "Work", 0)]
        })
        .to_string();

        let (shape, dataset) = parse_import(&raw).unwrap();
        assert_eq!(shape, ImportShape::Flat);
        assert_eq!(dataset.links.len(), 1);
        assert_eq!(dataset.categories.len(), 1);
    }

    #[test]
    fn test_flat_shape_without_categories() {
        let raw = json!({ "links": [] }).to_string();
        let (_, dataset) = parse_import(&raw).unwrap();
        assert_eq!(dataset, Dataset::default());
    }

    #[test]
    fn test_bare_array() {
        let raw = json!([link("a", "https://a.com", 0), link("b", "https://b.com", 1)]).to_string();
        let (shape, dataset) = parse_import(&raw).unwrap();
        assert_eq!(shape, ImportShape::LinkArray);
        assert_eq!(dataset.links.len(), 2);
    }

    #[test]
    fn test_missing_url_rejected() {
        let mut bad = link("a", "https://a.com", 0);
        bad.as_object_mut().unwrap().remove("url");
        let raw = json!({ "links": [link("ok", "https://ok.com", 0), bad] }).to_string();

        let err = parse_import(&raw).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ref msg) if msg.contains("index 1")));
    }

    #[test]
    fn test_bad_optional_fields_rejected() {
        for (field, value) in [
            ("tags", json!("rust")),
            ("tags", json!([1])),
            ("icon", json!(3)),
            ("iconScale", json!(0)),
        ] {
            let mut bad = link("a", "https://a.com", 0);
            bad[field] = value;
            let raw = json!([bad]).to_string();
            assert!(
                matches!(parse_import(&raw), Err(CoreError::Validation(_))),
                "{} should be rejected",
                field
            );
        }
    }

    #[test]
    fn test_invalid_category_node_rejected() {
        let node = json!({ "name": "Work", "links": [] });
        let raw = json!({ "data": [node] }).to_string();
        assert!(matches!(parse_import(&raw), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(parse_import("{\"links\": ["), Err(CoreError::Parse(_))));
    }

    #[test]
    fn test_unknown_shapes_rejected() {
        for raw in ["42", "\"links\"", "{}", "{\"data\": {}}", "{\"links\": 1}"] {
            assert!(
                matches!(parse_import(raw), Err(CoreError::Validation(_))),
                "{} should be rejected",
                raw
            );
        }
    }
}
