//! Schema validation for persisted and imported records
//!
//! Each predicate checks presence and primitive type of the required fields
//! and the type of optional fields when they are present. They never fail;
//! callers decide whether a rejection aborts (import) or falls back to
//! defaults (load).

use serde_json::{Map, Value};

fn is_string(obj: &Map<String, Value>, key: &str) -> bool {
    matches!(obj.get(key), Some(Value::String(_)))
}

/// Any JSON number; [`normalize_numbers`] turns it into the typed field
fn is_number(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).is_some_and(Value::is_number)
}

fn optional_string(obj: &Map<String, Value>, key: &str) -> bool {
    match obj.get(key) {
        None | Some(Value::Null) => true,
        Some(value) => value.is_string(),
    }
}

fn optional_positive_number(obj: &Map<String, Value>, key: &str) -> bool {
    match obj.get(key) {
        None | Some(Value::Null) => true,
        Some(value) => value.as_f64().is_some_and(|n| n > 0.0),
    }
}

fn optional_string_array(obj: &Map<String, Value>, key: &str) -> bool {
    match obj.get(key) {
        None => true,
        Some(Value::Array(items)) => items.iter().all(Value::is_string),
        Some(_) => false,
    }
}

/// Check a single link record
pub fn is_valid_link(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };

    ["id", "name", "url", "description"]
        .iter()
        .all(|key| is_string(obj, key))
        && is_number(obj, "order")
        && is_number(obj, "createdAt")
        && is_number(obj, "updatedAt")
        && optional_string(obj, "icon")
        && optional_string(obj, "backgroundColor")
        && optional_string(obj, "category")
        && optional_string_array(obj, "tags")
        && optional_positive_number(obj, "iconScale")
}

/// Check a single category record
pub fn is_valid_category(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };

    ["id", "name", "icon"].iter().all(|key| is_string(obj, key))
        && is_number(obj, "order")
        && is_number(obj, "createdAt")
        && is_number(obj, "updatedAt")
}

/// Check a settings object
pub fn is_valid_settings(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };

    let theme_ok = matches!(
        obj.get("theme").and_then(Value::as_str),
        Some("light" | "dark" | "system")
    );
    let layout_ok = matches!(
        obj.get("layout").and_then(Value::as_str),
        Some("grid" | "list")
    );
    let columns_ok = match obj.get("gridColumns") {
        None => true,
        Some(value) => value.as_u64().is_some_and(|n| (1..=12).contains(&n)),
    };

    theme_ok
        && layout_ok
        && is_string(obj, "searchEngine")
        && obj.get("currentCategory").map_or(true, Value::is_string)
        && columns_ok
}

/// `#rgb` or `#rrggbb`
pub fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}

/// Check an array where every element satisfies `check`
pub fn is_valid_array(value: &Value, check: fn(&Value) -> bool) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(check))
}

/// Largest `order` kept from untrusted input; collections renumber anyway
pub const MAX_ORDER: u64 = u32::MAX as u64;

/// Coerce the numeric fields of a validated record into their stored types
///
/// `order` is rounded and clamped into `0..=MAX_ORDER`; timestamps are
/// rounded to whole milliseconds. Non-object values are left alone.
pub fn normalize_numbers(value: &mut Value) {
    let Some(obj) = value.as_object_mut() else {
        return;
    };

    if let Some(order) = obj.get_mut("order") {
        if !order.is_u64() || order.as_u64().is_some_and(|n| n > MAX_ORDER) {
            if let Some(n) = order.as_f64() {
                // `as` saturates and maps NaN to 0
                *order = Value::from((n.round() as u64).min(MAX_ORDER));
            }
        }
    }

    for key in ["createdAt", "updatedAt"] {
        if let Some(stamp) = obj.get_mut(key) {
            if !stamp.is_i64() {
                if let Some(n) = stamp.as_f64() {
                    *stamp = Value::from(n.round() as i64);
                }
            }
        }
    }
}

/// Index of the first element failing `check`, for error messages
pub fn first_invalid(items: &[Value], check: fn(&Value) -> bool) -> Option<usize> {
    items.iter().position(|item| !check(item))
}
