//! User preferences
//!
//! Settings share the persistence contract of the entity collections but sit
//! outside the ordering rules: they are a single validated object.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Allowed range for `gridColumns`
pub const GRID_COLUMNS: std::ops::RangeInclusive<u8> = 1..=12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl FromStr for ThemeMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" => Ok(ThemeMode::System),
            other => Err(CoreError::validation(format!(
                "unknown theme '{}', expected light, dark or system",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Grid,
    List,
}

impl FromStr for LayoutMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grid" => Ok(LayoutMode::Grid),
            "list" => Ok(LayoutMode::List),
            other => Err(CoreError::validation(format!(
                "unknown layout '{}', expected grid or list",
                other
            ))),
        }
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutMode::Grid => f.write_str("grid"),
            LayoutMode::List => f.write_str("list"),
        }
    }
}

/// Persisted user preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: ThemeMode,
    /// Id of the preset web search engine
    pub search_engine: String,
    pub layout: LayoutMode,
    /// Name of the category currently shown
    #[serde(default)]
    pub current_category: String,
    #[serde(default = "default_show_description")]
    pub show_description: bool,
    #[serde(default = "default_grid_columns")]
    pub grid_columns: u8,
}

fn default_show_description() -> bool {
    true
}

fn default_grid_columns() -> u8 {
    6
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            search_engine: "google".to_string(),
            layout: LayoutMode::default(),
            current_category: crate::defaults::default_category_name().to_string(),
            show_description: default_show_description(),
            grid_columns: default_grid_columns(),
        }
    }
}

/// Partial settings update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub theme: Option<ThemeMode>,
    pub search_engine: Option<String>,
    pub layout: Option<LayoutMode>,
    pub current_category: Option<String>,
    pub show_description: Option<bool>,
    pub grid_columns: Option<u8>,
}

impl SettingsPatch {
    /// Build a single-field patch from a `key = value` pair
    ///
    /// Keys accept both the persisted camelCase names and snake_case.
    pub fn from_key_value(key: &str, value: &str) -> CoreResult<Self> {
        let mut patch = Self::default();
        match key {
            "theme" => patch.theme = Some(value.parse()?),
            "layout" => patch.layout = Some(value.parse()?),
            "searchEngine" | "search_engine" => patch.search_engine = Some(value.to_string()),
            "currentCategory" | "current_category" => {
                patch.current_category = Some(value.to_string())
            }
            "showDescription" | "show_description" => {
                let flag = value.parse().map_err(|_| {
                    CoreError::validation(format!(
                        "invalid value '{}' for showDescription, use true or false",
                        value
                    ))
                })?;
                patch.show_description = Some(flag);
            }
            "gridColumns" | "grid_columns" => {
                let columns = value.parse().map_err(|_| {
                    CoreError::validation(format!("invalid value '{}' for gridColumns", value))
                })?;
                patch.grid_columns = Some(columns);
            }
            other => {
                return Err(CoreError::validation(format!(
                    "unknown setting '{}'. Valid keys: theme, searchEngine, layout, \
                     currentCategory, showDescription, gridColumns",
                    other
                )))
            }
        }
        Ok(patch)
    }
}

impl Settings {
    /// Apply a patch, rejecting it as a whole if any value is out of range
    pub fn apply(&mut self, patch: SettingsPatch) -> CoreResult<()> {
        if let Some(columns) = patch.grid_columns {
            if !GRID_COLUMNS.contains(&columns) {
                return Err(CoreError::validation(format!(
                    "grid columns must be between {} and {}, got {}",
                    GRID_COLUMNS.start(),
                    GRID_COLUMNS.end(),
                    columns
                )));
            }
        }

        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(engine) = patch.search_engine {
            self.search_engine = engine;
        }
        if let Some(layout) = patch.layout {
            self.layout = layout;
        }
        if let Some(category) = patch.current_category {
            self.current_category = category;
        }
        if let Some(show) = patch.show_description {
            self.show_description = show;
        }
        if let Some(columns) = patch.grid_columns {
            self.grid_columns = columns;
        }
        Ok(())
    }
}
