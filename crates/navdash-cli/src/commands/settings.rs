//! Settings command handlers

use anyhow::Result;

use navdash_core::search::{is_known_engine, SEARCH_ENGINES};
use navdash_core::{SettingsPatch, Store};

use crate::output::{Output, OutputFormat};

/// Show current settings
pub fn show(store: &Store, output: &Output) -> Result<()> {
    output.print_settings(store.settings());
    Ok(())
}

/// Change one setting
pub fn set(store: &mut Store, key: String, value: String, output: &Output) -> Result<()> {
    let patch = SettingsPatch::from_key_value(&key, &value)?;

    if let Some(ref engine) = patch.search_engine {
        if !is_known_engine(engine) {
            let known: Vec<_> = SEARCH_ENGINES.iter().map(|e| e.id).collect();
            output.warning(&format!(
                "Unknown search engine '{}', Google will be used. Known engines: {}",
                engine,
                known.join(", ")
            ));
        }
    }
    if let Some(ref category) = patch.current_category {
        if !category.is_empty() && store.find_category(category).is_none() {
            output.warning(&format!("Category '{}' does not exist", category));
        }
    }

    let settings = output.outcome(store.update_settings(patch)?);

    output.success(&format!("Set {} = {}", key, value));
    if !output.is_json() {
        output.print_settings(&settings);
    }
    Ok(())
}

/// Restore default settings
pub fn reset(store: &mut Store, output: &Output) -> Result<()> {
    let settings = output.outcome(store.reset_settings());
    output.success("Settings reset to defaults");
    if output.format == OutputFormat::Human {
        output.print_settings(&settings);
    }
    Ok(())
}

/// List the preset web search engines
pub fn engines(store: &Store, output: &Output) -> Result<()> {
    let current = &store.settings().search_engine;
    match output.format {
        OutputFormat::Human => {
            for engine in SEARCH_ENGINES {
                let marker = if engine.id == current.as_str() { "*" } else { " " };
                println!("{} {:<12} {}", marker, engine.id, engine.name);
            }
        }
        OutputFormat::Json => output.json(SEARCH_ENGINES),
        OutputFormat::Quiet => {
            for engine in SEARCH_ENGINES {
                println!("{}", engine.id);
            }
        }
    }
    Ok(())
}
