//! Status command handler

use anyhow::Result;

use navdash_core::{BackendKind, Config, Store};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let config = store.config();
    let persistence = store.persistence();
    let used = persistence.storage_size();

    match output.format {
        OutputFormat::Json => output.json(&serde_json::json!({
            "backend": config.backend,
            "namespace": persistence.namespace(),
            "location": location(config),
            "storage": {
                "used_bytes": used,
                "quota_bytes": persistence.quota_bytes(),
            },
            "version": persistence.version(),
            "counts": {
                "links": store.links().len(),
                "categories": store.categories().len(),
                "tags": store.tags_with_counts().len(),
            },
            "config_file": Config::config_file_path(),
        })),
        OutputFormat::Quiet => {
            println!("{}", location(config));
        }
        OutputFormat::Human => {
            println!("navdash Status");
            println!("==============");
            println!();
            println!("Storage:");
            println!("  Backend:   {}", persistence.backend_name());
            println!("  Namespace: {}", persistence.namespace());
            println!("  Location:  {}", location(config));
            println!(
                "  Size:      {}",
                format_usage(used, persistence.quota_bytes())
            );
            println!(
                "  Version:   {}",
                persistence.version().as_deref().unwrap_or("(never saved)")
            );
            println!();
            println!("Contents:");
            println!("  Links:      {}", store.links().len());
            println!("  Categories: {}", store.categories().len());
            println!("  Tags:       {}", store.tags_with_counts().len());
            println!();
            println!("Config file: {}", Config::config_file_path().display());
        }
    }

    Ok(())
}

fn location(config: &Config) -> String {
    match config.backend {
        BackendKind::Sqlite => config.sqlite_path().display().to_string(),
        BackendKind::Files => config.files_dir().display().to_string(),
        BackendKind::Memory => "(in memory)".to_string(),
    }
}

fn format_usage(used: Option<u64>, quota: Option<u64>) -> String {
    let used = match used {
        Some(bytes) => human_bytes(bytes),
        None => return "unknown".to_string(),
    };
    match quota {
        Some(quota) => format!("{} of {}", used, human_bytes(quota)),
        None => used,
    }
}

/// Human-readable size
fn human_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
