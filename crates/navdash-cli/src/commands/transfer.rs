//! Import and export command handlers

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use navdash_core::transfer::check_import_file;
use navdash_core::{ImportPlan, Store};

use crate::output::{Output, OutputFormat};
use crate::prompt::{confirm, is_interactive};

/// Merge a JSON export into the store
pub fn import(store: &mut Store, file: PathBuf, yes: bool, output: &Output) -> Result<()> {
    let size = fs::metadata(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?
        .len();
    check_import_file(&file, size)?;

    let raw = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let plan = store.prepare_import(&raw)?;

    for warning in &plan.warnings {
        output.warning(warning);
    }
    describe(&plan, output);

    if plan.counts.is_empty() {
        output.message("Nothing to import.");
        return Ok(());
    }

    if !yes {
        if !is_interactive() {
            bail!("Refusing to import without confirmation. Pass --yes to proceed.");
        }
        if !confirm("Apply this import?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let counts = output.outcome(store.commit_import(plan)?);

    match output.format {
        OutputFormat::Json => output.json(&serde_json::json!({
            "status": "success",
            "counts": counts,
        })),
        _ => output.success(&format!("Imported {}", counts)),
    }
    Ok(())
}

fn describe(plan: &ImportPlan, output: &Output) {
    if output.format != OutputFormat::Human {
        return;
    }
    println!("Import preview ({:?} format):", plan.shape);
    println!(
        "  Links:      {} new, {} updated",
        plan.counts.new_links, plan.counts.updated_links
    );
    println!(
        "  Categories: {} new, {} updated",
        plan.counts.new_categories, plan.counts.updated_categories
    );
}

/// Write every link and category as a JSON document
///
/// Without `--output` the file is named after today's date; `-` writes to
/// stdout.
pub fn export(store: &Store, path: Option<PathBuf>, output: &Output) -> Result<()> {
    let document = store.export();
    let json = document.to_json_pretty()?;

    let path = path.unwrap_or_else(|| PathBuf::from(document.file_name()));
    if path.as_os_str() == "-" {
        println!("{}", json);
        return Ok(());
    }

    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    match output.format {
        OutputFormat::Json => output.json(&serde_json::json!({
            "status": "success",
            "path": path,
            "links": document.link_count(),
            "categories": store.categories().len(),
        })),
        OutputFormat::Quiet => println!("{}", path.display()),
        OutputFormat::Human => output.success(&format!(
            "Exported {} link(s) to {}",
            document.link_count(),
            path.display()
        )),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use navdash_core::storage::{MemoryBackend, Persistence};
    use navdash_core::Config;
    use tempfile::TempDir;

    fn memory_store() -> Store {
        let persistence = Persistence::new(Box::new(MemoryBackend::new()), "nav");
        Store::with_persistence(persistence, Config::default())
    }

    #[test]
    fn test_export_then_import_keeps_links() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup.json");
        let output = Output::new(OutputFormat::Quiet);

        let mut store = memory_store();
        export(&store, Some(path.clone()), &output).unwrap();
        assert!(path.exists());

        let before: Vec<(String, String)> = store
            .links()
            .iter()
            .map(|l| (l.id.clone(), l.url.clone()))
            .collect();
        import(&mut store, path, true, &output).unwrap();
        let after: Vec<(String, String)> = store
            .links()
            .iter()
            .map(|l| (l.id.clone(), l.url.clone()))
            .collect();
        assert_eq!(after, before);
    }

    #[test]
    fn test_import_rejects_non_json_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup.txt");
        fs::write(&path, "[]").unwrap();

        let mut store = memory_store();
        let output = Output::new(OutputFormat::Quiet);
        assert!(import(&mut store, path, true, &output).is_err());
    }

    #[test]
    fn test_import_adds_links() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.json");
        fs::write(
            &path,
            r#"[{"id":"x1","name":"Example","url":"https://example.org","description":"",
                "order":0,"createdAt":1700000000000,"updatedAt":1700000000000}]"#,
        )
        .unwrap();

        let mut store = memory_store();
        let count = store.links().len();
        let output = Output::new(OutputFormat::Quiet);
        import(&mut store, path, true, &output).unwrap();

        assert_eq!(store.links().len(), count + 1);
        assert!(store.links().iter().any(|l| l.url == "https://example.org"));
    }
}
