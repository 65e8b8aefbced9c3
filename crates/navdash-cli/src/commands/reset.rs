//! Reset command handler

use anyhow::{bail, Result};

use navdash_core::Store;

use crate::output::Output;
use crate::prompt::{confirm, is_interactive};

/// Replace all data with the built-in defaults
pub fn run(store: &mut Store, yes: bool, output: &Output) -> Result<()> {
    if !yes {
        if !is_interactive() {
            bail!("Refusing to reset without confirmation. Pass --yes to proceed.");
        }
        println!(
            "This deletes {} link(s) and {} categor(ies) and restores the defaults.",
            store.links().len(),
            store.categories().len()
        );
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    output.outcome(store.reset_to_defaults());

    output.success(&format!(
        "Restored defaults: {} link(s), {} categor(ies)",
        store.links().len(),
        store.categories().len()
    ));
    Ok(())
}
