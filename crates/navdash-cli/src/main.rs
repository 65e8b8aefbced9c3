//! navdash CLI
//!
//! Command-line interface for navdash - a local navigation dashboard of
//! categorized links.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use navdash_core::{Config, Store};

mod commands;
mod output;
mod prompt;

use commands::link::LinkFields;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "navdash")]
#[command(about = "navdash - Local navigation dashboard of categorized links")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage links
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Search saved links
    Search {
        /// Text to look for in names, descriptions, URLs and tags
        query: String,
        /// Only search this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Search the web
    Web {
        /// Search terms
        #[arg(required = true)]
        query: Vec<String>,
        /// Engine id (defaults to the searchEngine setting)
        #[arg(short, long)]
        engine: Option<String>,
        /// Print the URL instead of opening it
        #[arg(short, long)]
        print: bool,
    },
    /// List all tags
    Tags,
    /// Import links and categories from a JSON export
    Import {
        /// File to import (.json)
        file: PathBuf,
        /// Apply without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Export all links and categories as JSON
    Export {
        /// Output file, or - for stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show or change display settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show storage status
    Status,
    /// Delete everything and restore the default links
    Reset {
        /// Reset without asking
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum LinkCommands {
    /// Create a new link
    #[command(alias = "create")]
    Add {
        /// URL to save
        url: String,
        /// Display name (defaults to the host)
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Category name
        #[arg(short, long)]
        category: Option<String>,
        /// Tags to add
        #[arg(short, long)]
        tag: Vec<String>,
        #[arg(long)]
        icon: Option<String>,
        /// Background color, e.g. #1677ff
        #[arg(long)]
        color: Option<String>,
    },
    /// List links
    #[command(alias = "ls")]
    List {
        /// Filter by category
        #[arg(short, long, conflicts_with = "uncategorized")]
        category: Option<String>,
        /// Only links without a category
        #[arg(long)]
        uncategorized: bool,
        /// Filter by tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Show link details
    Show {
        /// Link ID (full ID or prefix)
        id: String,
    },
    /// Edit a link (prompts for each field when no flags are given)
    Edit {
        /// Link ID (full ID or prefix)
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        url: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long, conflicts_with = "no_category")]
        category: Option<String>,
        /// Remove the link from its category
        #[arg(long)]
        no_category: bool,
        /// Replace the tags
        #[arg(short, long)]
        tag: Vec<String>,
        /// Icon, empty to remove
        #[arg(long)]
        icon: Option<String>,
        /// Background color, empty to remove
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete one or more links
    #[command(alias = "rm")]
    Delete {
        /// Link IDs (full ID or prefix)
        #[arg(required = true)]
        ids: Vec<String>,
        /// Delete without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Move a link to a position (0-based)
    #[command(alias = "mv")]
    Move {
        /// Link ID (full ID or prefix)
        id: String,
        position: usize,
    },
    /// Open a link in the browser
    Open {
        /// Link ID (full ID or prefix)
        id: String,
    },
    /// Put links in a category, or clear it with --none
    Categorize {
        /// Link IDs (full ID or prefix)
        #[arg(required = true)]
        ids: Vec<String>,
        /// Category name
        #[arg(short, long, required_unless_present = "none")]
        category: Option<String>,
        /// Clear the category
        #[arg(long, conflicts_with = "category")]
        none: bool,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Create a category
    #[command(alias = "create")]
    Add {
        name: String,
        #[arg(long)]
        icon: Option<String>,
    },
    /// List categories
    #[command(alias = "ls")]
    List,
    /// Rename a category or change its icon
    Edit {
        /// Category name, ID or ID prefix
        id: String,
        /// New name (links follow the rename)
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete a category, leaving its links uncategorized
    #[command(alias = "rm")]
    Delete {
        /// Category name, ID or ID prefix
        id: String,
        /// Delete without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Move a category to a position (0-based)
    #[command(alias = "mv")]
    Move {
        /// Category name, ID or ID prefix
        id: String,
        position: usize,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show current settings
    Show,
    /// Change a setting
    Set {
        /// Setting key (theme, searchEngine, layout, currentCategory,
        /// showDescription, gridColumns)
        key: String,
        value: String,
    },
    /// Restore default settings
    Reset,
    /// List the available search engines
    Engines,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, backend, namespace, quota_bytes,
        /// seed_defaults, log_level, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work even when the config file is broken
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);
    debug!(backend = %config.backend, namespace = %config.namespace, "Opening store");

    let mut store = Store::open_with_config(config)?;

    match cli.command {
        Commands::Link { command } => handle_link_command(command, &mut store, &output),
        Commands::Category { command } => handle_category_command(command, &mut store, &output),
        Commands::Search { query, category } => {
            commands::search::links(&store, query, category, &output)
        }
        Commands::Web {
            query,
            engine,
            print,
        } => commands::search::web(&store, query, engine, print, &output),
        Commands::Tags => commands::tag::list(&store, &output),
        Commands::Import { file, yes } => commands::transfer::import(&mut store, file, yes, &output),
        Commands::Export { output: path } => commands::transfer::export(&store, path, &output),
        Commands::Settings { command } => handle_settings_command(command, &mut store, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Status => commands::status::show(&store, &output),
        Commands::Reset { yes } => commands::reset::run(&mut store, yes, &output),
    }
}

fn handle_link_command(command: LinkCommands, store: &mut Store, output: &Output) -> Result<()> {
    match command {
        LinkCommands::Add {
            url,
            name,
            description,
            category,
            tag,
            icon,
            color,
        } => {
            let fields = LinkFields {
                name,
                url: Some(url),
                description,
                category,
                tags: tag,
                icon,
                color,
            };
            commands::link::add(store, fields, output)
        }
        LinkCommands::List {
            category,
            uncategorized,
            tag,
        } => commands::link::list(store, category, uncategorized, tag, output),
        LinkCommands::Show { id } => commands::link::show(store, id, output),
        LinkCommands::Edit {
            id,
            name,
            url,
            description,
            category,
            no_category,
            tag,
            icon,
            color,
        } => {
            let fields = LinkFields {
                name,
                url,
                description,
                category,
                tags: tag,
                icon,
                color,
            };
            commands::link::edit(store, id, fields, no_category, output)
        }
        LinkCommands::Delete { ids, yes } => commands::link::delete(store, ids, yes, output),
        LinkCommands::Move { id, position } => commands::link::move_to(store, id, position, output),
        LinkCommands::Open { id } => commands::link::open(store, id, output),
        LinkCommands::Categorize {
            ids,
            category,
            none,
        } => {
            let category = if none { None } else { category };
            commands::link::categorize(store, ids, category, output)
        }
    }
}

fn handle_category_command(
    command: CategoryCommands,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        CategoryCommands::Add { name, icon } => commands::category::add(store, name, icon, output),
        CategoryCommands::List => commands::category::list(store, output),
        CategoryCommands::Edit { id, name, icon } => {
            commands::category::edit(store, id, name, icon, output)
        }
        CategoryCommands::Delete { id, yes } => commands::category::delete(store, id, yes, output),
        CategoryCommands::Move { id, position } => {
            commands::category::move_to(store, id, position, output)
        }
    }
}

fn handle_settings_command(
    command: Option<SettingsCommands>,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        Some(SettingsCommands::Show) | None => commands::settings::show(store, output),
        Some(SettingsCommands::Set { key, value }) => {
            commands::settings::set(store, key, value, output)
        }
        Some(SettingsCommands::Reset) => commands::settings::reset(store, output),
        Some(SettingsCommands::Engines) => commands::settings::engines(store, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging
///
/// RUST_LOG wins over the configured level. Logs go to stderr unless a log
/// file is configured.
fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "navdash_core={},navdash_cli={}",
            config.log_level, config.log_level
        ))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    // Ignore the error if a subscriber is already installed
    match config.log_file {
        Some(ref log_path) => match File::create(log_path) {
            Ok(file) => {
                let _ = builder
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
            }
            Err(e) => {
                eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            }
        },
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}
