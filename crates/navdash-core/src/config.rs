//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/navdash/config.toml)
//! 3. Environment variables (NAVDASH_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable prefix
const ENV_PREFIX: &str = "NAVDASH";

/// Default storage quota, matching the usual browser local-storage limit
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Which durable medium backs the persistence adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Single SQLite database file
    #[default]
    Sqlite,
    /// One JSON file per key
    Files,
    /// Nothing survives the process
    Memory,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(BackendKind::Sqlite),
            "files" | "file" => Ok(BackendKind::Files),
            "memory" | "mem" => Ok(BackendKind::Memory),
            other => bail!("Unknown backend '{}'. Use sqlite, files, or memory.", other),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BackendKind::Sqlite => "sqlite",
            BackendKind::Files => "files",
            BackendKind::Memory => "memory",
        };
        write!(f, "{}", name)
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (SQLite db or key files)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Storage backend
    #[serde(default)]
    pub backend: BackendKind,

    /// Prefix for every persisted key
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Maximum stored bytes, 0 for unlimited; writes beyond it fail with a
    /// quota error
    #[serde(default = "default_quota")]
    pub quota_bytes: u64,

    /// Load the built-in links and categories when nothing is stored
    #[serde(default = "default_true")]
    pub seed_defaults: bool,

    /// Default log filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Write logs to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: BackendKind::default(),
            namespace: default_namespace(),
            quota_bytes: default_quota(),
            seed_defaults: true,
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (NAVDASH_DATA_DIR, NAVDASH_BACKEND, ...)
    /// 2. Config file (~/.config/navdash/config.toml or NAVDASH_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load from an explicit path if given, otherwise the default location
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_BACKEND", ENV_PREFIX)) {
            self.backend = val
                .parse()
                .with_context(|| format!("Invalid {}_BACKEND", ENV_PREFIX))?;
        }

        if let Ok(val) = std::env::var(format!("{}_NAMESPACE", ENV_PREFIX)) {
            if !val.is_empty() {
                self.namespace = val;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_LOG_LEVEL", ENV_PREFIX)) {
            self.log_level = val;
        }

        Ok(())
    }

    /// Set a single value by key, as used by `navdash config set`
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data_dir" => self.data_dir = PathBuf::from(value),
            "backend" => self.backend = value.parse()?,
            "namespace" => {
                if value.is_empty() {
                    bail!("namespace cannot be empty");
                }
                self.namespace = value.to_string();
            }
            "quota_bytes" => {
                self.quota_bytes = match value {
                    "" | "none" | "unlimited" => 0,
                    n => n
                        .parse()
                        .with_context(|| format!("Invalid byte count: {}", n))?,
                }
            }
            "seed_defaults" => self.seed_defaults = parse_bool(value)?,
            "log_level" => self.log_level = value.to_string(),
            "log_file" => {
                self.log_file = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
            other => bail!(
                "Unknown config key '{}'. Valid keys: data_dir, backend, namespace, quota_bytes, seed_defaults, log_level, log_file",
                other
            ),
        }
        Ok(())
    }

    /// Ensure data directory exists
    pub fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with NAVDASH_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("navdash")
            .join("config.toml")
    }

    /// Effective quota, `None` when unlimited
    pub fn quota(&self) -> Option<u64> {
        (self.quota_bytes > 0).then_some(self.quota_bytes)
    }

    /// Get the path to the SQLite database
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("navdash.db")
    }

    /// Get the directory used by the file backend
    pub fn files_dir(&self) -> PathBuf {
        self.data_dir.join("kv")
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => bail!("Expected true or false, got '{}'", other),
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("navdash")
}

fn default_namespace() -> String {
    "nav".to_string()
}

fn default_quota() -> u64 {
    DEFAULT_QUOTA_BYTES
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "NAVDASH_DATA_DIR",
        "NAVDASH_BACKEND",
        "NAVDASH_NAMESPACE",
        "NAVDASH_LOG_LEVEL",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend, BackendKind::Sqlite);
        assert_eq!(config.namespace, "nav");
        assert_eq!(config.quota(), Some(DEFAULT_QUOTA_BYTES));
        assert!(config.seed_defaults);
        assert_eq!(config.log_level, "warn");
        assert!(config.data_dir.ends_with("navdash"));
    }

    #[test]
    fn test_file_paths() {
        let config = Config::default();
        assert!(config.sqlite_path().ends_with("navdash.db"));
        assert!(config.files_dir().ends_with("kv"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("NAVDASH_DATA_DIR", "/tmp/navdash-test");
        config.apply_env_overrides().unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/navdash-test"));
    }

    #[test]
    fn test_env_override_backend() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("NAVDASH_BACKEND", "files");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.backend, BackendKind::Files);

        env::set_var("NAVDASH_BACKEND", "floppy");
        assert!(config.apply_env_overrides().is_err());
    }

    #[test]
    fn test_env_override_namespace_ignores_empty() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("NAVDASH_NAMESPACE", "");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.namespace, "nav");

        env::set_var("NAVDASH_NAMESPACE", "work");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.namespace, "work");
    }

    #[test]
    fn test_set_value() {
        let mut config = Config::default();
        config.set_value("backend", "memory").unwrap();
        config.set_value("quota_bytes", "1024").unwrap();
        config.set_value("seed_defaults", "no").unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.quota(), Some(1024));
        assert!(!config.seed_defaults);

        config.set_value("quota_bytes", "unlimited").unwrap();
        assert!(config.quota().is_none());

        assert!(config.set_value("namespace", "").is_err());
        assert!(config.set_value("quota_bytes", "lots").is_err());
        assert!(config.set_value("colour", "blue").is_err());
    }

    #[test]
    fn test_serialization() {
        let config = Config {
            data_dir: PathBuf::from("/data/navdash"),
            backend: BackendKind::Files,
            namespace: "work".to_string(),
            quota_bytes: 0,
            seed_defaults: false,
            log_level: "debug".to_string(),
            log_file: Some(PathBuf::from("/tmp/navdash.log")),
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("backend = \"files\""));
        assert!(toml_str.contains("namespace"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.backend, config.backend);
        assert_eq!(parsed.log_file, config.log_file);
        assert!(parsed.quota().is_none());
        assert!(!parsed.seed_defaults);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            backend = "memory"
            namespace = "home"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.namespace, "home");
        // unspecified fields fall back to defaults
        assert_eq!(config.quota_bytes, DEFAULT_QUOTA_BYTES);
        assert!(config.seed_defaults);
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.namespace = "saved".to_string();
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_with_cli_override(Some(&path)).unwrap();
        assert_eq!(loaded.namespace, "saved");
    }
}
