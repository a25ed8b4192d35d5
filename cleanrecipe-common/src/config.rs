//! Bootstrap configuration, root folder resolution and logging setup
//!
//! Root folder priority order:
//! 1. Explicit argument from the host application (highest priority)
//! 2. `CLEANRECIPE_ROOT_FOLDER` environment variable (`CLEANRECIPE_ROOT` as alias)
//! 3. `root_folder` in the TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or unreadable config file is never fatal: a warning is logged
//! and compiled defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Primary environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "CLEANRECIPE_ROOT_FOLDER";
/// Alternative environment variable, lower priority than [`ROOT_FOLDER_ENV`]
pub const ROOT_FOLDER_ENV_ALIAS: &str = "CLEANRECIPE_ROOT";

/// Storage key namespace used unless the config file says otherwise
pub const DEFAULT_KEY_PREFIX: &str = "cleanrecipe";
/// SQLite file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "cleanrecipe.db";

/// Network probe budget of the extraction client
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 3000;
/// Fixed latency the MVP extractor adds before returning its draft
pub const DEFAULT_ARTIFICIAL_DELAY_MS: u64 = 1200;

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the recipe database
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Namespace for the persisted recipe and metadata keys
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Buffered events per store event bus subscriber
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    #[serde(default)]
    pub extractor: ExtractorSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            key_prefix: default_key_prefix(),
            event_capacity: default_event_capacity(),
            extractor: ExtractorSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Extraction client timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorSettings {
    /// Upper bound for the reachability probe of the submitted URL
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Delay added after the probe, before the draft is returned
    #[serde(default = "default_artificial_delay_ms")]
    pub artificial_delay_ms: u64,
}

impl ExtractorSettings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn artificial_delay(&self) -> Duration {
        Duration::from_millis(self.artificial_delay_ms)
    }
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            artificial_delay_ms: DEFAULT_ARTIFICIAL_DELAY_MS,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

fn default_event_capacity() -> usize {
    crate::events::DEFAULT_EVENT_CAPACITY
}

fn default_probe_timeout_ms() -> u64 {
    DEFAULT_PROBE_TIMEOUT_MS
}

fn default_artificial_delay_ms() -> u64 {
    DEFAULT_ARTIFICIAL_DELAY_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Compiled defaults for the current platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/cleanrecipe
        dirs::data_local_dir()
            .map(|d| d.join("cleanrecipe"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/cleanrecipe"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/cleanrecipe
        dirs::data_dir()
            .map(|d| d.join("cleanrecipe"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/cleanrecipe"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\cleanrecipe
        dirs::data_local_dir()
            .map(|d| d.join("cleanrecipe"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\cleanrecipe"))
    } else {
        PathBuf::from("./cleanrecipe_data")
    }
}

/// Resolves the root folder and bootstrap config for one host component
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    config_file: Option<PathBuf>,
}

impl RootFolderResolver {
    /// Resolver reading `<config dir>/cleanrecipe/<module_name>.toml`
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            config_file: None,
        }
    }

    /// Use an explicit config file instead of the per-user location
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Location of the TOML config file, if one can be determined
    pub fn config_file_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_file {
            return Some(path.clone());
        }
        dirs::config_dir().map(|d| {
            d.join("cleanrecipe")
                .join(format!("{}.toml", self.module_name))
        })
    }

    /// Load the config file, falling back to defaults when missing or invalid
    pub fn load_config(&self) -> TomlConfig {
        let Some(path) = self.config_file_path() else {
            warn!("Could not determine config directory, using defaults");
            return TomlConfig::default();
        };

        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return TomlConfig::default();
        }

        match load_toml_config(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                TomlConfig::default()
            }
        }
    }

    /// Resolve the root folder without an explicit override
    pub fn resolve(&self) -> PathBuf {
        self.resolve_with(None)
    }

    /// Resolve the root folder, honoring an explicit host-provided path first
    pub fn resolve_with(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }

        for var in [ROOT_FOLDER_ENV, ROOT_FOLDER_ENV_ALIAS] {
            if let Ok(path) = std::env::var(var) {
                if !path.trim().is_empty() {
                    return PathBuf::from(path);
                }
            }
        }

        if let Some(root_folder) = self.load_config().root_folder {
            return root_folder;
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and names files inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Create the root folder (and parents); safe to call repeatedly
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }
}

/// Install a global tracing subscriber for a host binary
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a global
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match &config.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .try_init()
        }
        None => builder.try_init(),
    };

    result.map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {}", e)))
}
