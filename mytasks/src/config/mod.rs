//! Configuration system for the `MyTasks` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/mytasks/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

use mytasks_proto::{Priority, TaskId};
use url::Url;

use crate::state::PriorityFilter;

/// Service root used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/tasks";

/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The service URL is not a valid URL.
    #[error("invalid API URL {url:?}: {source}")]
    InvalidUrl {
        /// The rejected value.
        url: String,
        /// Parser error.
        source: url::ParseError,
    },

    /// The service URL is not `http` or `https`.
    #[error("unsupported API URL scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    api: ApiFileConfig,
    cache: CacheFileConfig,
}

/// `[api]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ApiFileConfig {
    #[serde(alias = "base_url")]
    api_url: Option<String>,
    timeout_secs: Option<u64>,
}

/// `[cache]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct CacheFileConfig {
    path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root of the task service (e.g. `http://127.0.0.1:5000/tasks`).
    pub api_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Location of the offline task snapshot.
    pub cache_path: PathBuf,
    /// Log level filter string.
    pub log_level: String,
    /// Log file; `None` means `$TMPDIR/mytasks.log`.
    pub log_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed, or if the resolved API URL is not an `http(s)` URL.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    /// Resolve a `ClientConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default. The winning API URL, default
    /// included, is validated here.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let api_url = cli
            .api_url
            .as_deref()
            .or(file.api.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL);

        Ok(Self {
            api_url: parse_api_url(api_url)?,
            timeout: Duration::from_secs(
                cli.timeout_secs
                    .or(file.api.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            cache_path: cli
                .cache
                .clone()
                .or_else(|| file.cache.path.clone())
                .unwrap_or_else(default_cache_path),
            log_level: cli.log_level.clone(),
            log_file: cli.log_file.clone(),
        })
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Offline-tolerant task tracker")]
pub struct CliArgs {
    /// Root URL of the task service.
    #[arg(long, env = "MYTASKS_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long = "timeout")]
    pub timeout_secs: Option<u64>,

    /// Path of the offline task cache.
    #[arg(long, env = "MYTASKS_CACHE")]
    pub cache: Option<PathBuf>,

    /// Path to config file (default: `~/.config/mytasks/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn", env = "MYTASKS_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/mytasks.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// What to do; defaults to `list`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Client subcommands. Each one refreshes the list before acting.
#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show tasks.
    List {
        /// Only show one priority (`All`, `High`, `Medium`, `Low`).
        #[arg(long, default_value = "All")]
        priority: PriorityFilter,
        /// Order by priority, highest first.
        #[arg(long)]
        sort: bool,
    },
    /// Create a task.
    Add {
        /// Task title.
        title: String,
        /// `High`, `Medium`, or `Low`.
        #[arg(short, long, default_value = "Medium")]
        priority: Priority,
    },
    /// Flip a task between complete and incomplete.
    Toggle {
        /// Task id.
        id: TaskId,
    },
    /// Delete a task.
    Delete {
        /// Task id.
        id: TaskId,
    },
    /// Change a task's title, priority, or completion flag.
    Edit {
        /// Task id.
        id: TaskId,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New priority.
        #[arg(short, long)]
        priority: Option<Priority>,
        /// New completion flag.
        #[arg(long)]
        completed: Option<bool>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Self::List {
            priority: PriorityFilter::All,
            sort: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn default_cache_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("mytasks")
        .join("tasks.json")
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("mytasks").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
