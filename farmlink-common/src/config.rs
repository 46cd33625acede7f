//! Configuration loading and resolution
//!
//! Every option resolves with the same priority order:
//! 1. Explicit override (command-line argument)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default
//!
//! A missing config file at the default location is not an error; an
//! explicitly named file that does not exist is.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5180";
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 100;

pub const ENV_ROOT: &str = "FARMLINK_ROOT";
pub const ENV_BIND: &str = "FARMLINK_BIND";
pub const ENV_SECRET_KEY: &str = "FARMLINK_SECRET_KEY";
pub const ENV_GEMINI_API_KEY: &str = "FARMLINK_GEMINI_API_KEY";
pub const ENV_MAX_UPLOAD_MB: &str = "FARMLINK_MAX_UPLOAD_MB";

/// Options recognized in the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub bind_address: Option<String>,
    pub root_folder: Option<PathBuf>,
    pub secret_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub max_upload_mb: Option<u64>,
}

impl TomlConfig {
    /// Load and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

/// Explicit per-option overrides, typically from the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
}

/// Resolved application configuration, fixed for the process lifetime
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    /// Parent directory of the database and uploaded media
    pub root_folder: PathBuf,
    /// Signs session cookies; changing it invalidates all live sessions
    pub secret_key: String,
    pub gemini_api_key: Option<String>,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let toml = match overrides.config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                TomlConfig::load(&path)?
            }
            None => match default_config_path() {
                Some(path) if path.exists() => TomlConfig::load(&path)?,
                _ => TomlConfig::default(),
            },
        };

        let root_folder = overrides
            .root_folder
            .or_else(|| env_path(ENV_ROOT))
            .or(toml.root_folder)
            .unwrap_or_else(default_root_folder);

        let bind_address = overrides
            .bind_address
            .or_else(|| env_string(ENV_BIND))
            .or(toml.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let secret_key = match env_string(ENV_SECRET_KEY).or(toml.secret_key) {
            Some(key) if !key.trim().is_empty() => key,
            _ => {
                warn!(
                    "No secret key configured; generated one for this run \
                     (sessions will not survive a restart)"
                );
                crate::auth::generate_secret_key()
            }
        };

        let env_api_key = env_string(ENV_GEMINI_API_KEY).filter(|k| !k.trim().is_empty());
        let toml_api_key = toml.gemini_api_key.filter(|k| !k.trim().is_empty());
        if env_api_key.is_some() && toml_api_key.is_some() {
            warn!("Gemini API key set in both environment and config file; using the environment value");
        }
        let gemini_api_key = env_api_key.or(toml_api_key);
        if gemini_api_key.is_some() {
            info!("Gemini API key configured");
        }

        let max_upload_mb = env_string(ENV_MAX_UPLOAD_MB)
            .map(|raw| {
                raw.parse::<u64>()
                    .map_err(|e| Error::Config(format!("{} must be an integer: {}", ENV_MAX_UPLOAD_MB, e)))
            })
            .transpose()?
            .or(toml.max_upload_mb)
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB);

        Ok(Self {
            bind_address,
            root_folder,
            secret_key,
            gemini_api_key,
            max_upload_bytes: (max_upload_mb as usize) * 1024 * 1024,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join("farmlink.db")
    }

    pub fn media_root(&self) -> PathBuf {
        self.root_folder.join("media")
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_path(name: &str) -> Option<PathBuf> {
    env_string(name).map(PathBuf::from)
}

/// Default config file location, e.g. `~/.config/farmlink/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("farmlink").join("config.toml"))
}

/// Platform data directory fallback for the storage root
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("farmlink"))
        .unwrap_or_else(|| PathBuf::from("./farmlink_data"))
}
