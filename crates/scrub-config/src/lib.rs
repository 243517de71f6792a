use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for scrub
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database path (defaults to the platform data directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// Replacement address; invalid values fall back to 127.0.0.1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masked_ip: Option<String>,

    /// Flag value written on first activation
    #[serde(default = "default_enabled")]
    pub default_enabled: bool,

    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Key material for bulk-action nonces; random per process when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce_secret: Option<String>,

    #[serde(default = "default_nonce_lifetime")]
    pub nonce_lifetime_secs: u64,

    /// Above this many pending comments the settings view suggests the CLI
    #[serde(default = "default_cli_threshold")]
    pub cli_suggest_threshold: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            masked_ip: None,
            default_enabled: default_enabled(),
            admin: AdminConfig::default(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            nonce_secret: None,
            nonce_lifetime_secs: default_nonce_lifetime(),
            cli_suggest_threshold: default_cli_threshold(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    17380
}

fn default_nonce_lifetime() -> u64 {
    86_400
}

fn default_cli_threshold() -> u64 {
    200
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, writing the defaults there if it does not exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config: Config =
                toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(path, content)?;
            Ok(config)
        }
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "scrub", "scrub") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.scrub/config.toml")
        }
    }
}
