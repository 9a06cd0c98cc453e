//! Configuration at ~/.config/plancal/config.toml, overridable through
//! `PLANCAL_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::{PlanCalError, PlanCalResult};
use crate::overlap::OverlapPolicy;

static DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";
static DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
static DEFAULT_HORIZON: &str = "2025-06-30";

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_horizon() -> String {
    DEFAULT_HORIZON.to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_refresh_interval_secs() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCalConfig {
    /// Base URL the CLI talks to.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Address the server listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Last date open-ended recurrences are generated up to.
    #[serde(default = "default_horizon")]
    pub horizon: String,

    #[serde(default)]
    pub overlap_policy: OverlapPolicy,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How often `watch` refetches events.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// JSON file (`{"events": [...]}`) the server starts from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
}

impl Default for PlanCalConfig {
    fn default() -> Self {
        PlanCalConfig {
            server_url: default_server_url(),
            bind_addr: default_bind_addr(),
            horizon: default_horizon(),
            overlap_policy: OverlapPolicy::default(),
            poll_interval_ms: default_poll_interval_ms(),
            refresh_interval_secs: default_refresh_interval_secs(),
            seed_file: None,
        }
    }
}

impl PlanCalConfig {
    pub fn config_path() -> PlanCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PlanCalError::Config("Could not determine config directory".into()))?
            .join("plancal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file (created with defaults if missing), then apply
    /// environment overrides.
    pub fn load() -> PlanCalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(Environment::with_prefix("PLANCAL").try_parsing(true))
            .build()
            .map_err(|e| PlanCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlanCalError::Config(e.to_string()))
    }

    /// Parse a config from TOML text, without file or environment lookups.
    pub fn from_toml(contents: &str) -> PlanCalResult<Self> {
        Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()
            .map_err(|e| PlanCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlanCalError::Config(e.to_string()))
    }

    /// Write a config file with every option commented out.
    pub fn create_default_config(path: &Path) -> PlanCalResult<()> {
        let contents = format!(
            "\
# plancal configuration

# Server the CLI talks to:
# server_url = \"{DEFAULT_SERVER_URL}\"

# Address the server binds:
# bind_addr = \"{DEFAULT_BIND_ADDR}\"

# Repeating events without an end date are generated up to this date:
# horizon = \"{DEFAULT_HORIZON}\"

# Whether back-to-back events conflict (\"touching-is-free\" or \"touching-conflicts\"):
# overlap_policy = \"touching-is-free\"

# Notification check cadence and event refresh cadence for `plancal watch`:
# poll_interval_ms = 1000
# refresh_interval_secs = 30

# Events the server starts with:
# seed_file = \"~/.config/plancal/events.json\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PlanCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| PlanCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn horizon(&self) -> PlanCalResult<NaiveDate> {
        NaiveDate::parse_from_str(&self.horizon, "%Y-%m-%d")
            .map_err(|_| PlanCalError::InvalidDate(self.horizon.clone()))
    }

    /// Never zero, so it is always a valid tokio interval period.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Never zero, so it is always a valid tokio interval period.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    /// Seed file path with `~` expanded.
    pub fn seed_path(&self) -> Option<PathBuf> {
        self.seed_file
            .as_ref()
            .map(|p| PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).into_owned()))
    }
}
