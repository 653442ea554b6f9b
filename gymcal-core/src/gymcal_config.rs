//! Global gymcal configuration.

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::Deserialize;

use crate::constants::DEFAULT_STORAGE_QUOTA_BYTES;
use crate::error::{GymcalError, GymcalResult};
use crate::store::FileBackend;

static DEFAULT_DATA_DIR: &str = "~/.local/share/gymcal";
static DEFAULT_EXPORT_DIR: &str = "~/Downloads";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_DIR)
}

fn default_quota() -> u64 {
    DEFAULT_STORAGE_QUOTA_BYTES
}

fn default_true() -> bool {
    true
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// Global configuration at ~/.config/gymcal/config.toml
#[derive(Debug, Deserialize, Clone)]
pub struct GymcalConfig {
    /// Where the workout collection is persisted
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Where exports and saved calendar files go
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// IANA zone for calendar files. Defaults to the system zone.
    #[serde(default)]
    pub timezone: Option<String>,

    #[serde(default = "default_quota")]
    pub storage_quota_bytes: u64,

    /// Hand calendar files to the system calendar app instead of only saving them
    #[serde(default = "default_true")]
    pub share: bool,

    /// Allow planning workouts on dates before today
    #[serde(default)]
    pub allow_past_dates: bool,
}

impl Default for GymcalConfig {
    fn default() -> Self {
        GymcalConfig {
            data_dir: default_data_dir(),
            export_dir: default_export_dir(),
            timezone: None,
            storage_quota_bytes: default_quota(),
            share: true,
            allow_past_dates: false,
        }
    }
}

impl GymcalConfig {
    pub fn config_path() -> GymcalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| GymcalError::Config("Could not determine config directory".into()))?
            .join("gymcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file, creating a commented default on first run.
    pub fn load() -> GymcalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> GymcalResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| GymcalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| GymcalError::Config(e.to_string()))
    }

    pub fn data_path(&self) -> PathBuf {
        expand(&self.data_dir)
    }

    pub fn export_path(&self) -> PathBuf {
        expand(&self.export_dir)
    }

    /// File backend rooted at the data directory, with the configured quota
    /// (0 disables the limit).
    pub fn backend(&self) -> FileBackend {
        let quota = (self.storage_quota_bytes > 0).then_some(self.storage_quota_bytes);
        FileBackend::new(self.data_path(), quota)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> GymcalResult<()> {
        let contents = format!(
            "\
# gymcal configuration

# Where your workouts are stored:
# data_dir = \"{}\"

# Where exports and calendar files are saved:
# export_dir = \"{}\"

# Time zone for calendar files (defaults to the system zone):
# timezone = \"Europe/London\"

# Storage limit in bytes (0 for no limit):
# storage_quota_bytes = {}

# Open calendar files with the system calendar app:
# share = true

# Allow planning workouts in the past:
# allow_past_dates = false
",
            DEFAULT_DATA_DIR, DEFAULT_EXPORT_DIR, DEFAULT_STORAGE_QUOTA_BYTES
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GymcalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| GymcalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
