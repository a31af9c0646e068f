//! Configuration file support for Nutrilog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/nutrilog/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub water: WaterConfig,

    #[serde(default)]
    pub energy: EnergyConfig,

    #[serde(default)]
    pub recipes: RecipeConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Water tracking configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WaterConfig {
    #[serde(default = "default_glass_ml")]
    pub glass_ml: u32,

    #[serde(default = "default_goal_glasses")]
    pub default_goal_glasses: u32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            glass_ml: default_glass_ml(),
            default_goal_glasses: default_goal_glasses(),
        }
    }
}

/// Calorie goal configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnergyConfig {
    /// Daily goal shown before any BMI has been recorded
    #[serde(default = "default_fallback_goal_kcal")]
    pub fallback_goal_kcal: i64,

    /// Optional lower bound for the daily target. Unset means no floor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_target_kcal: Option<i64>,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            fallback_goal_kcal: default_fallback_goal_kcal(),
            min_target_kcal: None,
        }
    }
}

/// Recipe browser configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecipeConfig {
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("nutrilog")
}

fn default_glass_ml() -> u32 {
    crate::water::DEFAULT_GLASS_ML
}

fn default_goal_glasses() -> u32 {
    crate::water::DEFAULT_GOAL_GLASSES
}

fn default_fallback_goal_kcal() -> i64 {
    crate::energy::FALLBACK_DAILY_GOAL_KCAL
}

fn default_cache_capacity() -> usize {
    32
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("nutrilog").join("config.toml")
    }

    /// Reject values that would make the trackers meaningless
    pub fn validate(&self) -> Result<()> {
        if self.water.glass_ml == 0 {
            return Err(Error::Config("water.glass_ml must be greater than 0".into()));
        }
        if self.water.default_goal_glasses == 0 {
            return Err(Error::Config(
                "water.default_goal_glasses must be greater than 0".into(),
            ));
        }
        if self.recipes.cache_capacity == 0 {
            return Err(Error::Config(
                "recipes.cache_capacity must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
