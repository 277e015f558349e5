//! INI configuration file.
//!
//! Settings live in `~/.config/intentfetch/config.ini` (or the platform
//! equivalent):
//!
//! ```ini
//! [intent]
//! max_reach = 500
//! perp_weight = 5
//! min_speed = 8
//!
//! [tracker]
//! pointer_stride = 4
//! refresh_interval_ms = 300
//! ```
//!
//! Every key is optional; missing keys keep their defaults. Values are
//! parsed when the file is loaded but only validated when converted into
//! an [`IntentConfig`] or [`TrackerConfig`], so a file can be inspected and
//! repaired with `config set` even if it holds an unusable value.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::Ini;

use crate::intent::{
    ConfigError, IntentConfig, DEFAULT_MAX_REACH, DEFAULT_MIN_SPEED, DEFAULT_PERP_WEIGHT,
};
use crate::tracker::{TrackerConfig, DEFAULT_POINTER_STRIDE, DEFAULT_REFRESH_INTERVAL_MS};

const INTENT_SECTION: &str = "intent";
const TRACKER_SECTION: &str = "tracker";

/// Directory name under the platform configuration directory.
const APP_DIR: &str = "intentfetch";

/// Path of the user configuration file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join("config.ini"))
        .ok_or(ConfigError::NoConfigDir)
}

/// `[intent]` section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntentSettings {
    pub max_reach: f64,
    pub perp_weight: f64,
    pub min_speed: f64,
}

impl Default for IntentSettings {
    fn default() -> Self {
        Self {
            max_reach: DEFAULT_MAX_REACH,
            perp_weight: DEFAULT_PERP_WEIGHT,
            min_speed: DEFAULT_MIN_SPEED,
        }
    }
}

/// `[tracker]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerSettings {
    pub pointer_stride: u32,
    pub refresh_interval_ms: u64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            pointer_stride: DEFAULT_POINTER_STRIDE,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub intent: IntentSettings,
    pub tracker: TrackerSettings,
}

impl ConfigFile {
    /// Load the user configuration file, or defaults if it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load a configuration file from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ini = Ini::load_from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config = Self::default();
        for (section, properties) in ini.iter() {
            for (key, value) in properties.iter() {
                let name = match section {
                    Some(section) => format!("{}.{}", section, key),
                    None => key.to_string(),
                };
                match name.parse::<ConfigKey>() {
                    Ok(config_key) => config_key.set(&mut config, value)?,
                    Err(_) => tracing::debug!(key = %name, "Ignoring unknown config key"),
                }
            }
        }

        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Save to the user configuration file, creating its directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path()?)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini.write_to_file(path).map_err(io_err)
    }

    /// Validated engine configuration.
    pub fn intent_config(&self) -> Result<IntentConfig, ConfigError> {
        let config = IntentConfig::new()
            .with_max_reach(self.intent.max_reach)
            .with_perp_weight(self.intent.perp_weight)
            .with_min_speed(self.intent.min_speed);
        config.validate()?;
        Ok(config)
    }

    /// Validated tracker configuration.
    pub fn tracker_config(&self) -> Result<TrackerConfig, ConfigError> {
        let config = TrackerConfig::new()
            .with_pointer_stride(self.tracker.pointer_stride)
            .with_refresh_interval(Duration::from_millis(self.tracker.refresh_interval_ms));
        config.validate()?;
        Ok(config)
    }
}

/// A single `section.key` setting, as used by `config get` and `config set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    MaxReach,
    PerpWeight,
    MinSpeed,
    PointerStride,
    RefreshIntervalMs,
}

impl ConfigKey {
    /// Every key, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::MaxReach,
            ConfigKey::PerpWeight,
            ConfigKey::MinSpeed,
            ConfigKey::PointerStride,
            ConfigKey::RefreshIntervalMs,
        ]
    }

    /// INI section this key lives in.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::MaxReach | ConfigKey::PerpWeight | ConfigKey::MinSpeed => INTENT_SECTION,
            ConfigKey::PointerStride | ConfigKey::RefreshIntervalMs => TRACKER_SECTION,
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::MaxReach => "max_reach",
            ConfigKey::PerpWeight => "perp_weight",
            ConfigKey::MinSpeed => "min_speed",
            ConfigKey::PointerStride => "pointer_stride",
            ConfigKey::RefreshIntervalMs => "refresh_interval_ms",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value, formatted for display.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::MaxReach => config.intent.max_reach.to_string(),
            ConfigKey::PerpWeight => config.intent.perp_weight.to_string(),
            ConfigKey::MinSpeed => config.intent.min_speed.to_string(),
            ConfigKey::PointerStride => config.tracker.pointer_stride.to_string(),
            ConfigKey::RefreshIntervalMs => config.tracker.refresh_interval_ms.to_string(),
        }
    }

    /// Parse `value` and store it.
    ///
    /// Only checks that the value parses as the key's type; range checks
    /// happen in [`ConfigFile::intent_config`] and
    /// [`ConfigFile::tracker_config`].
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::MaxReach => config.intent.max_reach = self.parse_value(value)?,
            ConfigKey::PerpWeight => config.intent.perp_weight = self.parse_value(value)?,
            ConfigKey::MinSpeed => config.intent.min_speed = self.parse_value(value)?,
            ConfigKey::PointerStride => config.tracker.pointer_stride = self.parse_value(value)?,
            ConfigKey::RefreshIntervalMs => {
                config.tracker.refresh_interval_ms = self.parse_value(value)?
            }
        }
        Ok(())
    }

    fn parse_value<T>(&self, value: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
