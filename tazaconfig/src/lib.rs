//! # TazaTunes Configuration Module
//!
//! This module provides configuration management for TazaTunes, including:
//! - Loading configuration from YAML files
//! - Merging with embedded default configuration
//! - Environment variable overrides
//! - Type-safe getters and setters for configuration values
//! - Thread-safe singleton access pattern
//!
//! Source crates (`tazasaavn`, `tazaaudius`, `tazaradio`, `tazanews`) extend
//! [`Config`] with their own `*ConfigExt` traits, so this crate only knows
//! about the settings shared by the whole application.
//!
//! ## Usage
//!
//! ```no_run
//! use tazaconfig::get_config;
//!
//! let config = get_config();
//!
//! let timeout = config.get_http_timeout_secs()?;
//! let volume = config.get_player_default_volume()?;
//!
//! config.set_player_default_volume(65)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Result, anyhow};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Number, Value};
use std::{
    env, fs,
    path::Path,
    sync::{Arc, Mutex},
};
use tracing::{info, warn};

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("tazatunes.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load TazaTunes configuration"));
}

const ENV_CONFIG_DIR: &str = "TAZATUNES_CONFIG";
const ENV_PREFIX: &str = "TAZATUNES_CONFIG__";
const CONFIG_DIR_NAME: &str = ".tazatunes";

// Default values for configuration
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "TazaTunes/0.1";
const DEFAULT_PLAYER_VOLUME: u64 = 80;

/// Macro to generate getter/setter for u64 values with default
macro_rules! impl_u64_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<u64> {
            match self.get_value($path) {
                Ok(Value::Number(n)) => match n.as_u64() {
                    Some(v) => Ok(v),
                    None => {
                        warn!(path = ?$path, "Not an unsigned integer, using default {}", $default);
                        Ok($default)
                    }
                },
                Ok(Value::String(s)) => Ok(s.trim().parse().unwrap_or($default)),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, value: u64) -> Result<()> {
            self.set_value($path, Value::Number(Number::from(value)))
        }
    };
}

/// Macro to generate getter/setter for bool values with default
macro_rules! impl_bool_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<bool> {
            match self.get_value($path) {
                Ok(Value::Bool(b)) => Ok(b),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, value: bool) -> Result<()> {
            self.set_value($path, Value::Bool(value))
        }
    };
}

/// Macro to generate getter/setter for string values with default
macro_rules! impl_string_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<String> {
            match self.get_value($path) {
                Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
                _ => Ok($default.to_string()),
            }
        }

        pub fn $setter(&self, value: String) -> Result<()> {
            self.set_value($path, Value::String(value))
        }
    };
}

/// Configuration manager for TazaTunes
///
/// This structure manages the application configuration, including:
/// - Loading configuration from YAML files
/// - Merging with default configuration
/// - Handling environment variable overrides
/// - Providing typed getters/setters for configuration values
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
}

impl Clone for Config {
    fn clone(&self) -> Self {
        let data = self.data.lock().unwrap().clone();
        Self {
            config_dir: self.config_dir.clone(),
            path: self.path.clone(),
            data: Mutex::new(data),
        }
    }
}

impl Config {
    /// Finds a config directory by trying different locations in order
    fn find_config_dir(directory: &str) -> String {
        // 1. Try provided directory
        if !directory.is_empty() {
            return directory.to_string();
        }

        // 2. Try environment variable
        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var = ENV_CONFIG_DIR, path = %env_path, "Trying to load config from env");
            return env_path;
        }

        // 3. Try current directory
        if Path::new(CONFIG_DIR_NAME).exists() {
            return CONFIG_DIR_NAME.to_string();
        }

        // 4. Try home directory
        if let Some(home) = home_dir() {
            let home_config = home.join(CONFIG_DIR_NAME);
            if home_config.exists() {
                return home_config.to_string_lossy().to_string();
            }
        }

        CONFIG_DIR_NAME.to_string()
    }

    /// Validates and prepares a config directory
    fn validate_config_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        if !path.is_dir() {
            return Err(anyhow!("{} is not a directory", path.display()));
        }

        // Test write permission
        let test_file = path.join(".write_test");
        fs::write(&test_file, b"test")?;
        fs::remove_file(&test_file)?;

        Ok(())
    }

    /// Determines and validates the configuration directory
    ///
    /// The directory is searched in the following order:
    /// 1. The provided `directory` parameter if not empty
    /// 2. The `TAZATUNES_CONFIG` environment variable
    /// 3. `.tazatunes` in the current directory
    /// 4. `.tazatunes` in the user's home directory
    ///
    /// The directory is created if it doesn't exist, and validated for write permission.
    pub fn config_dir(directory: &str) -> Result<String> {
        let dir_path = Self::find_config_dir(directory);
        Self::validate_config_dir(Path::new(&dir_path))?;
        Ok(dir_path)
    }

    /// Loads the configuration from the specified directory
    ///
    /// This method:
    /// 1. Determines the configuration directory
    /// 2. Loads the default embedded configuration
    /// 3. Merges it with the external config.yaml file if present
    /// 4. Applies environment variable overrides
    /// 5. Saves the merged configuration
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = Self::config_dir(directory)?;
        info!(config_dir = %config_dir, "Using config directory");

        let config_file_path = Path::new(&config_dir).join("config.yaml");
        let path = config_file_path.to_string_lossy().to_string();

        // Charger la configuration par défaut
        let mut default_value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        let yaml_data = if let Ok(data) = fs::read(&path) {
            info!(config_file = %path, "Loaded config file");
            data
        } else {
            info!(config_file = %path, "Config file not found, using default embedded config");
            DEFAULT_CONFIG.as_bytes().to_vec()
        };

        // Un fichier vide se désérialise en Null : on garde alors les défauts
        let external_value: Value = serde_yaml::from_slice(&yaml_data)?;
        merge_yaml(&mut default_value, &lower_keys_value(external_value));
        let mut config_value = lower_keys_value(default_value);

        apply_overrides(&mut config_value, env::vars());

        let config = Config {
            config_dir,
            path,
            data: Mutex::new(config_value),
        };

        config.save()?;
        Ok(config)
    }

    /// Directory holding `config.yaml`
    pub fn directory(&self) -> &str {
        &self.config_dir
    }

    /// Saves the current configuration to the config.yaml file
    pub fn save(&self) -> Result<()> {
        let data = self.data.lock().unwrap();
        let yaml = serde_yaml::to_string(&*data)?;
        fs::write(&self.path, yaml)?;
        Ok(())
    }

    /// Sets a configuration value at the specified path and saves it
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["player", "default_volume"]`)
    /// * `value` - The YAML value to set
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        set_value_internal(&mut data, path, value)?;
        drop(data);
        self.save()
    }

    /// Gets a configuration value at the specified path
    ///
    /// Returns an error if the path doesn't exist.
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.data.lock().unwrap();
        get_value_internal(&data, path)
    }

    /// Deserializes the subtree at `path` into `T`
    ///
    /// Returns `Ok(None)` when the path is absent.
    pub fn get_typed<T: DeserializeOwned>(&self, path: &[&str]) -> Result<Option<T>> {
        match self.get_value(path) {
            Ok(Value::Null) | Err(_) => Ok(None),
            Ok(value) => Ok(Some(serde_yaml::from_value(value)?)),
        }
    }

    impl_string_config!(
        get_log_min_level,
        set_log_min_level,
        &["host", "logger", "min_level"],
        DEFAULT_LOG_MIN_LEVEL
    );

    impl_bool_config!(
        get_log_enable_console,
        set_log_enable_console,
        &["host", "logger", "enable_console"],
        DEFAULT_LOG_ENABLE_CONSOLE
    );

    impl_u64_config!(
        get_http_timeout_secs,
        set_http_timeout_secs,
        &["http", "timeout_secs"],
        DEFAULT_HTTP_TIMEOUT_SECS
    );

    impl_string_config!(
        get_http_user_agent,
        set_http_user_agent,
        &["http", "user_agent"],
        DEFAULT_USER_AGENT
    );

    /// Initial volume of every player, clamped to 0–100
    pub fn get_player_default_volume(&self) -> Result<u8> {
        let raw = match self.get_value(&["player", "default_volume"]) {
            Ok(Value::Number(n)) => n.as_u64().unwrap_or(DEFAULT_PLAYER_VOLUME),
            _ => DEFAULT_PLAYER_VOLUME,
        };
        if raw > 100 {
            warn!(volume = raw, "Default volume out of range, clamping to 100");
        }
        Ok(raw.min(100) as u8)
    }

    pub fn set_player_default_volume(&self, volume: u8) -> Result<()> {
        self.set_value(
            &["player", "default_volume"],
            Value::Number(Number::from(volume.min(100))),
        )
    }
}

/// Returns the global configuration instance
///
/// The instance is lazily loaded on first access.
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
    if path.is_empty() {
        *data = value;
        return Ok(());
    }
    if data.is_null() {
        *data = Value::Mapping(Mapping::new());
    }
    if let Value::Mapping(map) = data {
        let key_value = Value::String(path[0].to_lowercase());
        if path.len() == 1 {
            map.insert(key_value, value);
        } else {
            let entry = map
                .entry(key_value)
                .or_insert(Value::Mapping(Mapping::new()));
            set_value_internal(entry, &path[1..], value)?;
        }
        Ok(())
    } else {
        Err(anyhow!("Current node is not a map"))
    }
}

fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
    let mut current = data;
    for (i, key) in path.iter().enumerate() {
        if let Value::Mapping(map) = current {
            match map.get(&Value::String(key.to_lowercase())) {
                Some(next) => current = next,
                None => return Err(anyhow!("Path {} does not exist", path[..=i].join("."))),
            }
        } else {
            return Err(anyhow!("Path {} is not a mapping", path[..i].join(".")));
        }
    }
    Ok(current.clone())
}

/// Applies `TAZATUNES_CONFIG__A__B=value` pairs onto the document
fn apply_overrides(config: &mut Value, vars: impl IntoIterator<Item = (String, String)>) {
    for (key, value) in vars {
        let Some(stripped) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let key_path = stripped.split("__").collect::<Vec<_>>();
        let yaml_value = convert_env_value(&value);
        if let Err(err) = set_value_internal(config, &key_path, yaml_value) {
            warn!(variable = %key, "Ignoring environment override: {}", err);
        }
    }
}

fn convert_env_value(value: &str) -> Value {
    serde_yaml::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

fn lower_keys_value(value: Value) -> Value {
    match value {
        Value::Mapping(map) => {
            let mut new_map = Mapping::new();
            for (k, v) in map {
                let key = match k {
                    Value::String(s) => Value::String(s.to_lowercase()),
                    other => other,
                };
                new_map.insert(key, lower_keys_value(v));
            }
            Value::Mapping(new_map)
        }
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(lower_keys_value).collect()),
        _ => value,
    }
}

/// Merges external YAML configuration into default configuration
///
/// - For mappings, keys from `external` are merged recursively into `default`
/// - For scalars and sequences, external values replace default values
/// - A null external document leaves the defaults untouched
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (_, Value::Null) => {}
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(),
    }
}
