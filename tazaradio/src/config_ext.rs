//! Extension pour intégrer l'annuaire radio dans tazaconfig
//!
//! This module provides the `RadioConfigExt` trait which adds the station
//! directory settings to `tazaconfig::Config`.
//!
//! # Example
//!
//! ```no_run
//! use tazaconfig::get_config;
//! use tazaradio::RadioConfigExt;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = get_config();
//! println!("Directory: {}", config.get_radio_base_url()?);
//! println!("Default country: {}", config.get_radio_default_country()?);
//! # Ok(())
//! # }
//! ```

use crate::client::DEFAULT_BASE_URL;
use crate::models::DEFAULT_COUNTRY;
use anyhow::Result;
use serde_yaml::{Number, Value};
use tazaconfig::Config;

/// Maximum number of stations shown at once
pub const DEFAULT_DISPLAY_LIMIT: usize = 50;

/// Extension trait adding station directory settings to `tazaconfig::Config`
///
/// Getters persist their default value when the key is missing.
pub trait RadioConfigExt {
    // ========================================================================
    // Directory
    // ========================================================================

    /// Base URL of the station directory
    fn get_radio_base_url(&self) -> Result<String>;

    fn set_radio_base_url(&self, url: String) -> Result<()>;

    // ========================================================================
    // Display
    // ========================================================================

    /// Country preselected in the picker
    fn get_radio_default_country(&self) -> Result<String>;

    fn set_radio_default_country(&self, country: String) -> Result<()>;

    /// Maximum number of stations listed
    fn get_radio_display_limit(&self) -> Result<usize>;

    fn set_radio_display_limit(&self, limit: usize) -> Result<()>;
}

impl RadioConfigExt for Config {
    fn get_radio_base_url(&self) -> Result<String> {
        match self.get_value(&["radio", "base_url"]) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
            _ => {
                self.set_radio_base_url(DEFAULT_BASE_URL.to_string())?;
                Ok(DEFAULT_BASE_URL.to_string())
            }
        }
    }

    fn set_radio_base_url(&self, url: String) -> Result<()> {
        self.set_value(&["radio", "base_url"], Value::String(url))
    }

    fn get_radio_default_country(&self) -> Result<String> {
        match self.get_value(&["radio", "default_country"]) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
            _ => {
                self.set_radio_default_country(DEFAULT_COUNTRY.to_string())?;
                Ok(DEFAULT_COUNTRY.to_string())
            }
        }
    }

    fn set_radio_default_country(&self, country: String) -> Result<()> {
        self.set_value(&["radio", "default_country"], Value::String(country))
    }

    fn get_radio_display_limit(&self) -> Result<usize> {
        match self.get_value(&["radio", "display_limit"]) {
            Ok(Value::Number(n)) if n.as_u64().is_some_and(|v| v > 0) => {
                Ok(n.as_u64().unwrap_or(DEFAULT_DISPLAY_LIMIT as u64) as usize)
            }
            _ => {
                self.set_radio_display_limit(DEFAULT_DISPLAY_LIMIT)?;
                Ok(DEFAULT_DISPLAY_LIMIT)
            }
        }
    }

    fn set_radio_display_limit(&self, limit: usize) -> Result<()> {
        self.set_value(
            &["radio", "display_limit"],
            Value::Number(Number::from(limit as u64)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_radio_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();

        assert_eq!(config.get_radio_base_url().unwrap(), DEFAULT_BASE_URL);
        assert_eq!(config.get_radio_default_country().unwrap(), "India");
        assert_eq!(config.get_radio_display_limit().unwrap(), 50);
    }

    #[test]
    fn test_invalid_limit_falls_back_and_persists() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        config
            .set_value(&["radio", "display_limit"], Value::String("many".into()))
            .unwrap();

        assert_eq!(config.get_radio_display_limit().unwrap(), DEFAULT_DISPLAY_LIMIT);
        assert_eq!(
            config.get_value(&["radio", "display_limit"]).unwrap(),
            Value::Number(Number::from(50u64))
        );
    }
}
