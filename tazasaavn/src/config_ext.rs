//! Extension pour intégrer le proxy de recherche dans tazaconfig

use crate::client::DEFAULT_BASE_URL;
use anyhow::Result;
use serde_yaml::Value;
use tazaconfig::Config;

/// Extension trait adding song-search settings to `tazaconfig::Config`
pub trait SaavnConfigExt {
    /// Whether catalog songs are searched (default: true)
    fn get_saavn_enabled(&self) -> Result<bool>;

    fn set_saavn_enabled(&self, enabled: bool) -> Result<()>;

    /// Base URL of the song-search proxy
    fn get_saavn_base_url(&self) -> Result<String>;

    fn set_saavn_base_url(&self, url: String) -> Result<()>;
}

impl SaavnConfigExt for Config {
    fn get_saavn_enabled(&self) -> Result<bool> {
        match self.get_value(&["sources", "saavn", "enabled"]) {
            Ok(Value::Bool(b)) => Ok(b),
            _ => {
                // Default: enabled
                self.set_saavn_enabled(true)?;
                Ok(true)
            }
        }
    }

    fn set_saavn_enabled(&self, enabled: bool) -> Result<()> {
        self.set_value(&["sources", "saavn", "enabled"], Value::Bool(enabled))
    }

    fn get_saavn_base_url(&self) -> Result<String> {
        match self.get_value(&["sources", "saavn", "base_url"]) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
            _ => {
                self.set_saavn_base_url(DEFAULT_BASE_URL.to_string())?;
                Ok(DEFAULT_BASE_URL.to_string())
            }
        }
    }

    fn set_saavn_base_url(&self, url: String) -> Result<()> {
        self.set_value(&["sources", "saavn", "base_url"], Value::String(url))
    }
}
