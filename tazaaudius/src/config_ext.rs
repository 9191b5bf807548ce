//! Extension pour intégrer le catalogue indépendant dans tazaconfig

use crate::client::{DEFAULT_BASE_URL, DEFAULT_SEARCH_LIMIT};
use anyhow::Result;
use serde_yaml::{Number, Value};
use tazaconfig::Config;

/// Extension trait adding independent catalog settings to `tazaconfig::Config`
pub trait AudiusConfigExt {
    /// Whether independent tracks are searched (default: true)
    fn get_audius_enabled(&self) -> Result<bool>;

    fn set_audius_enabled(&self, enabled: bool) -> Result<()>;

    /// Base URL of the discovery node
    fn get_audius_base_url(&self) -> Result<String>;

    fn set_audius_base_url(&self, url: String) -> Result<()>;

    /// Page size of a search (default: 20)
    fn get_audius_search_limit(&self) -> Result<u32>;

    fn set_audius_search_limit(&self, limit: u32) -> Result<()>;
}

impl AudiusConfigExt for Config {
    fn get_audius_enabled(&self) -> Result<bool> {
        match self.get_value(&["sources", "audius", "enabled"]) {
            Ok(Value::Bool(b)) => Ok(b),
            _ => {
                self.set_audius_enabled(true)?;
                Ok(true)
            }
        }
    }

    fn set_audius_enabled(&self, enabled: bool) -> Result<()> {
        self.set_value(&["sources", "audius", "enabled"], Value::Bool(enabled))
    }

    fn get_audius_base_url(&self) -> Result<String> {
        match self.get_value(&["sources", "audius", "base_url"]) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
            _ => {
                self.set_audius_base_url(DEFAULT_BASE_URL.to_string())?;
                Ok(DEFAULT_BASE_URL.to_string())
            }
        }
    }

    fn set_audius_base_url(&self, url: String) -> Result<()> {
        self.set_value(&["sources", "audius", "base_url"], Value::String(url))
    }

    fn get_audius_search_limit(&self) -> Result<u32> {
        let limit = match self.get_value(&["sources", "audius", "search_limit"]) {
            Ok(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            _ => None,
        };
        match limit {
            Some(limit) if limit > 0 => Ok(limit),
            _ => {
                self.set_audius_search_limit(DEFAULT_SEARCH_LIMIT)?;
                Ok(DEFAULT_SEARCH_LIMIT)
            }
        }
    }

    fn set_audius_search_limit(&self, limit: u32) -> Result<()> {
        self.set_value(
            &["sources", "audius", "search_limit"],
            Value::Number(Number::from(limit)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_audius_settings() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();

        assert!(config.get_audius_enabled().unwrap());
        assert_eq!(config.get_audius_search_limit().unwrap(), 20);

        config.set_audius_search_limit(0).unwrap();
        assert_eq!(config.get_audius_search_limit().unwrap(), DEFAULT_SEARCH_LIMIT);
    }
}
