//! Startup configuration, resolved once from the environment

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Result, bail};

use crate::model::{PREFERENCES_FILE, SUBSCRIPTIONS_CACHE_FILE};

const DEFAULT_ACCOUNTS_FILE: &str = ".cache/accounts.json";
const DEFAULT_DOCUMENTS_DIR: &str = "Videos";

/// Layout family the UI adapts its toolbars to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlatformProfile {
    Phone,
    #[default]
    Desktop,
    Tv,
}

impl FromStr for PlatformProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phone" | "ios" => Ok(Self::Phone),
            "desktop" | "macos" => Ok(Self::Desktop),
            "tv" | "tvos" => Ok(Self::Tv),
            other => bail!("unknown platform profile '{}'", other),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub platform: PlatformProfile,
    pub catalog_path: Option<PathBuf>,
    pub accounts_path: PathBuf,
    pub documents_dir: PathBuf,
    pub preferences_path: PathBuf,
    pub subscriptions_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            platform: PlatformProfile::default(),
            catalog_path: None,
            accounts_path: PathBuf::from(DEFAULT_ACCOUNTS_FILE),
            documents_dir: PathBuf::from(DEFAULT_DOCUMENTS_DIR),
            preferences_path: PathBuf::from(PREFERENCES_FILE),
            subscriptions_path: PathBuf::from(SUBSCRIPTIONS_CACHE_FILE),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(platform) = lookup("VIDTABS_PLATFORM") {
            config.platform = platform.parse()?;
        }
        config.catalog_path = lookup("VIDTABS_CATALOG").map(PathBuf::from);
        if let Some(path) = lookup("VIDTABS_ACCOUNTS") {
            config.accounts_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("VIDTABS_DOCUMENTS") {
            config.documents_dir = PathBuf::from(dir);
        }
        tracing::debug!(?config, "Configuration resolved");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.platform, PlatformProfile::Desktop);
        assert!(config.catalog_path.is_none());
        assert_eq!(config.accounts_path, PathBuf::from(".cache/accounts.json"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("VIDTABS_PLATFORM", "TV"),
            ("VIDTABS_CATALOG", "fixtures/catalog.json"),
            ("VIDTABS_DOCUMENTS", "/tmp/videos"),
        ])
        .unwrap();
        assert_eq!(config.platform, PlatformProfile::Tv);
        assert_eq!(config.catalog_path, Some(PathBuf::from("fixtures/catalog.json")));
        assert_eq!(config.documents_dir, PathBuf::from("/tmp/videos"));
    }

    #[test]
    fn test_unknown_platform_is_rejected() {
        assert!(config_from(&[("VIDTABS_PLATFORM", "watch")]).is_err());
    }
}
