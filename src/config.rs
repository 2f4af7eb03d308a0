//! Optional YAML configuration.
//!
//! ```yaml
//! http:
//!   timeout_secs: 20
//!   user_agent: "contest_harvest/0.1"
//! defaults:
//!   language: en
//!   full_list: false
//! sites:
//!   codeforces:
//!     rid: 1
//!   atcoder:
//!     rid: 93
//!     timezone: Asia/Tokyo
//! ```
//!
//! Precedence when building a run context: command-line flags, then the
//! `sites.<adapter>` entry, then `defaults`, then the adapter's own defaults.

use crate::context::ContextOptions;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_secs: 30,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Defaults {
    pub language: Option<String>,
    pub full_list: bool,
}

/// Per-adapter overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    pub url: Option<String>,
    pub host: Option<String>,
    pub rid: Option<i64>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub defaults: Defaults,
    pub sites: BTreeMap<String, SiteConfig>,
}

impl Config {
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let config = Self::from_yaml(&text).map_err(|source| ConfigError::Yaml {
            path: display,
            source,
        })?;
        info!(sites = config.sites.len(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(text)
    }

    /// Context options for `adapter` from the file alone.
    pub fn context_options(&self, adapter: &str) -> ContextOptions {
        let site = self.sites.get(adapter).cloned().unwrap_or_default();
        ContextOptions {
            url: site.url,
            host: site.host,
            rid: site.rid,
            language: self.defaults.language.clone(),
            timezone: site.timezone,
            full_list: self.defaults.full_list,
            today: None,
        }
    }
}

impl ContextOptions {
    /// Layer `overrides` on top of `self`; set values in `overrides` win.
    pub fn overlay(self, overrides: ContextOptions) -> ContextOptions {
        ContextOptions {
            url: overrides.url.or(self.url),
            host: overrides.host.or(self.host),
            rid: overrides.rid.or(self.rid),
            language: overrides.language.or(self.language),
            timezone: overrides.timezone.or(self.timezone),
            full_list: overrides.full_list || self.full_list,
            today: overrides.today.or(self.today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
http:
  timeout_secs: 5
defaults:
  language: ru
sites:
  atcoder:
    rid: 93
    timezone: Asia/Tokyo
"#;

    #[test]
    fn test_parse_partial_config() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.user_agent, HttpConfig::default().user_agent);
        assert_eq!(config.defaults.language.as_deref(), Some("ru"));
        assert_eq!(config.sites["atcoder"].rid, Some(93));
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_context_options_for_known_and_unknown_sites() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        let atcoder = config.context_options("atcoder");
        assert_eq!(atcoder.rid, Some(93));
        assert_eq!(atcoder.timezone.as_deref(), Some("Asia/Tokyo"));
        assert_eq!(atcoder.language.as_deref(), Some("ru"));

        let other = config.context_options("dmoj");
        assert_eq!(other.rid, None);
        assert_eq!(other.language.as_deref(), Some("ru"));
    }

    #[test]
    fn test_overlay_prefers_overrides() {
        let base = ContextOptions {
            rid: Some(1),
            timezone: Some("UTC".into()),
            ..Default::default()
        };
        let cli = ContextOptions {
            rid: Some(2),
            full_list: true,
            ..Default::default()
        };
        let merged = base.overlay(cli);
        assert_eq!(merged.rid, Some(2));
        assert_eq!(merged.timezone.as_deref(), Some("UTC"));
        assert!(merged.full_list);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.sites.len(), 1);
    }

    #[test]
    fn test_load_reports_bad_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"http: [not, a, map]").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn test_load_reports_missing_file() {
        assert!(matches!(
            Config::load("/definitely/not/here.yaml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
