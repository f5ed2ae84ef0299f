use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::html::CONTENT_SELECTOR;

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ScraperConfig {
    pub site: SiteSettings,
    pub output: OutputSettings,
    pub http: HttpSettings,
}

/// The remote site the tasks come from
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SiteSettings {
    pub base_url: String,
    pub content_selector: String,
}

/// Where cached tasks are written
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    pub root: PathBuf,
    pub extension: String,
}

/// HTTP client settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HttpSettings {
    pub user_agent: String,
    pub probe_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            base_url: "https://adventofcode.com".to_string(),
            content_selector: CONTENT_SELECTOR.to_string(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extension: "md".to_string(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: format!("aoc-scraper/{}", env!("CARGO_PKG_VERSION")),
            probe_timeout_secs: 5,
            fetch_timeout_secs: 30,
        }
    }
}

impl HttpSettings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl ScraperConfig {
    /// Get the path to the default configuration file
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "aoc-scraper", "aoc-scraper")
            .map(|dirs| dirs.config_dir().join("default.yaml"))
    }

    /// Load `path` if given, else the default file if present, else the built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::load_from_file(&path)?,
                None => {
                    debug!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let contents = fs::read_to_string(path)
            .context(format!("Failed to read configuration file: {}", path.display()))?;

        Self::from_yaml(&contents)
            .context(format!("Failed to parse configuration file: {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.site.base_url)
            .context(format!("Invalid base URL: {}", self.site.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("Base URL must be http or https: {}", self.site.base_url);
        }

        scraper::Selector::parse(&self.site.content_selector)
            .map_err(|e| anyhow::anyhow!("Invalid content selector '{}': {:?}", self.site.content_selector, e))?;

        if self.output.extension.is_empty() {
            anyhow::bail!("Output extension must not be empty");
        }

        if self.http.probe_timeout_secs == 0 || self.http.fetch_timeout_secs == 0 {
            anyhow::bail!("HTTP timeouts must be at least one second");
        }

        Ok(())
    }

    /// Scheme, host and port of the base URL, used as the prefix for relative links
    pub fn site_origin(&self) -> Result<String> {
        let url = Url::parse(&self.site.base_url)
            .context(format!("Invalid base URL: {}", self.site.base_url))?;

        Ok(url.origin().ascii_serialization())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ScraperConfig::default();
        config.validate().unwrap();

        assert_eq!(config.site.base_url, "https://adventofcode.com");
        assert_eq!(config.site.content_selector, "article.day-desc");
        assert_eq!(config.output.extension, "md");
        assert_eq!(config.http.probe_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ScraperConfig::from_yaml(
            "output:\n  root: /tmp/aoc\nhttp:\n  fetch_timeout_secs: 10\n",
        )
        .unwrap();

        assert_eq!(config.output.root, PathBuf::from("/tmp/aoc"));
        assert_eq!(config.output.extension, "md");
        assert_eq!(config.http.fetch_timeout_secs, 10);
        assert_eq!(config.http.probe_timeout_secs, 5);
        assert_eq!(config.site, SiteSettings::default());
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "site:\n  base_url: http://localhost:8080\n").unwrap();

        let config = ScraperConfig::load(Some(&path)).unwrap();
        assert_eq!(config.site.base_url, "http://localhost:8080");

        assert!(ScraperConfig::load(Some(&dir.path().join("missing.yaml"))).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = ScraperConfig::default();
        config.site.base_url = "ftp://adventofcode.com".to_string();
        assert!(config.validate().is_err());

        let mut config = ScraperConfig::default();
        config.site.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = ScraperConfig::default();
        config.site.content_selector = "article[[".to_string();
        assert!(config.validate().is_err());

        let mut config = ScraperConfig::default();
        config.output.extension.clear();
        assert!(config.validate().is_err());

        let mut config = ScraperConfig::default();
        config.http.probe_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_site_origin() {
        let mut config = ScraperConfig::default();
        assert_eq!(config.site_origin().unwrap(), "https://adventofcode.com");

        config.site.base_url = "http://127.0.0.1:4000/mirror/".to_string();
        assert_eq!(config.site_origin().unwrap(), "http://127.0.0.1:4000");
    }
}
