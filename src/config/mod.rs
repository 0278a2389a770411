//! Configuration management for the planner
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files. A single [`Config`] value is built once and handed
//! to the fetcher and the course at construction.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default site root that lecture references are relative to
pub const DEFAULT_BASE_URL: &str = "https://ufind.univie.ac.at/de/";

/// Default page listing every course of the catalog
pub const DEFAULT_CATALOG_URL: &str = "https://ufind.univie.ac.at/de/vvz.html";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target site configuration
    pub site: SiteConfig,

    /// HTTP fetch configuration
    pub fetch: FetchConfig,

    /// Fan-out configuration
    pub fanout: FanOutConfig,

    /// Report configuration
    pub report: ReportConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Target site urls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base url lecture references and course links are joined onto
    pub base_url: String,

    /// Url of the course catalog page
    pub catalog_url: String,
}

/// HTTP fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Connect/read timeout in seconds, applied to every request
    pub timeout_secs: u64,

    /// User agent header; none is sent when unset
    pub user_agent: Option<String>,
}

/// Fan-out settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FanOutConfig {
    /// Upper bound on simultaneously running lecture tasks (unbounded when unset)
    pub max_in_flight: Option<usize>,
}

/// Report settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Number of upcoming lectures to print
    pub top_n: usize,

    /// Minimum progress increase, in percentage points, between progress lines
    pub progress_step: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,

    /// Print full error chains on fatal failures
    pub debug: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            catalog_url: String::from(DEFAULT_CATALOG_URL),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            user_agent: None,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            progress_step: 10.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("warn"),
            format: String::from("text"),
            debug: false,
        }
    }
}

impl SiteConfig {
    /// Parsed base url
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.base_url)
    }
}

impl FetchConfig {
    /// Request timeout as Duration
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let base_url =
            std::env::var("PLANNER_BASE_URL").unwrap_or(defaults.site.base_url);

        let catalog_url =
            std::env::var("PLANNER_CATALOG_URL").unwrap_or(defaults.site.catalog_url);

        let timeout_secs = std::env::var("PLANNER_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.fetch.timeout_secs);

        let user_agent = std::env::var("PLANNER_USER_AGENT").ok();

        let max_in_flight = std::env::var("PLANNER_MAX_IN_FLIGHT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok());

        let top_n = std::env::var("PLANNER_TOP_N")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.report.top_n);

        let progress_step = std::env::var("PLANNER_PROGRESS_STEP")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(defaults.report.progress_step);

        let level =
            std::env::var("PLANNER_LOG_LEVEL").unwrap_or(defaults.logging.level);

        let format =
            std::env::var("PLANNER_LOG_FORMAT").unwrap_or(defaults.logging.format);

        let debug = std::env::var("PLANNER_DEBUG")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            site: SiteConfig {
                base_url,
                catalog_url,
            },
            fetch: FetchConfig {
                timeout_secs,
                user_agent,
            },
            fanout: FanOutConfig { max_in_flight },
            report: ReportConfig {
                top_n,
                progress_step,
            },
            logging: LoggingConfig {
                level,
                format,
                debug,
            },
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.site
            .base_url()
            .with_context(|| format!("Invalid base_url: {}", self.site.base_url))?;

        Url::parse(&self.site.catalog_url)
            .with_context(|| format!("Invalid catalog_url: {}", self.site.catalog_url))?;

        if self.fetch.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than 0");
        }

        if self.fanout.max_in_flight == Some(0) {
            anyhow::bail!("max_in_flight must be greater than 0 when set");
        }

        if self.report.top_n == 0 {
            anyhow::bail!("top_n must be greater than 0");
        }

        if !(0.0..=100.0).contains(&self.report.progress_step) {
            anyhow::bail!("progress_step must be between 0 and 100");
        }

        Ok(())
    }
}
