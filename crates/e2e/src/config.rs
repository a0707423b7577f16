//! Suite configuration
//!
//! Loaded from `demoshop.toml` when present, then overridden by
//! `DEMOSHOP_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::data::TestUser;
use crate::error::{E2eError, E2eResult};
use crate::playwright::Browser;

pub const DEFAULT_BASE_URL: &str = "https://demowebshop.tricentis.com";
pub const DEFAULT_CONFIG_FILE: &str = "demoshop.toml";
pub const LATEST_REPORT_FILE: &str = "latest-report.json";

/// Suite configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    pub site: SiteConfig,
    pub user: TestUser,
    pub browser: BrowserConfig,
    pub report: ReportConfig,
}

/// Target shop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Browser fixture settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub browser: Browser,
    pub window_width: u32,
    pub window_height: u32,
    /// Element wait timeout in seconds
    pub timeout_secs: u64,
    pub headless: bool,
    /// Recording linked from the report, if the grid provides one
    pub video_url: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            browser: Browser::Chromium,
            window_width: 1920,
            window_height: 1080,
            timeout_secs: 10,
            headless: true,
            video_url: None,
        }
    }
}

impl BrowserConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Report output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub results_dir: PathBuf,
    /// Summary from a previous run, attached to each test when present
    pub latest_report: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("allure-results"),
            latest_report: Path::new("allure-results").join(LATEST_REPORT_FILE),
        }
    }
}

impl SuiteConfig {
    /// Load configuration from file, falling back to defaults
    pub fn load(path: &Path) -> E2eResult<Self> {
        if path.exists() {
            debug!("Loading suite configuration from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Load `DEMOSHOP_CONFIG` (or `demoshop.toml`) and apply environment overrides
    pub fn from_env() -> E2eResult<Self> {
        let path = std::env::var("DEMOSHOP_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = Self::load(&path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from variables resolved by `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> E2eResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DEMOSHOP_BASE_URL") {
            self.site.base_url = url;
        }
        if let Some(email) = lookup("DEMOSHOP_USER_EMAIL") {
            self.user.email = email;
        }
        if let Some(password) = lookup("DEMOSHOP_USER_PASSWORD") {
            self.user.password = password;
        }
        // The summary moves with the results directory unless set on its own
        if let Some(dir) = lookup("DEMOSHOP_RESULTS_DIR") {
            self.report.results_dir = PathBuf::from(dir);
            self.report.latest_report = self.report.results_dir.join(LATEST_REPORT_FILE);
        }
        if let Some(path) = lookup("DEMOSHOP_LATEST_REPORT") {
            self.report.latest_report = PathBuf::from(path);
        }
        if let Some(headless) = lookup("DEMOSHOP_HEADLESS") {
            self.browser.headless = match headless.as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(E2eError::Config(format!(
                        "DEMOSHOP_HEADLESS must be a boolean, got {other:?}"
                    )))
                }
            };
        }

        url::Url::parse(&self.site.base_url)?;
        Ok(())
    }
}
