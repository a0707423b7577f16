//! Per-test browser fixture
//!
//! Opens a configured browser on the shop's start page and, when the test
//! is done, attaches screenshot, console log, page HTML and video before
//! closing it. The previous run's summary is attached by `Report` when the
//! test starts.

use std::sync::Arc;
use tracing::{info, warn};

use crate::attachments::attach_all_artifacts;
use crate::browser::{BrowserDriver, UiStep};
use crate::config::SuiteConfig;
use crate::error::E2eResult;
use crate::playwright::PlaywrightBrowser;
use crate::report::TestReport;

/// One browser lifecycle, scoped to a single test
pub struct BrowserSession<D: BrowserDriver> {
    driver: D,
    report: Arc<TestReport>,
    video_url: Option<String>,
}

impl BrowserSession<PlaywrightBrowser> {
    /// Launch Playwright with the configured window and open the shop
    pub async fn start(config: &SuiteConfig, report: Arc<TestReport>) -> E2eResult<Self> {
        let driver = PlaywrightBrowser::launch(&config.site.base_url, &config.browser).await?;
        Self::with_driver(driver, config, report).await
    }
}

impl<D: BrowserDriver> BrowserSession<D> {
    pub async fn with_driver(
        mut driver: D,
        config: &SuiteConfig,
        report: Arc<TestReport>,
    ) -> E2eResult<Self> {
        driver.open("").await?;
        info!("Browser opened at {}", config.site.base_url);
        Ok(Self {
            driver,
            report,
            video_url: config.browser.video_url.clone(),
        })
    }

    pub fn report(&self) -> &TestReport {
        &self.report
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Run browser steps inside one report step
    pub async fn run(&mut self, title: &str, steps: &[UiStep]) -> E2eResult<()> {
        let report = Arc::clone(&self.report);
        let guard = report.step(title);
        for step in steps {
            if let Err(e) = self.driver.perform(step).await {
                guard.fail();
                return Err(e);
            }
        }
        Ok(())
    }

    /// Attach artifacts, record the test outcome and close the browser.
    ///
    /// A browser that fails to close is logged; the outcome is returned as is.
    pub async fn finish<T>(mut self, outcome: E2eResult<T>) -> E2eResult<T> {
        attach_all_artifacts(&self.report, &mut self.driver, self.video_url.as_deref()).await;
        match &outcome {
            Ok(_) => self.report.pass(),
            Err(e) => self.report.fail(e.to_string()),
        }
        if let Err(e) = self.driver.quit().await {
            warn!("Browser did not close cleanly: {}", e);
        }
        outcome
    }
}
