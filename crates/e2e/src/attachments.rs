//! Browser diagnostics attached to the report on teardown

use tracing::warn;

use crate::browser::{BrowserDriver, ConsoleEntry};
use crate::error::E2eResult;
use crate::report::{AttachmentType, TestReport};

/// Attach a PNG screenshot of the current page
pub async fn add_screenshot(report: &TestReport, browser: &mut dyn BrowserDriver) -> E2eResult<()> {
    let png = browser.screenshot_png().await?;
    let name = format!(
        "screenshot_{}",
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    report.attach(name, AttachmentType::Png, png)
}

/// Attach the browser console log, one `LEVEL: message` line per entry
pub async fn add_logs(report: &TestReport, browser: &mut dyn BrowserDriver) -> E2eResult<()> {
    let entries = browser.browser_logs().await?;
    report.attach("browser_logs", AttachmentType::Text, format_logs(&entries))
}

/// Attach the page HTML
pub async fn add_html(report: &TestReport, browser: &mut dyn BrowserDriver) -> E2eResult<()> {
    let html = browser.page_source().await?;
    report.attach("page_source", AttachmentType::Html, html)
}

/// Attach an HTML page embedding the session recording
pub fn add_video(report: &TestReport, video_url: &str) -> E2eResult<()> {
    report.attach("test_video", AttachmentType::Html, video_embed(video_url))
}

/// Attach every artifact the browser can provide.
///
/// A failure to collect one artifact is logged and does not prevent the
/// others from being attached.
pub async fn attach_all_artifacts(
    report: &TestReport,
    browser: &mut dyn BrowserDriver,
    video_url: Option<&str>,
) {
    if let Err(e) = add_screenshot(report, browser).await {
        warn!("Could not attach screenshot: {}", e);
    }
    if let Err(e) = add_logs(report, browser).await {
        warn!("Could not attach browser logs: {}", e);
    }
    if let Err(e) = add_html(report, browser).await {
        warn!("Could not attach page source: {}", e);
    }
    if let Some(url) = video_url {
        if let Err(e) = add_video(report, url) {
            warn!("Could not attach video: {}", e);
        }
    }
}

pub fn format_logs(entries: &[ConsoleEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}: {}", e.level, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn video_embed(video_url: &str) -> String {
    format!(
        r#"<html><body><video width="100%" height="100%" controls autoplay><source src="{}" type="video/mp4"></video></body></html>"#,
        video_url
    )
}
