//! Demo Web Shop E2E Test Framework
//!
//! This crate provides what the API and UI suites under `tests/` are built
//! from:
//! - A session-keeping HTTP client with one method per shop operation
//! - A Playwright-backed browser driver controlled over a JSON line protocol
//! - An Allure-compatible report with steps and attachments
//! - A per-test browser fixture that attaches diagnostics on teardown
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Suites (tests/*.rs)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  DemoWebShopApi            BrowserSession<D>                │
//! │    ├── login/register        ├── start() -> open base URL   │
//! │    ├── cart ops              ├── run(title, [UiStep])       │
//! │    ├── profile/search/...    └── finish(outcome)            │
//! │    └── auth_token()                └── attach_all_artifacts │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Report -> TestReport (steps, attachments, result.json)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod attachments;
pub mod browser;
pub mod config;
pub mod data;
pub mod error;
pub mod fixture;
pub mod playwright;
pub mod report;

pub use api::{ApiResponse, DemoWebShopApi};
pub use browser::{BrowserDriver, ConsoleEntry, UiStep};
pub use config::SuiteConfig;
pub use error::{E2eError, E2eResult};
pub use fixture::BrowserSession;
pub use report::{AttachmentType, Report, TestMeta, TestReport, LATEST_REPORT_ATTACHMENT};

/// Install a `RUST_LOG`-driven subscriber for test binaries.
///
/// Safe to call from every test; only the first call installs it.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}
