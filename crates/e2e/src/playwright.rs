//! Playwright browser automation
//!
//! A small Node driver script is started once per browser session. It keeps
//! a single page open and executes JSON commands read line by line from
//! stdin, answering each with one JSON line on stdout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::{Command, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tracing::{debug, info, warn};

use crate::browser::{BrowserDriver, ConsoleEntry, UiStep};
use crate::config::BrowserConfig;
use crate::error::{E2eError, E2eResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

const DRIVER_SCRIPT: &str = r##"
const readline = require('readline');
const playwright = require('playwright');

const config = JSON.parse(process.env.DEMOSHOP_DRIVER_CONFIG);

function reply(payload) {
  process.stdout.write(JSON.stringify(payload) + '\n');
}

(async () => {
  const browser = await playwright[config.browser].launch({ headless: config.headless });
  const context = await browser.newContext({
    viewport: { width: config.width, height: config.height },
  });
  const page = await context.newPage();
  page.setDefaultTimeout(config.timeout_ms);

  const consoleLog = [];
  page.on('console', (msg) => {
    consoleLog.push({ level: msg.type().toUpperCase(), message: msg.text() });
  });

  async function step(s) {
    switch (s.action) {
      case 'navigate':
        await page.goto(new URL(s.url, config.base_url).toString());
        break;
      case 'click':
        await page.click(s.selector);
        break;
      case 'fill':
        await page.fill(s.selector, s.value);
        break;
      case 'check':
        await page.check(s.selector);
        break;
      case 'wait':
        await page.waitForSelector(s.selector, { state: 'visible' });
        break;
      case 'assert_text': {
        await page.waitForSelector(s.selector);
        const text = await page.textContent(s.selector);
        if (!text || !text.includes(s.text)) {
          throw new Error(`${s.selector} does not contain ${JSON.stringify(s.text)}: ${JSON.stringify(text)}`);
        }
        break;
      }
      default:
        throw new Error(`unknown action ${s.action}`);
    }
  }

  const rl = readline.createInterface({ input: process.stdin });
  reply({ ok: true, value: 'ready' });

  for await (const line of rl) {
    let request;
    try {
      request = JSON.parse(line);
    } catch (e) {
      reply({ ok: false, error: e.message });
      continue;
    }
    try {
      switch (request.cmd) {
        case 'step':
          await step(request.step);
          reply({ ok: true });
          break;
        case 'screenshot':
          await page.screenshot({ path: request.path, fullPage: true });
          reply({ ok: true });
          break;
        case 'content':
          reply({ ok: true, value: await page.content() });
          break;
        case 'logs':
          reply({ ok: true, value: consoleLog });
          break;
        case 'quit':
          await browser.close();
          reply({ ok: true });
          process.exit(0);
        default:
          reply({ ok: false, error: `unknown command ${request.cmd}` });
      }
    } catch (e) {
      reply({ ok: false, error: e.message });
    }
  }

  await browser.close();
})().catch((e) => {
  reply({ ok: false, error: e.message });
  process.exit(1);
});
"##;

/// Settings handed to the driver script
#[derive(Debug, Clone, Serialize)]
struct DriverConfig<'a> {
    base_url: &'a str,
    browser: &'static str,
    headless: bool,
    width: u32,
    height: u32,
    timeout_ms: u64,
}

/// Commands understood by the driver script
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum DriverCommand<'a> {
    Step { step: &'a UiStep },
    Screenshot { path: String },
    Content,
    Logs,
    Quit,
}

#[derive(Debug, Deserialize)]
struct DriverReply {
    ok: bool,
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Browser session backed by a Playwright driver process
pub struct PlaywrightBrowser {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    scratch: tempfile::TempDir,
    reply_timeout: Duration,
    closed: bool,
}

impl PlaywrightBrowser {
    /// Start a browser for `base_url`
    pub async fn launch(base_url: &str, config: &BrowserConfig) -> E2eResult<Self> {
        Self::check_playwright_installed()?;

        let scratch = tempfile::tempdir()?;
        let script_path = scratch.path().join("driver.js");
        std::fs::write(&script_path, DRIVER_SCRIPT)?;

        let driver_config = DriverConfig {
            base_url,
            browser: config.browser.as_str(),
            headless: config.headless,
            width: config.window_width,
            height: config.window_height,
            timeout_ms: config.timeout().as_millis() as u64,
        };

        info!(
            "Launching {} ({}x{}, headless: {})",
            config.browser.as_str(),
            config.window_width,
            config.window_height,
            config.headless
        );

        // The script lives in a temp dir, so point module resolution back at
        // the project's node_modules.
        let node_path = std::env::current_dir()?.join("node_modules");
        let mut child = TokioCommand::new("node")
            .arg(&script_path)
            .env("DEMOSHOP_DRIVER_CONFIG", serde_json::to_string(&driver_config)?)
            .env("NODE_PATH", node_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| E2eError::Playwright("driver stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| E2eError::Playwright("driver stdout unavailable".to_string()))?;

        let mut browser = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            scratch,
            reply_timeout: config.timeout() + Duration::from_secs(30),
            closed: false,
        };

        browser.read_reply().await?;
        debug!("Playwright driver ready");
        Ok(browser)
    }

    /// Check if Playwright is installed
    fn check_playwright_installed() -> E2eResult<()> {
        let output = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    async fn request(&mut self, command: &DriverCommand<'_>) -> E2eResult<Option<serde_json::Value>> {
        if self.closed {
            return Err(E2eError::BrowserClosed);
        }
        let mut line = serde_json::to_string(command)?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        self.read_reply().await
    }

    async fn read_reply(&mut self) -> E2eResult<Option<serde_json::Value>> {
        loop {
            let next = tokio::time::timeout(self.reply_timeout, self.stdout.next_line())
                .await
                .map_err(|_| {
                    E2eError::Playwright(format!(
                        "no reply from driver within {:?}",
                        self.reply_timeout
                    ))
                })??;

            let line = next.ok_or_else(|| {
                E2eError::Playwright("driver exited unexpectedly".to_string())
            })?;

            match serde_json::from_str::<DriverReply>(&line) {
                Ok(reply) if reply.ok => return Ok(reply.value),
                Ok(reply) => {
                    return Err(E2eError::Playwright(
                        reply.error.unwrap_or_else(|| "unknown driver error".to_string()),
                    ))
                }
                Err(_) => debug!("driver: {}", line),
            }
        }
    }
}

#[async_trait]
impl BrowserDriver for PlaywrightBrowser {
    async fn open(&mut self, path: &str) -> E2eResult<()> {
        self.perform(&UiStep::navigate(path)).await
    }

    async fn perform(&mut self, step: &UiStep) -> E2eResult<()> {
        debug!("Executing step: {}", step.name());
        self.request(&DriverCommand::Step { step })
            .await
            .map(|_| ())
            .map_err(|e| match e {
                E2eError::Playwright(reason) => E2eError::StepFailed {
                    step: step.name(),
                    reason,
                },
                other => other,
            })
    }

    async fn screenshot_png(&mut self) -> E2eResult<Vec<u8>> {
        let path = self
            .scratch
            .path()
            .join(format!("{}.png", uuid::Uuid::new_v4()));
        self.request(&DriverCommand::Screenshot {
            path: path.to_string_lossy().to_string(),
        })
        .await?;
        let png = std::fs::read(&path)?;
        let _ = std::fs::remove_file(&path);
        Ok(png)
    }

    async fn browser_logs(&mut self) -> E2eResult<Vec<ConsoleEntry>> {
        let value = self.request(&DriverCommand::Logs).await?;
        Ok(match value {
            Some(value) => serde_json::from_value(value)?,
            None => Vec::new(),
        })
    }

    async fn page_source(&mut self) -> E2eResult<String> {
        let value = self.request(&DriverCommand::Content).await?;
        Ok(value
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default())
    }

    async fn quit(&mut self) -> E2eResult<()> {
        if self.closed {
            return Ok(());
        }
        if let Err(e) = self.request(&DriverCommand::Quit).await {
            warn!("Driver did not quit cleanly: {}", e);
        }
        self.closed = true;
        let _ = self.child.wait().await;
        Ok(())
    }
}
