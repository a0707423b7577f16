//! Browser automation abstraction used by the UI suites

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::E2eResult;

/// One browser interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UiStep {
    /// Navigate to a path relative to the base URL
    Navigate { url: String },

    Click { selector: String },

    Fill { selector: String, value: String },

    /// Tick a checkbox or radio button
    Check { selector: String },

    /// Wait until an element is visible
    Wait { selector: String },

    /// Assert that an element contains the given text
    AssertText { selector: String, text: String },
}

impl UiStep {
    pub fn navigate(url: impl Into<String>) -> Self {
        UiStep::Navigate { url: url.into() }
    }

    pub fn click(selector: impl Into<String>) -> Self {
        UiStep::Click {
            selector: selector.into(),
        }
    }

    pub fn fill(selector: impl Into<String>, value: impl Into<String>) -> Self {
        UiStep::Fill {
            selector: selector.into(),
            value: value.into(),
        }
    }

    pub fn check(selector: impl Into<String>) -> Self {
        UiStep::Check {
            selector: selector.into(),
        }
    }

    pub fn wait(selector: impl Into<String>) -> Self {
        UiStep::Wait {
            selector: selector.into(),
        }
    }

    pub fn assert_text(selector: impl Into<String>, text: impl Into<String>) -> Self {
        UiStep::AssertText {
            selector: selector.into(),
            text: text.into(),
        }
    }

    /// Short label used in logs and report steps
    pub fn name(&self) -> String {
        match self {
            UiStep::Navigate { url } => format!("navigate:{}", url),
            UiStep::Click { selector } => format!("click:{}", selector),
            UiStep::Fill { selector, .. } => format!("fill:{}", selector),
            UiStep::Check { selector } => format!("check:{}", selector),
            UiStep::Wait { selector } => format!("wait:{}", selector),
            UiStep::AssertText { selector, .. } => format!("assert:{}", selector),
        }
    }
}

/// Parse a YAML list of steps
pub fn parse_steps(yaml: &str) -> E2eResult<Vec<UiStep>> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// A browser console message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub level: String,
    pub message: String,
}

/// A live browser page the suites drive and collect diagnostics from
#[async_trait]
pub trait BrowserDriver: Send {
    /// Open a path relative to the base URL
    async fn open(&mut self, path: &str) -> E2eResult<()>;

    async fn perform(&mut self, step: &UiStep) -> E2eResult<()>;

    async fn screenshot_png(&mut self) -> E2eResult<Vec<u8>>;

    async fn browser_logs(&mut self) -> E2eResult<Vec<ConsoleEntry>>;

    async fn page_source(&mut self) -> E2eResult<String>;

    async fn quit(&mut self) -> E2eResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps_from_yaml() {
        let yaml = r#"
- action: navigate
  url: /login
- action: fill
  selector: '#Email'
  value: user@example.com
- action: check
  selector: '#RememberMe'
- action: assert_text
  selector: .account
  text: user@example.com
"#;
        let steps = parse_steps(yaml).unwrap();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0], UiStep::navigate("/login"));
        assert_eq!(steps[1].name(), "fill:#Email");
        assert_eq!(steps[3], UiStep::assert_text(".account", "user@example.com"));

        assert!(parse_steps("- action: hover\n  selector: a").is_err());
    }
}
