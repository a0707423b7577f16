//! Core types for the test-case catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// Surface a test case exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    #[serde(rename = "UI")]
    Ui,
    #[serde(rename = "API")]
    Api,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Ui => "UI",
            Layer::Api => "API",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layer {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UI" => Ok(Layer::Ui),
            "API" => Ok(Layer::Api),
            other => Err(CatalogError::UnknownLayer(other.to_string())),
        }
    }
}

/// Declared business impact of a failing scenario.
///
/// The levels are the ones the report understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Blocker,
    Critical,
    Normal,
    Minor,
    Trivial,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Blocker => "blocker",
            Severity::Critical => "critical",
            Severity::Normal => "normal",
            Severity::Minor => "minor",
            Severity::Trivial => "trivial",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Normal
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blocker" => Ok(Severity::Blocker),
            "critical" => Ok(Severity::Critical),
            "normal" => Ok(Severity::Normal),
            "minor" => Ok(Severity::Minor),
            "trivial" => Ok(Severity::Trivial),
            other => Err(CatalogError::UnknownSeverity(other.to_string())),
        }
    }
}

/// One declarative test-case record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Unique code such as `REG-001`
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub preconditions: Vec<String>,

    #[serde(default)]
    pub steps: Vec<String>,

    #[serde(default)]
    pub expected_result: String,

    #[serde(default)]
    pub severity: Severity,

    pub layer: Layer,

    /// Grouping key
    pub feature: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default = "default_automated")]
    pub automated: bool,

    /// Name of the automated test implementing this case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automation: Option<String>,
}

fn default_automated() -> bool {
    true
}

impl TestCase {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
