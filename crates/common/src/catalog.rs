//! Queryable registry of test-case descriptors
//!
//! Entries are grouped by feature. Groups keep the order in which their
//! feature first appears, and entries keep declaration order inside a group,
//! so every query returns results in catalog order.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

use crate::builtin;
use crate::error::{CatalogError, CatalogResult};
use crate::types::{Layer, Severity, TestCase};

static BUILTIN: Lazy<Catalog> = Lazy::new(|| Catalog::grouped(builtin::test_cases()));

/// Test cases sharing one feature key
#[derive(Debug, Clone, Serialize)]
pub struct FeatureGroup {
    pub name: String,
    pub cases: Vec<TestCase>,
}

/// Aggregate automation figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageStats {
    pub total: usize,
    pub automated: usize,
    pub coverage_percentage: f64,
}

/// On-disk catalog document
#[derive(Debug, Deserialize)]
struct CatalogFile {
    cases: Vec<TestCase>,
}

/// Immutable test-case catalog
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    groups: Vec<FeatureGroup>,
}

impl Catalog {
    /// Build a catalog, rejecting empty or duplicate ids
    pub fn new(cases: Vec<TestCase>) -> CatalogResult<Self> {
        validate(&cases)?;
        Ok(Self::grouped(cases))
    }

    /// The catalog of the Demo Web Shop suite
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Parse a catalog from a YAML document with a `cases` list
    pub fn from_yaml(yaml: &str) -> CatalogResult<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::new(file.cases)
    }

    /// Parse a catalog from a YAML file
    pub fn from_file(path: &Path) -> CatalogResult<Self> {
        let content = std::fs::read_to_string(path)?;
        debug!("Loading catalog from {}", path.display());
        Self::from_yaml(&content)
    }

    fn grouped(cases: Vec<TestCase>) -> Self {
        let mut groups: Vec<FeatureGroup> = Vec::new();
        for case in cases {
            match groups.iter_mut().find(|g| g.name == case.feature) {
                Some(group) => group.cases.push(case),
                None => groups.push(FeatureGroup {
                    name: case.feature.clone(),
                    cases: vec![case],
                }),
            }
        }
        Self { groups }
    }

    /// All entries in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &TestCase> {
        self.groups.iter().flat_map(|g| g.cases.iter())
    }

    pub fn groups(&self) -> &[FeatureGroup] {
        &self.groups
    }

    /// Feature keys in catalog order
    pub fn features(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.cases.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count all and automated entries.
    ///
    /// An empty catalog reports 0% coverage.
    pub fn coverage_stats(&self) -> CoverageStats {
        let mut total = 0;
        let mut automated = 0;

        for case in self.iter() {
            total += 1;
            if case.automated {
                automated += 1;
            }
        }

        let coverage_percentage = if total == 0 {
            0.0
        } else {
            automated as f64 / total as f64 * 100.0
        };

        CoverageStats {
            total,
            automated,
            coverage_percentage,
        }
    }

    /// First entry with exactly this id
    pub fn by_id(&self, id: &str) -> Option<&TestCase> {
        self.iter().find(|c| c.id == id)
    }

    pub fn by_tag(&self, tag: &str) -> Vec<&TestCase> {
        self.iter().filter(|c| c.has_tag(tag)).collect()
    }

    pub fn by_layer(&self, layer: Layer) -> Vec<&TestCase> {
        self.iter().filter(|c| c.layer == layer).collect()
    }

    pub fn by_severity(&self, severity: Severity) -> Vec<&TestCase> {
        self.iter().filter(|c| c.severity == severity).collect()
    }

    /// Entries of one feature group; empty when the feature is unknown
    pub fn by_feature(&self, feature: &str) -> Vec<&TestCase> {
        self.groups
            .iter()
            .find(|g| g.name == feature)
            .map(|g| g.cases.iter().collect())
            .unwrap_or_default()
    }

    pub fn smoke(&self) -> Vec<&TestCase> {
        self.by_tag("smoke")
    }

    /// Re-check the id invariants of an already built catalog
    pub fn validate(&self) -> CatalogResult<()> {
        let cases: Vec<TestCase> = self.iter().cloned().collect();
        validate(&cases)
    }
}

fn validate(cases: &[TestCase]) -> CatalogResult<()> {
    let mut seen = HashSet::new();
    for case in cases {
        if case.id.trim().is_empty() {
            return Err(CatalogError::MissingField {
                id: case.title.clone(),
                field: "id",
            });
        }
        if case.feature.trim().is_empty() {
            return Err(CatalogError::MissingField {
                id: case.id.clone(),
                field: "feature",
            });
        }
        if !seen.insert(case.id.as_str()) {
            return Err(CatalogError::DuplicateId(case.id.clone()));
        }
        if case.tags.is_empty() {
            warn!("Test case {} has no tags and will not match any tag filter", case.id);
        }
    }
    Ok(())
}
