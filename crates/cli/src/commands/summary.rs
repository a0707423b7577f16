//! Coverage and feature summaries

use anyhow::Result;
use demoshop_common::{Catalog, Layer, Severity, TestCase};
use serde::Serialize;

use crate::output::{print_heading, print_item, print_list, OutputFormat, TableDisplay};

/// Per-feature counts
#[derive(Debug, Serialize)]
pub struct FeatureRow {
    pub feature: String,
    pub cases: usize,
    pub automated: usize,
    pub ids: Vec<String>,
}

impl TableDisplay for FeatureRow {
    fn headers() -> Vec<&'static str> {
        vec!["Feature", "Cases", "Automated", "IDs"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.feature.clone(),
            self.cases.to_string(),
            self.automated.to_string(),
            self.ids.join(", "),
        ]
    }
}

pub fn feature_rows(catalog: &Catalog) -> Vec<FeatureRow> {
    catalog
        .groups()
        .iter()
        .map(|group| FeatureRow {
            feature: group.name.clone(),
            cases: group.cases.len(),
            automated: group.cases.iter().filter(|c| c.automated).count(),
            ids: group.cases.iter().map(|c| c.id.clone()).collect(),
        })
        .collect()
}

pub fn stats(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    print_item(&catalog.coverage_stats(), format)
}

pub fn features(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    print_list(&feature_rows(catalog), format)
}

/// Named listing shown by `overview`
#[derive(Debug, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub cases: Vec<TestCase>,
}

pub fn sections(catalog: &Catalog) -> Vec<Section> {
    let owned = |cases: Vec<&TestCase>| cases.into_iter().cloned().collect::<Vec<_>>();
    vec![
        Section {
            title: "SMOKE-тесты",
            cases: owned(catalog.smoke()),
        },
        Section {
            title: "UI-тесты",
            cases: owned(catalog.by_layer(Layer::Ui)),
        },
        Section {
            title: "Критичные тесты",
            cases: owned(catalog.by_severity(Severity::Critical)),
        },
        Section {
            title: "Тесты регистрации",
            cases: owned(catalog.by_feature("Registration")),
        },
    ]
}

pub fn overview(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let sections = sections(catalog);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sections)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&sections)?),
        OutputFormat::Table | OutputFormat::Plain => {
            for section in &sections {
                print_heading(section.title, section.cases.len(), format);
                print_list(&section.cases, format)?;
            }
        }
    }
    Ok(())
}
