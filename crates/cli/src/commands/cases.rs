//! Test case listings

use anyhow::{bail, Result};
use clap::Args;
use demoshop_common::{Catalog, Layer, Severity, TestCase};

use crate::output::{print_list, render_case, OutputFormat};

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only cases carrying this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Only cases of this layer (UI, API)
    #[arg(long)]
    pub layer: Option<Layer>,

    /// Only cases of this severity (blocker, critical, normal, minor, trivial)
    #[arg(long)]
    pub severity: Option<Severity>,

    /// Only cases of this feature
    #[arg(long)]
    pub feature: Option<String>,
}

impl ListArgs {
    fn matches(&self, case: &TestCase) -> bool {
        self.tag.as_deref().map_or(true, |tag| case.has_tag(tag))
            && self.layer.map_or(true, |layer| case.layer == layer)
            && self.severity.map_or(true, |severity| case.severity == severity)
            && self.feature.as_deref().map_or(true, |feature| case.feature == feature)
    }
}

/// Cases matching every given filter, in catalog order
pub fn filter<'a>(catalog: &'a Catalog, args: &ListArgs) -> Vec<&'a TestCase> {
    catalog.iter().filter(|case| args.matches(case)).collect()
}

pub fn list(catalog: &Catalog, args: &ListArgs, format: OutputFormat) -> Result<()> {
    let cases: Vec<TestCase> = filter(catalog, args).into_iter().cloned().collect();
    print_list(&cases, format)
}

pub fn smoke(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let cases: Vec<TestCase> = catalog.smoke().into_iter().cloned().collect();
    print_list(&cases, format)
}

pub fn show(catalog: &Catalog, id: &str, format: OutputFormat) -> Result<()> {
    let Some(case) = catalog.by_id(id) else {
        bail!("No test case with id {}", id);
    };
    println!("{}", render_case(case, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(cases: Vec<&TestCase>) -> Vec<&str> {
        cases.into_iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_no_filters_lists_everything() {
        let catalog = Catalog::builtin();
        assert_eq!(filter(catalog, &ListArgs::default()).len(), catalog.len());
    }

    #[test]
    fn test_filters_combine() {
        let catalog = Catalog::builtin();
        let args = ListArgs {
            tag: Some("smoke".to_string()),
            feature: Some("Shopping Cart".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(filter(catalog, &args)), vec!["CART-001", "CART-002"]);

        let args = ListArgs {
            layer: Some(Layer::Api),
            ..Default::default()
        };
        assert_eq!(ids(filter(catalog, &args)), vec!["API-001"]);

        let args = ListArgs {
            severity: Some(Severity::Blocker),
            ..Default::default()
        };
        assert_eq!(ids(filter(catalog, &args)), vec!["LOGIN-001"]);
    }

    #[test]
    fn test_show_unknown_id() {
        let err = show(Catalog::builtin(), "UNKNOWN", OutputFormat::Plain).unwrap_err();
        assert_eq!(err.to_string(), "No test case with id UNKNOWN");
    }
}
