//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use demoshop_common::{CoverageStats, TestCase};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text format
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

impl TableDisplay for TestCase {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Title", "Layer", "Severity", "Feature", "Tags", "Automated"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.layer.to_string(),
            self.severity.to_string(),
            self.feature.clone(),
            self.tags.join(", "),
            if self.automated { "yes" } else { "no" }.to_string(),
        ]
    }
}

impl TableDisplay for CoverageStats {
    fn headers() -> Vec<&'static str> {
        vec!["Total", "Automated", "Coverage"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.total.to_string(),
            self.automated.to_string(),
            format!("{:.1}%", self.coverage_percentage),
        ]
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn to_yaml<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_yaml::to_string(value)?)
}

fn plain_lines(headers: &[&str], row: &[String]) -> String {
    headers
        .iter()
        .zip(row)
        .map(|(header, value)| format!("{}: {}", header, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a single item
pub fn render_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Table => {
            let mut table = new_table();
            table.set_header(T::headers());
            table.add_row(item.row());
            table.to_string()
        }
        OutputFormat::Json => to_json(item)?,
        OutputFormat::Yaml => to_yaml(item)?,
        OutputFormat::Plain => plain_lines(&T::headers(), &item.row()),
    })
}

/// Render a list of items
pub fn render_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) -> anyhow::Result<String> {
    if items.is_empty() && matches!(format, OutputFormat::Table | OutputFormat::Plain) {
        return Ok("No items found.".to_string());
    }

    Ok(match format {
        OutputFormat::Table => {
            let mut table = new_table();
            table.set_header(T::headers());
            for item in items {
                table.add_row(item.row());
            }
            table.to_string()
        }
        OutputFormat::Json => to_json(items)?,
        OutputFormat::Yaml => to_yaml(items)?,
        OutputFormat::Plain => items
            .iter()
            .map(|item| plain_lines(&T::headers(), &item.row()))
            .collect::<Vec<_>>()
            .join("\n---\n"),
    })
}

/// Render every field of a test case
pub fn render_case(case: &TestCase, format: OutputFormat) -> anyhow::Result<String> {
    let numbered = |items: &[String]| {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {}", i + 1, item))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let fields = [
        ("ID", case.id.clone()),
        ("Title", case.title.clone()),
        ("Description", case.description.clone()),
        ("Preconditions", numbered(&case.preconditions)),
        ("Steps", numbered(&case.steps)),
        ("Expected result", case.expected_result.clone()),
        ("Severity", case.severity.to_string()),
        ("Layer", case.layer.to_string()),
        ("Feature", case.feature.clone()),
        ("Tags", case.tags.join(", ")),
        ("Automated", case.automated.to_string()),
        ("Automation", case.automation.clone().unwrap_or_else(|| "-".to_string())),
    ];

    Ok(match format {
        OutputFormat::Table => {
            let mut table = new_table();
            table.set_header(vec!["Field", "Value"]);
            for (name, value) in fields {
                table.add_row(vec![name.to_string(), value]);
            }
            table.to_string()
        }
        OutputFormat::Json => to_json(case)?,
        OutputFormat::Yaml => to_yaml(case)?,
        OutputFormat::Plain => fields
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

/// Print a list of items
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render_list(items, format)?);
    Ok(())
}

/// Print a single item
pub fn print_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render_item(item, format)?);
    Ok(())
}

/// Print a section heading, skipped for machine-readable formats
pub fn print_heading(title: &str, count: usize, format: OutputFormat) {
    if matches!(format, OutputFormat::Table | OutputFormat::Plain) {
        println!();
        println!("{}", format!("=== {} ===", title).bold());
        println!("Всего тестов: {}", count);
    }
}
