//! Error types for the test-case catalog

use thiserror::Error;

/// Result type alias using the catalog error
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Catalog error types
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Duplicate test case id: {0}")]
    DuplicateId(String),

    #[error("Test case has an empty {field}: {id:?}")]
    MissingField { id: String, field: &'static str },

    #[error("Unknown layer: {0} (expected UI or API)")]
    UnknownLayer(String),

    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),
}
