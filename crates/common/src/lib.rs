//! Demo Web Shop QA common library
//!
//! The declarative test-case catalog and the types it is made of.

mod builtin;
pub mod catalog;
pub mod error;
pub mod types;

pub use catalog::{Catalog, CoverageStats, FeatureGroup};
pub use error::{CatalogError, CatalogResult};
pub use types::{Layer, Severity, TestCase};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
