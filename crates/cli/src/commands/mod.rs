//! CLI Commands

pub mod cases;
pub mod summary;

use anyhow::{Context, Result};
use demoshop_common::Catalog;
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

/// The built-in catalog, or the one stored at `path`
pub fn load_catalog(path: Option<&Path>) -> Result<Cow<'static, Catalog>> {
    match path {
        Some(path) => {
            debug!("Loading catalog from {}", path.display());
            let catalog = Catalog::from_file(path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))?;
            Ok(Cow::Owned(catalog))
        }
        None => Ok(Cow::Borrowed(Catalog::builtin())),
    }
}
