use std::ffi::OsString;
use std::path::PathBuf;

use tracing::info;

use crate::error::CatalogError;
use crate::game::catalog::Catalog;

pub const CATALOG_ENV: &str = "PUZZLE_RACE_CATALOG";

/// Path named by a `PUZZLE_RACE_CATALOG` value, ignoring blanks.
pub fn catalog_path(value: Option<OsString>) -> Option<PathBuf> {
    let value = value?;
    if value.to_string_lossy().trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(value))
}

/// Loads the catalog named in the environment, or the bundled one.
pub fn load_catalog() -> Result<Catalog, CatalogError> {
    match catalog_path(std::env::var_os(CATALOG_ENV)) {
        Some(path) => {
            info!(path = %path.display(), "loading catalog override");
            Catalog::load(&path)
        }
        None => Catalog::bundled(),
    }
}
