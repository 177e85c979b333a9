//! Shared error types for the services crate.

use thiserror::Error;

use storage::catalog::CatalogError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by catalog-backed services.
///
/// A missing course or lesson is not an error; lookups report it as a value.
/// What remains here is a failed catalog call, which callers may retry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogServiceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl CatalogServiceError {
    /// Whether presenting a "try again" action makes sense.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Catalog(CatalogError::Transport(_)))
    }
}

/// Errors emitted while loading a static resource table.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResourceTableError {
    #[error("invalid static resource table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
