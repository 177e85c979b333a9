#![forbid(unsafe_code)]

pub mod catalog;
pub mod repository;
pub mod sqlite;

pub use catalog::{CatalogError, CourseCatalog, InMemoryCatalog};
pub use repository::{InMemoryRepository, ProgressRepository, Storage, StorageError};
