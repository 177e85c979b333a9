use std::sync::Arc;

use storage::catalog::CourseCatalog;
use storage::repository::Storage;

use crate::catalog_service::CatalogService;
use crate::error::AppServicesError;
use crate::lesson_view::LessonViewService;
use crate::progress_store::ProgressStore;
use crate::resources::{ResourceMerger, StaticResourceTable};
use crate::search::SearchService;

/// Assembles app-facing services over one catalog and one progress slot.
#[derive(Clone)]
pub struct AppServices {
    catalog: CatalogService,
    progress: Arc<ProgressStore>,
    search: Arc<SearchService>,
    lessons: Arc<LessonViewService>,
}

impl AppServices {
    /// Build services with progress persisted in `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        catalog: Arc<dyn CourseCatalog>,
        resources: StaticResourceTable,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, catalog, resources).await)
    }

    /// Build services over already-open storage.
    pub async fn from_storage(
        storage: &Storage,
        catalog: Arc<dyn CourseCatalog>,
        resources: StaticResourceTable,
    ) -> Self {
        let catalog = CatalogService::new(catalog);
        let progress = Arc::new(ProgressStore::load(Arc::clone(&storage.progress)).await);
        let merger = ResourceMerger::new(Arc::new(resources));
        let search = Arc::new(SearchService::new(catalog.clone()));
        let lessons = Arc::new(LessonViewService::new(
            catalog.clone(),
            Arc::clone(&progress),
            merger,
        ));

        Self {
            catalog,
            progress,
            search,
            lessons,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressStore> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn search(&self) -> Arc<SearchService> {
        Arc::clone(&self.search)
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonViewService> {
        Arc::clone(&self.lessons)
    }
}
