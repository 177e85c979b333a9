use std::sync::Arc;

use course_core::model::{Course, CourseId, Lesson};
use storage::catalog::{CatalogError, CourseCatalog};

use crate::error::CatalogServiceError;

/// How many courses the home listing features.
pub const FEATURED_COURSE_COUNT: usize = 4;

/// Subject selection used by course listings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubjectFilter {
    #[default]
    All,
    Subject(String),
}

impl SubjectFilter {
    /// "All" (any case) or a blank label selects everything.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Subject(label.to_string())
        }
    }
}

/// Thin facade over the remote catalog.
///
/// Transport failures are returned unchanged for the caller to present; this
/// layer never retries.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CourseCatalog>,
}

impl CatalogService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CourseCatalog>) -> Self {
        Self { catalog }
    }

    /// # Errors
    ///
    /// Returns `CatalogServiceError` if the catalog call fails.
    pub async fn all_courses(&self) -> Result<Vec<Course>, CatalogServiceError> {
        tracing::debug!("fetching all courses");
        Ok(self.catalog.get_all_courses().await?)
    }

    /// The first `FEATURED_COURSE_COUNT` courses in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError` if the catalog call fails.
    pub async fn featured_courses(&self) -> Result<Vec<Course>, CatalogServiceError> {
        let mut courses = self.all_courses().await?;
        courses.truncate(FEATURED_COURSE_COUNT);
        Ok(courses)
    }

    /// Fetch one course; `Ok(None)` when the catalog does not know `id`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError` for failures other than not-found.
    pub async fn course_by_id(&self, id: CourseId) -> Result<Option<Course>, CatalogServiceError> {
        tracing::debug!(course_id = %id, "fetching course");
        match self.catalog.get_course_by_id(id).await {
            Ok(course) => Ok(Some(course)),
            Err(CatalogError::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// # Errors
    ///
    /// Returns `CatalogServiceError` if the catalog call fails.
    pub async fn courses_by_subject(
        &self,
        filter: &SubjectFilter,
    ) -> Result<Vec<Course>, CatalogServiceError> {
        match filter {
            SubjectFilter::All => self.all_courses().await,
            SubjectFilter::Subject(subject) => {
                tracing::debug!(%subject, "searching courses by subject");
                Ok(self.catalog.search_courses_by_subject(subject).await?)
            }
        }
    }

    /// Server-side lesson search. A blank keyword returns nothing without
    /// calling the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError` if the catalog call fails.
    pub async fn lessons_by_keyword(&self, keyword: &str) -> Result<Vec<Lesson>, CatalogServiceError> {
        if keyword.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(%keyword, "searching lessons by keyword");
        Ok(self.catalog.search_lessons_by_keyword(keyword).await?)
    }

    /// Ask the catalog to bootstrap itself.
    ///
    /// A rejected or failed call means an earlier caller already did it, so
    /// this always reports success.
    pub async fn initialize(&self) -> bool {
        match self.catalog.initialize().await {
            Ok(initialized) => initialized,
            Err(err) => {
                tracing::debug!(error = %err, "catalog already initialized");
                true
            }
        }
    }
}
