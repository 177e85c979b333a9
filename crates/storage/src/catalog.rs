//! Contract for the remote course catalog, plus an in-memory stand-in.
//!
//! The real catalog lives behind some transport the core does not know about.
//! Anything able to answer these five calls can back the services.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use course_core::model::{Course, CourseId, Lesson};
use serde::Deserialize;
use thiserror::Error;

/// Failures reported by a catalog backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("course not found")]
    NotFound,

    #[error("catalog transport error: {0}")]
    Transport(String),

    #[error("catalog rejected the call: {0}")]
    Rejected(String),
}

/// Read-only view of the remote catalog.
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    /// # Errors
    ///
    /// Returns `CatalogError` if the backend cannot be reached.
    async fn get_all_courses(&self) -> Result<Vec<Course>, CatalogError>;

    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` when no course has `id`.
    async fn get_course_by_id(&self, id: CourseId) -> Result<Course, CatalogError>;

    /// # Errors
    ///
    /// Returns `CatalogError` if the backend cannot be reached.
    async fn search_courses_by_subject(&self, subject: &str) -> Result<Vec<Course>, CatalogError>;

    /// # Errors
    ///
    /// Returns `CatalogError` if the backend cannot be reached.
    async fn search_lessons_by_keyword(&self, keyword: &str) -> Result<Vec<Lesson>, CatalogError>;

    /// One-time bootstrap of the catalog's seed content.
    ///
    /// # Errors
    ///
    /// Backends may reject repeat calls; callers treat that as already done.
    async fn initialize(&self) -> Result<bool, CatalogError>;
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    courses: Vec<Course>,
}

/// Catalog held entirely in memory, for tests and offline demos.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    courses: Arc<Vec<Course>>,
    initialized: Arc<AtomicBool>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new(courses: Vec<Course>) -> Self {
        Self {
            courses: Arc::new(courses),
            initialized: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Parse a catalog document of the form `{"courses": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Rejected` if the document is not valid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument =
            serde_json::from_str(json).map_err(|e| CatalogError::Rejected(e.to_string()))?;
        Ok(Self::new(doc.courses))
    }

    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[async_trait]
impl CourseCatalog for InMemoryCatalog {
    async fn get_all_courses(&self) -> Result<Vec<Course>, CatalogError> {
        Ok(self.courses.to_vec())
    }

    async fn get_course_by_id(&self, id: CourseId) -> Result<Course, CatalogError> {
        self.courses
            .iter()
            .find(|course| course.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    async fn search_courses_by_subject(&self, subject: &str) -> Result<Vec<Course>, CatalogError> {
        Ok(self
            .courses
            .iter()
            .filter(|course| course.subject.eq_ignore_ascii_case(subject))
            .cloned()
            .collect())
    }

    async fn search_lessons_by_keyword(&self, keyword: &str) -> Result<Vec<Lesson>, CatalogError> {
        let needle = keyword.to_lowercase();
        Ok(self
            .courses
            .iter()
            .flat_map(|course| course.chapters.iter())
            .flat_map(|chapter| chapter.lessons.iter())
            .filter(|lesson| {
                contains_ignore_case(&lesson.title, &needle)
                    || contains_ignore_case(&lesson.description, &needle)
            })
            .cloned()
            .collect())
    }

    async fn initialize(&self) -> Result<bool, CatalogError> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Err(CatalogError::Rejected("already initialized".into()));
        }
        tracing::debug!(courses = self.courses.len(), "in-memory catalog initialized");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::{Chapter, ChapterId, LessonId};

    fn catalog() -> InMemoryCatalog {
        let json = r#"{"courses": [
            {"id": 1, "title": "NEET Physics", "subject": "Physics", "description": "Mechanics",
             "chapters": [{"id": 1, "title": "Kinematics", "description": "",
                "lessons": [{"id": 1, "title": "Motion in a Line", "description": "Speed and velocity"}]}]},
            {"id": 2, "title": "NEET Chemistry", "subject": "Chemistry", "description": "Atoms",
             "chapters": [{"id": 2, "title": "Structure", "description": "",
                "lessons": [{"id": 5, "title": "Atomic Models", "description": "Bohr and velocity of electrons"}]}]}
        ]}"#;
        InMemoryCatalog::from_json(json).unwrap()
    }

    #[tokio::test]
    async fn get_course_by_id_reports_not_found() {
        let catalog = catalog();
        assert_eq!(catalog.get_course_by_id(CourseId::new(1)).await.unwrap().title, "NEET Physics");
        assert_eq!(
            catalog.get_course_by_id(CourseId::new(99)).await,
            Err(CatalogError::NotFound)
        );
    }

    #[tokio::test]
    async fn subject_search_ignores_case() {
        let catalog = catalog();
        let found = catalog.search_courses_by_subject("physics").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, CourseId::new(1));
    }

    #[tokio::test]
    async fn keyword_search_spans_courses_in_catalog_order() {
        let catalog = catalog();
        let lessons = catalog.search_lessons_by_keyword("VELOCITY").await.unwrap();
        let ids: Vec<_> = lessons.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![LessonId::new(1), LessonId::new(5)]);
    }

    #[tokio::test]
    async fn second_initialize_is_rejected() {
        let catalog = InMemoryCatalog::new(vec![Course {
            id: CourseId::new(1),
            title: "T".into(),
            subject: "S".into(),
            description: String::new(),
            chapters: vec![Chapter {
                id: ChapterId::new(1),
                title: "C".into(),
                description: String::new(),
                lessons: Vec::new(),
            }],
        }]);
        assert_eq!(catalog.initialize().await, Ok(true));
        assert!(matches!(catalog.initialize().await, Err(CatalogError::Rejected(_))));
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(matches!(
            InMemoryCatalog::from_json("{\"courses\": 3}"),
            Err(CatalogError::Rejected(_))
        ));
    }
}
