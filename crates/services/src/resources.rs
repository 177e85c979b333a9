use std::collections::HashMap;
use std::sync::Arc;

use course_core::model::{Affordance, Lesson, LessonId, Resource};

use crate::error::ResourceTableError;

/// Supplementary resources shipped with the app, keyed by lesson id string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticResourceTable {
    entries: HashMap<String, Vec<Resource>>,
}

impl StaticResourceTable {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The table bundled with the application.
    #[must_use]
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            "1".to_string(),
            vec![Resource::new(
                "NEET Sample Notes - Kinematics",
                "pdf",
                "/assets/resources/neet-sample-notes-1.pdf",
            )],
        );
        entries.insert(
            "5".to_string(),
            vec![Resource::new(
                "Chemistry Revision Guide",
                "pdf",
                "/assets/resources/chemistry-revision-1.pdf",
            )],
        );
        entries.insert(
            "9".to_string(),
            vec![Resource::new(
                "JEE Formula Sheet - Limits",
                "pdf",
                "/assets/resources/jee-sample-formulas-1.pdf",
            )],
        );
        entries.insert(
            "13".to_string(),
            vec![Resource::new(
                "Biology Diagrams - Cell Structure",
                "pdf",
                "/assets/resources/biology-diagrams-1.pdf",
            )],
        );
        Self { entries }
    }

    /// Parse `{"<lessonId>": [{"title", "resourceType", "url"}, ...]}`.
    ///
    /// # Errors
    ///
    /// Returns `ResourceTableError::Parse` if the document has another shape.
    pub fn from_json(json: &str) -> Result<Self, ResourceTableError> {
        let entries = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    #[must_use]
    pub fn for_lesson(&self, lesson_id: LessonId) -> &[Resource] {
        self.entries
            .get(&lesson_id.progress_key())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Catalog resources first, then supplementary ones. Nothing is deduplicated,
/// so a link present in both lists appears twice.
#[must_use]
pub fn merge(remote: &[Resource], supplementary: &[Resource]) -> Vec<Resource> {
    remote.iter().chain(supplementary).cloned().collect()
}

/// First resource whose type is "video", ignoring case.
#[must_use]
pub fn select_primary_video(resources: &[Resource]) -> Option<&Resource> {
    resources.iter().find(|resource| resource.is_video())
}

#[must_use]
pub fn affordance_for(resource: &Resource) -> Affordance {
    resource.affordance()
}

/// Builds the resource list shown for a lesson.
#[derive(Debug, Clone)]
pub struct ResourceMerger {
    table: Arc<StaticResourceTable>,
}

impl ResourceMerger {
    #[must_use]
    pub fn new(table: Arc<StaticResourceTable>) -> Self {
        Self { table }
    }

    #[must_use]
    pub fn resources_for(&self, lesson: &Lesson) -> Vec<Resource> {
        merge(&lesson.resources, self.table.for_lesson(lesson.id))
    }
}
