use serde::{Deserialize, Serialize};

use crate::model::ids::{ChapterId, CourseId, LessonId};
use crate::model::resource::Resource;

/// A single unit of study with its attached resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// An ordered group of lessons inside a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: ChapterId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Chapter {
    /// Lesson ids in the order the chapter lists them.
    #[must_use]
    pub fn lesson_ids(&self) -> Vec<LessonId> {
        self.lessons.iter().map(|lesson| lesson.id).collect()
    }
}

/// Top of the catalog hierarchy.
///
/// Courses are snapshots fetched from the catalog. Chapter and lesson order is
/// the navigation order and is never re-sorted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub subject: String,
    pub description: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl Course {
    /// Total number of lessons across all chapters.
    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.chapters.iter().map(|chapter| chapter.lessons.len()).sum()
    }

    /// Every lesson id in chapter-then-lesson order.
    #[must_use]
    pub fn lesson_ids(&self) -> Vec<LessonId> {
        self.chapters
            .iter()
            .flat_map(|chapter| chapter.lessons.iter().map(|lesson| lesson.id))
            .collect()
    }

    #[must_use]
    pub fn contains_lesson(&self, id: LessonId) -> bool {
        self.chapters
            .iter()
            .any(|chapter| chapter.lessons.iter().any(|lesson| lesson.id == id))
    }
}
