use std::sync::Arc;

use course_core::model::{ChapterId, CourseId, Lesson, LessonId, Resource};

use crate::catalog_service::CatalogService;
use crate::error::CatalogServiceError;
use crate::progress_store::ProgressStore;
use crate::resources::{ResourceMerger, select_primary_video};
use crate::sequencer::{LessonLocation, LessonSequence};

/// Neighbouring lesson reference used for previous/next links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonLink {
    pub id: LessonId,
    pub title: String,
}

impl From<&Lesson> for LessonLink {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title.clone(),
        }
    }
}

/// Everything needed to present one lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonView {
    pub course_id: CourseId,
    pub course_title: String,
    pub chapter_id: ChapterId,
    pub chapter_title: String,
    pub lesson: Lesson,
    pub position: usize,
    pub total: usize,
    pub resources: Vec<Resource>,
    pub primary_video: Option<Resource>,
    pub previous: Option<LessonLink>,
    /// `None` on the last lesson: the learner goes back to the course.
    pub next: Option<LessonLink>,
    pub completed: bool,
}

impl LessonView {
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonLookup {
    CourseNotFound,
    LessonNotFound,
    Found(Box<LessonView>),
}

/// Resolves a (course, lesson) pair into a `LessonView`.
#[derive(Clone)]
pub struct LessonViewService {
    catalog: CatalogService,
    progress: Arc<ProgressStore>,
    merger: ResourceMerger,
}

impl LessonViewService {
    #[must_use]
    pub fn new(catalog: CatalogService, progress: Arc<ProgressStore>, merger: ResourceMerger) -> Self {
        Self {
            catalog,
            progress,
            merger,
        }
    }

    /// # Errors
    ///
    /// Returns `CatalogServiceError` if the course cannot be fetched. Unknown
    /// courses and lessons are reported through `LessonLookup`.
    pub async fn lesson_view(
        &self,
        course_id: CourseId,
        lesson_id: LessonId,
    ) -> Result<LessonLookup, CatalogServiceError> {
        let Some(course) = self.catalog.course_by_id(course_id).await? else {
            return Ok(LessonLookup::CourseNotFound);
        };

        let sequence = LessonSequence::new(&course);
        let LessonLocation::FoundAt {
            position,
            lesson,
            chapter,
        } = sequence.locate(lesson_id)
        else {
            return Ok(LessonLookup::LessonNotFound);
        };

        let resources = self.merger.resources_for(lesson);
        let primary_video = select_primary_video(&resources).cloned();

        Ok(LessonLookup::Found(Box::new(LessonView {
            course_id: course.id,
            course_title: course.title.clone(),
            chapter_id: chapter.id,
            chapter_title: chapter.title.clone(),
            lesson: lesson.clone(),
            position,
            total: sequence.len(),
            resources,
            primary_video,
            previous: sequence.previous(position).map(LessonLink::from),
            next: sequence.next(position).map(LessonLink::from),
            completed: self.progress.is_complete(lesson_id),
        })))
    }
}
