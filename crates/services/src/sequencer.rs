//! Linear lesson order for previous/next navigation.
//!
//! The sequence is derived from the course every time it is needed. Courses
//! are small and a cached copy could drift from the snapshot it came from.

use course_core::model::{Chapter, ChapterId, Course, Lesson, LessonId};

/// A lesson together with the chapter that contains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencedLesson<'a> {
    pub lesson: &'a Lesson,
    pub chapter: &'a Chapter,
}

impl SequencedLesson<'_> {
    #[must_use]
    pub fn chapter_id(&self) -> ChapterId {
        self.chapter.id
    }
}

/// Result of looking a lesson up in a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonLocation<'a> {
    FoundAt {
        position: usize,
        lesson: &'a Lesson,
        chapter: &'a Chapter,
    },
    NotFound,
}

impl LessonLocation<'_> {
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::FoundAt { position, .. } => Some(*position),
            Self::NotFound => None,
        }
    }
}

/// Every lesson of `course` in chapter order, then lesson order.
#[must_use]
pub fn flatten(course: &Course) -> Vec<SequencedLesson<'_>> {
    course
        .chapters
        .iter()
        .flat_map(|chapter| {
            chapter
                .lessons
                .iter()
                .map(move |lesson| SequencedLesson { lesson, chapter })
        })
        .collect()
}

/// Shorthand for `LessonSequence::new(course).locate(lesson_id)`.
#[must_use]
pub fn locate(course: &Course, lesson_id: LessonId) -> LessonLocation<'_> {
    LessonSequence::new(course).locate(lesson_id)
}

/// Flattened view of one course with positional queries.
#[derive(Debug, Clone)]
pub struct LessonSequence<'a> {
    entries: Vec<SequencedLesson<'a>>,
}

impl<'a> LessonSequence<'a> {
    #[must_use]
    pub fn new(course: &'a Course) -> Self {
        Self {
            entries: flatten(course),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[SequencedLesson<'a>] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<SequencedLesson<'a>> {
        self.entries.get(position).copied()
    }

    /// Find `lesson_id` by linear scan.
    ///
    /// If a course repeats an id, the last occurrence is reported.
    #[must_use]
    pub fn locate(&self, lesson_id: LessonId) -> LessonLocation<'a> {
        self.entries
            .iter()
            .rposition(|entry| entry.lesson.id == lesson_id)
            .map_or(LessonLocation::NotFound, |position| {
                let entry = self.entries[position];
                LessonLocation::FoundAt {
                    position,
                    lesson: entry.lesson,
                    chapter: entry.chapter,
                }
            })
    }

    /// Lesson before `position`; `None` at the start or out of range.
    #[must_use]
    pub fn previous(&self, position: usize) -> Option<&'a Lesson> {
        if position >= self.entries.len() {
            return None;
        }
        let before = position.checked_sub(1)?;
        self.entries.get(before).map(|entry| entry.lesson)
    }

    /// Lesson after `position`; `None` means the end of the course.
    #[must_use]
    pub fn next(&self, position: usize) -> Option<&'a Lesson> {
        if position >= self.entries.len() {
            return None;
        }
        self.entries.get(position + 1).map(|entry| entry.lesson)
    }
}
