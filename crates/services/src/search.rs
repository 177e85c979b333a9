//! Course text matching combined with catalog-side lesson search.

use course_core::model::{Course, Lesson};

use crate::catalog_service::CatalogService;
use crate::error::CatalogServiceError;

/// Case-insensitive substring match on title, description, or subject.
/// An empty query matches nothing.
#[must_use]
pub fn course_text_match(course: &Course, query: &str) -> bool {
    if query.is_empty() {
        return false;
    }
    let needle = query.to_lowercase();
    [&course.title, &course.description, &course.subject]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Matching courses in input order.
#[must_use]
pub fn filter_courses(courses: &[Course], query: &str) -> Vec<Course> {
    courses
        .iter()
        .filter(|course| course_text_match(course, query))
        .cloned()
        .collect()
}

/// First course, in catalog order, that contains a lesson with this id.
#[must_use]
pub fn resolve_course_for_lesson<'a>(lesson: &Lesson, courses: &'a [Course]) -> Option<&'a Course> {
    courses.iter().find(|course| course.contains_lesson(lesson.id))
}

/// A lesson search hit and the course it belongs to, if any is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonHit {
    pub lesson: Lesson,
    pub course: Option<Course>,
}

/// Course and lesson matches, kept as two independent lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResults {
    pub courses: Vec<Course>,
    pub lessons: Vec<LessonHit>,
}

impl SearchResults {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty() && self.lessons.is_empty()
    }
}

/// Pair each lesson match with its owning course from `catalog`.
///
/// A lesson is listed even when its course is also among the course matches.
#[must_use]
pub fn combine(course_matches: Vec<Course>, lesson_matches: Vec<Lesson>, catalog: &[Course]) -> SearchResults {
    let lessons = lesson_matches
        .into_iter()
        .map(|lesson| {
            let course = resolve_course_for_lesson(&lesson, catalog).cloned();
            LessonHit { lesson, course }
        })
        .collect();
    SearchResults {
        courses: course_matches,
        lessons,
    }
}

/// What a search produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Nothing was searched for.
    EmptyQuery,
    NoResults,
    Results(SearchResults),
}

/// Runs a full search against the catalog.
#[derive(Clone)]
pub struct SearchService {
    catalog: CatalogService,
}

impl SearchService {
    #[must_use]
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }

    /// Search courses locally and lessons through the catalog.
    ///
    /// The query is trimmed first; a blank query returns
    /// `SearchOutcome::EmptyQuery` without touching the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError` if either catalog call fails.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, CatalogServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchOutcome::EmptyQuery);
        }

        let catalog = self.catalog.all_courses().await?;
        let lessons = self.catalog.lessons_by_keyword(query).await?;
        let results = combine(filter_courses(&catalog, query), lessons, &catalog);

        tracing::debug!(
            %query,
            courses = results.courses.len(),
            lessons = results.lessons.len(),
            "search finished"
        );

        if results.is_empty() {
            Ok(SearchOutcome::NoResults)
        } else {
            Ok(SearchOutcome::Results(results))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use course_core::model::{Chapter, ChapterId, CourseId, LessonId};
    use storage::catalog::InMemoryCatalog;

    fn lesson(id: u64, title: &str) -> Lesson {
        Lesson {
            id: LessonId::new(id),
            title: title.into(),
            description: String::new(),
            resources: Vec::new(),
        }
    }

    fn course(id: u64, title: &str, subject: &str, description: &str, lessons: Vec<Lesson>) -> Course {
        Course {
            id: CourseId::new(id),
            title: title.into(),
            subject: subject.into(),
            description: description.into(),
            chapters: vec![Chapter {
                id: ChapterId::new(id),
                title: "Chapter".into(),
                description: String::new(),
                lessons,
            }],
        }
    }

    fn catalog() -> Vec<Course> {
        vec![
            course(1, "NEET Physics", "Physics", "Mechanics and waves", vec![lesson(1, "Kinematics")]),
            course(2, "NEET Chemistry", "Chemistry", "Organic reactions", vec![lesson(5, "Atomic structure")]),
            course(3, "JEE Mathematics", "Mathematics", "Limits and calculus", vec![lesson(9, "Limits")]),
        ]
    }

    #[test]
    fn text_match_checks_title_description_and_subject() {
        let courses = catalog();
        assert!(course_text_match(&courses[0], "neet"));
        assert!(course_text_match(&courses[1], "ORGANIC"));
        assert!(course_text_match(&courses[2], "mathem"));
        assert!(!course_text_match(&courses[0], "biology"));
    }

    #[test]
    fn empty_query_never_matches() {
        assert!(!course_text_match(&catalog()[0], ""));
        assert!(filter_courses(&catalog(), "").is_empty());
    }

    #[test]
    fn filter_preserves_input_order() {
        let matched = filter_courses(&catalog(), "neet");
        let ids: Vec<_> = matched.iter().map(|c| c.id.value()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(filter_courses(&[], "physics").is_empty());
    }

    #[test]
    fn resolve_prefers_first_course_on_collision() {
        let mut courses = catalog();
        courses.push(course(4, "Duplicate", "Physics", "", vec![lesson(1, "Copy")]));

        let owner = resolve_course_for_lesson(&lesson(1, "Kinematics"), &courses);
        assert_eq!(owner.map(|c| c.id), Some(CourseId::new(1)));
        assert!(resolve_course_for_lesson(&lesson(77, "Orphan"), &courses).is_none());
    }

    #[test]
    fn combine_keeps_lessons_of_matched_courses() {
        let courses = catalog();
        let results = combine(vec![courses[0].clone()], vec![lesson(1, "Kinematics")], &courses);

        assert_eq!(results.courses.len(), 1);
        assert_eq!(results.lessons.len(), 1);
        assert_eq!(
            results.lessons[0].course.as_ref().map(|c| c.id),
            Some(CourseId::new(1))
        );
    }

    fn service() -> SearchService {
        let catalog = InMemoryCatalog::new(catalog());
        SearchService::new(CatalogService::new(Arc::new(catalog)))
    }

    #[tokio::test]
    async fn blank_query_is_distinct_from_no_results() {
        let service = service();
        assert_eq!(service.search("   ").await.unwrap(), SearchOutcome::EmptyQuery);
        assert_eq!(service.search("astronomy").await.unwrap(), SearchOutcome::NoResults);
    }

    #[tokio::test]
    async fn search_returns_course_and_lesson_lists() {
        let service = service();
        let SearchOutcome::Results(results) = service.search(" limits ").await.unwrap() else {
            panic!("expected results");
        };
        assert_eq!(results.courses.len(), 1);
        assert_eq!(results.courses[0].id, CourseId::new(3));
        assert_eq!(results.lessons.len(), 1);
        assert_eq!(results.lessons[0].lesson.id, LessonId::new(9));
        assert_eq!(
            results.lessons[0].course.as_ref().map(|c| c.id),
            Some(CourseId::new(3))
        );
    }
}
