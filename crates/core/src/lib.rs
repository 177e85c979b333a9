#![forbid(unsafe_code)]

pub mod model;

pub use model::{
    Affordance, Chapter, ChapterId, Course, CourseId, Lesson, LessonId, ProgressRecord, Resource,
    ResourceKind,
};
