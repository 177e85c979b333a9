mod course;
mod ids;
mod progress;
mod resource;

pub use ids::{ChapterId, CourseId, LessonId, ParseIdError};

pub use course::{Chapter, Course, Lesson};
pub use progress::ProgressRecord;
pub use resource::{Affordance, Resource, ResourceKind};
