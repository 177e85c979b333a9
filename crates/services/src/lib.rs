#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod error;
pub mod lesson_view;
pub mod progress_store;
pub mod resources;
pub mod search;
pub mod sequencer;

pub use app_services::AppServices;
pub use catalog_service::{CatalogService, FEATURED_COURSE_COUNT, SubjectFilter};
pub use error::{AppServicesError, CatalogServiceError, ResourceTableError};
pub use lesson_view::{LessonLink, LessonLookup, LessonView, LessonViewService};
pub use progress_store::{CompletionSummary, ProgressStore};
pub use resources::{ResourceMerger, StaticResourceTable};
pub use search::{LessonHit, SearchOutcome, SearchResults, SearchService};
pub use sequencer::{LessonLocation, LessonSequence, SequencedLesson};
