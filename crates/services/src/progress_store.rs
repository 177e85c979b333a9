use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use course_core::model::{Chapter, Course, LessonId, ProgressRecord};
use storage::repository::ProgressRepository;
use tokio::sync::Mutex as AsyncMutex;

/// Completed-versus-total tally for a course or chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionSummary {
    pub completed: usize,
    pub total: usize,
}

impl CompletionSummary {
    /// Percentage in `[0, 100]`; zero when there is nothing to complete.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.total as f64) * 100.0
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rounded_percent(&self) -> u32 {
        self.percent().round() as u32
    }

    #[must_use]
    pub fn has_started(&self) -> bool {
        self.completed > 0
    }
}

/// Learner progress, held in memory and written through to a repository.
///
/// Reads never touch storage. Every mutation persists the whole record;
/// persistence failures are logged and otherwise ignored, so the in-memory
/// record stays authoritative for the session. Mutations on one store are
/// saved in order; two stores writing the same slot overwrite each other
/// (last write wins).
pub struct ProgressStore {
    repo: Arc<dyn ProgressRepository>,
    record: Mutex<ProgressRecord>,
    writer: AsyncMutex<()>,
}

impl ProgressStore {
    /// Read persisted progress, falling back to an empty record when the slot
    /// is missing, unreadable, or malformed.
    pub async fn load(repo: Arc<dyn ProgressRepository>) -> Self {
        let record = match repo.load_progress().await {
            Ok(Some(payload)) => parse_record(&payload),
            Ok(None) => ProgressRecord::new(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read progress, starting empty");
                ProgressRecord::new()
            }
        };
        Self {
            repo,
            record: Mutex::new(record),
            writer: AsyncMutex::new(()),
        }
    }

    /// Snapshot of the current record.
    #[must_use]
    pub fn record(&self) -> ProgressRecord {
        self.lock().clone()
    }

    pub async fn mark_complete(&self, lesson_id: LessonId) {
        self.update(|record| record.mark_complete(lesson_id)).await;
    }

    pub async fn mark_incomplete(&self, lesson_id: LessonId) {
        self.update(|record| record.mark_incomplete(lesson_id)).await;
    }

    /// Flip the completion flag and return the new state.
    pub async fn toggle(&self, lesson_id: LessonId) -> bool {
        self.update(|record| {
            if record.is_complete(lesson_id) {
                record.mark_incomplete(lesson_id);
                false
            } else {
                record.mark_complete(lesson_id);
                true
            }
        })
        .await
    }

    #[must_use]
    pub fn is_complete(&self, lesson_id: LessonId) -> bool {
        self.lock().is_complete(lesson_id)
    }

    #[must_use]
    pub fn completion_count(&self, lesson_ids: &[LessonId]) -> usize {
        self.lock().completion_count(lesson_ids)
    }

    #[must_use]
    pub fn course_progress(&self, course: &Course) -> CompletionSummary {
        let ids = course.lesson_ids();
        CompletionSummary {
            completed: self.completion_count(&ids),
            total: ids.len(),
        }
    }

    #[must_use]
    pub fn chapter_progress(&self, chapter: &Chapter) -> CompletionSummary {
        let ids = chapter.lesson_ids();
        CompletionSummary {
            completed: self.completion_count(&ids),
            total: ids.len(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProgressRecord> {
        // Every update is a single insert or remove, so a poisoned lock still
        // guards a consistent record.
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies one change and saves the resulting record. Writers queue on
    /// `writer`, so saves land in the same order as the changes they carry.
    async fn update<T>(&self, apply: impl FnOnce(&mut ProgressRecord) -> T) -> T {
        let _writer = self.writer.lock().await;
        let (result, snapshot) = {
            let mut record = self.lock();
            let result = apply(&mut record);
            (result, record.clone())
        };
        self.persist(&snapshot).await;
        result
    }

    async fn persist(&self, snapshot: &ProgressRecord) {
        let payload = match serde_json::to_string(snapshot) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize progress");
                return;
            }
        };
        if let Err(err) = self.repo.save_progress(&payload).await {
            tracing::warn!(error = %err, "failed to save progress");
        }
    }
}

fn parse_record(payload: &str) -> ProgressRecord {
    serde_json::from_str(payload).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "ignoring malformed progress data");
        ProgressRecord::new()
    })
}
