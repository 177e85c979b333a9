use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::ids::LessonId;

/// Completed lessons, keyed by lesson id string.
///
/// Persisted as a flat JSON object mapping each completed key to `true`.
/// A missing key means incomplete, so `false` values are dropped on load.
/// Keys are not scoped by course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, bool>",
    into = "BTreeMap<String, bool>"
)]
pub struct ProgressRecord {
    completed: BTreeSet<String>,
}

impl ProgressRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the record changed.
    pub fn mark_complete(&mut self, lesson_id: LessonId) -> bool {
        self.completed.insert(lesson_id.progress_key())
    }

    /// Returns true if the record changed.
    pub fn mark_incomplete(&mut self, lesson_id: LessonId) -> bool {
        self.completed.remove(&lesson_id.progress_key())
    }

    #[must_use]
    pub fn is_complete(&self, lesson_id: LessonId) -> bool {
        self.completed.contains(&lesson_id.progress_key())
    }

    /// Number of entries in `lesson_ids` flagged complete.
    ///
    /// Repeated ids are counted once per occurrence; the result never exceeds
    /// `lesson_ids.len()`.
    #[must_use]
    pub fn completion_count(&self, lesson_ids: &[LessonId]) -> usize {
        lesson_ids.iter().filter(|id| self.is_complete(**id)).count()
    }

    /// Raw keys, including any that do not parse as a `LessonId`.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.completed.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}

impl From<BTreeMap<String, bool>> for ProgressRecord {
    fn from(map: BTreeMap<String, bool>) -> Self {
        let completed = map
            .into_iter()
            .filter_map(|(key, done)| done.then_some(key))
            .collect();
        Self { completed }
    }
}

impl From<ProgressRecord> for BTreeMap<String, bool> {
    fn from(record: ProgressRecord) -> Self {
        record.completed.into_iter().map(|key| (key, true)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_complete_is_idempotent() {
        let mut record = ProgressRecord::new();
        assert!(record.mark_complete(LessonId::new(5)));
        assert!(!record.mark_complete(LessonId::new(5)));
        assert!(record.is_complete(LessonId::new(5)));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn mark_incomplete_tolerates_absent_key() {
        let mut record = ProgressRecord::new();
        assert!(!record.mark_incomplete(LessonId::new(5)));
        record.mark_complete(LessonId::new(5));
        assert!(record.mark_incomplete(LessonId::new(5)));
        assert!(!record.is_complete(LessonId::new(5)));
    }

    #[test]
    fn completion_count_stays_within_bounds() {
        let mut record = ProgressRecord::new();
        record.mark_complete(LessonId::new(1));
        record.mark_complete(LessonId::new(3));

        let ids = [LessonId::new(1), LessonId::new(2), LessonId::new(3)];
        assert_eq!(record.completion_count(&ids), 2);
        assert_eq!(record.completion_count(&[]), 0);

        let repeated = [LessonId::new(1), LessonId::new(1)];
        assert_eq!(record.completion_count(&repeated), 2);
    }

    #[test]
    fn serializes_as_flat_object_of_true() {
        let mut record = ProgressRecord::new();
        record.mark_complete(LessonId::new(5));
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"5":true}"#);
    }

    #[test]
    fn deserialize_drops_false_entries_and_keeps_unknown_keys() {
        let record: ProgressRecord =
            serde_json::from_str(r#"{"5":true,"6":false,"legacy-key":true}"#).unwrap();
        assert!(record.is_complete(LessonId::new(5)));
        assert!(!record.is_complete(LessonId::new(6)));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["5", "legacy-key"]);
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(serde_json::from_str::<ProgressRecord>("[1,2]").is_err());
        assert!(serde_json::from_str::<ProgressRecord>(r#"{"5":"yes"}"#).is_err());
    }
}
