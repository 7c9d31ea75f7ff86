use super::{AnalysisSnapshot, SessionStore};
use crate::error::Result;
use crate::types::QualityGrade;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Number of entries kept in the recent-analyses history.
pub const MAX_RECENT_ANALYSES: usize = 10;

/// One line of the recent-analyses history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentAnalysis {
    pub file_name: String,
    pub score: u32,
    pub grade: QualityGrade,
    pub analyzed_at: DateTime<Utc>,
}

impl RecentAnalysis {
    /// Score with its grade, e.g. `85 (Good)`.
    pub fn score_label(&self) -> String {
        format!("{} ({})", self.score, self.grade)
    }
}

#[derive(Debug, Default)]
struct State {
    latest: Option<AnalysisSnapshot>,
    recent: VecDeque<RecentAnalysis>,
}

/// Process-local store with a bounded history of past analyses.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    state: RwLock<State>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Past analyses, newest first.
    pub fn recent(&self) -> Vec<RecentAnalysis> {
        self.state.read().recent.iter().cloned().collect()
    }
}

impl SessionStore for InMemorySessionStore {
    fn save(&self, snapshot: &AnalysisSnapshot) -> Result<()> {
        let mut state = self.state.write();

        state.recent.push_front(RecentAnalysis {
            file_name: snapshot.file_name.clone(),
            score: snapshot.metrics.score,
            grade: snapshot.metrics.grade(),
            analyzed_at: snapshot.saved_at,
        });
        state.recent.truncate(MAX_RECENT_ANALYSES);
        state.latest = Some(snapshot.clone());

        debug!(
            "Stored snapshot of '{}' ({} recent)",
            snapshot.file_name,
            state.recent.len()
        );
        Ok(())
    }

    fn load(&self) -> Result<Option<AnalysisSnapshot>> {
        Ok(self.state.read().latest.clone())
    }

    /// Forgets the latest snapshot; the history is kept.
    fn clear(&self) -> Result<()> {
        self.state.write().latest = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{QualityMetrics, TabularResult};

    fn snapshot(name: &str, score: u32) -> AnalysisSnapshot {
        AnalysisSnapshot::new(
            name,
            TabularResult::empty(),
            QualityMetrics {
                rows_count: 0,
                cols_count: 0,
                completeness: 100,
                consistency: 100,
                accuracy: 100,
                score,
                outlier_count: 0,
                total_missing: 0,
            },
        )
    }

    #[test]
    fn test_load_empty_store() {
        let store = InMemorySessionStore::new();
        assert!(store.load().unwrap().is_none());
        assert!(store.recent().is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let store = InMemorySessionStore::new();
        store.save(&snapshot("first.csv", 80)).unwrap();
        store.save(&snapshot("second.csv", 60)).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.file_name, "second.csv");
        assert_eq!(loaded.metrics.score, 60);
    }

    #[test]
    fn test_recent_history_is_bounded_and_newest_first() {
        let store = InMemorySessionStore::new();
        for i in 0..12 {
            store.save(&snapshot(&format!("file{}.csv", i), 90)).unwrap();
        }

        let recent = store.recent();
        assert_eq!(recent.len(), MAX_RECENT_ANALYSES);
        assert_eq!(recent[0].file_name, "file11.csv");
        assert_eq!(recent[9].file_name, "file2.csv");
    }

    #[test]
    fn test_score_label() {
        let store = InMemorySessionStore::new();
        store.save(&snapshot("a.csv", 85)).unwrap();
        assert_eq!(store.recent()[0].score_label(), "85 (Good)");
    }

    #[test]
    fn test_clear_keeps_history() {
        let store = InMemorySessionStore::new();
        store.save(&snapshot("a.csv", 40)).unwrap();
        store.clear().unwrap();

        assert!(store.load().unwrap().is_none());
        assert_eq!(store.recent().len(), 1);
        assert_eq!(store.recent()[0].grade, QualityGrade::Poor);
    }
}
