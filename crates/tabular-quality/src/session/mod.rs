//! Session persistence for the latest analysis.
//!
//! The analysis core never persists anything by itself. Callers hand it a
//! [`SessionStore`] so a later run can reload the previous result. Every save
//! replaces the stored snapshot wholesale; the last write wins.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::{InMemorySessionStore, MAX_RECENT_ANALYSES, RecentAnalysis};

use crate::error::Result;
use crate::types::{QualityMetrics, TabularResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The stored form of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSnapshot {
    pub file_name: String,
    pub saved_at: DateTime<Utc>,
    pub table: TabularResult,
    pub metrics: QualityMetrics,
}

impl AnalysisSnapshot {
    /// Snapshot taken now.
    pub fn new(file_name: impl Into<String>, table: TabularResult, metrics: QualityMetrics) -> Self {
        Self {
            file_name: file_name.into(),
            saved_at: Utc::now(),
            table,
            metrics,
        }
    }
}

/// Key-value style store for the latest snapshot.
pub trait SessionStore: Send + Sync {
    /// Replace the stored snapshot.
    fn save(&self, snapshot: &AnalysisSnapshot) -> Result<()>;

    /// The stored snapshot, or `None` if nothing has been saved.
    fn load(&self) -> Result<Option<AnalysisSnapshot>>;

    /// Forget the stored snapshot.
    fn clear(&self) -> Result<()>;
}

static_assertions::assert_impl_all!(InMemorySessionStore: Send, Sync);
static_assertions::assert_impl_all!(FileSessionStore: Send, Sync);
