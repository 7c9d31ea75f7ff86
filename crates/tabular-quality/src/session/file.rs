use super::{AnalysisSnapshot, SessionStore};
use crate::error::{AnalysisError, Result, ResultExt};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Stores the latest snapshot as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, snapshot: &AnalysisSnapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json)
            .context(format!("Writing session file {}", self.path.display()))?;
        info!("Saved analysis of '{}' to {}", snapshot.file_name, self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<AnalysisSnapshot>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No session file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(AnalysisError::Io(e)
                    .with_context(format!("Reading session file {}", self.path.display())));
            }
        };

        let snapshot = serde_json::from_str(&text).map_err(|e| {
            AnalysisError::Session(format!(
                "corrupt session file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(snapshot))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AnalysisError::Io(e)
                .with_context(format!("Removing session file {}", self.path.display()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellValue, QualityMetrics, Row, TabularResult};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn snapshot() -> AnalysisSnapshot {
        let mut row = Row::new();
        row.insert("Name".to_string(), CellValue::text("John"));
        row.insert("Age".to_string(), CellValue::Number(25.0));
        AnalysisSnapshot::new(
            "people.csv",
            TabularResult {
                columns: vec!["Name".to_string(), "Age".to_string()],
                rows: vec![row],
                stats: vec![],
            },
            QualityMetrics {
                rows_count: 1,
                cols_count: 2,
                completeness: 100,
                consistency: 100,
                accuracy: 100,
                score: 100,
                outlier_count: 0,
                total_missing: 0,
            },
        )
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        let original = snapshot();

        store.save(&original).unwrap();
        let loaded = store.load().unwrap().unwrap();

        assert_eq!(loaded, original);
        assert_eq!(loaded.table.columns, vec!["Name", "Age"]);
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        store.save(&snapshot()).unwrap();
        assert!(store.path().exists());

        store.clear().unwrap();
        assert!(!store.path().exists());
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_session_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let err = FileSessionStore::new(&path).load().unwrap_err();
        assert_eq!(err.error_code(), "SESSION_ERROR");
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("missing").join("session.json"));
        let err = store.save(&snapshot()).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
