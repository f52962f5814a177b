//! Insight persistence: one well-known slot, overwritten on every completed
//! assessment or quiz.
//!
//! The medium is a tiny key-value contract (`get`/`set` of strings) so the
//! store can sit on a JSON file in production and a plain map in tests.
//! Two behaviors matter:
//! - `save` never fails the caller: a broken medium is logged and the
//!   in-memory result stays usable for the current render.
//! - `load` treats absent and corrupt content the same way (`None`);
//!   there is no prior insight until the first submission ever happens.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::Insight;

/// Slot key for the most recent insight record.
pub const LATEST_INSIGHT_KEY: &str = "latest_insight";

/// What actually lands in the medium: the insight plus the subject/skill
/// label it was computed from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedInsight {
    pub subject: String,
    pub insight: Insight,
}

/// Minimal persistence medium: string values by string key.
pub trait KeyValue: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
}

/// In-memory medium for tests and ephemeral deployments.
#[allow(dead_code)]
#[derive(Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValue for MemoryKv {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.entries
            .lock()
            .map_err(|e| e.to_string())?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File medium: a single JSON object of key -> value at `path`.
pub struct FileKv {
    path: PathBuf,
}

impl FileKv {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> HashMap<String, String> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                warn!(target: "edumate_backend", path = %self.path.display(), error = %e, "Insight file unreadable; treating as empty");
                HashMap::new()
            }
        }
    }
}

impl KeyValue for FileKv {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut all = self.read_all();
        all.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
            }
        }
        let raw = serde_json::to_string_pretty(&all).map_err(|e| e.to_string())?;
        std::fs::write(&self.path, raw).map_err(|e| e.to_string())
    }
}

/// The store the dashboard flows talk to. Injected into `AppState`; never a
/// process-wide singleton.
pub struct InsightsStore {
    medium: Box<dyn KeyValue>,
}

impl InsightsStore {
    pub fn new(medium: Box<dyn KeyValue>) -> Self {
        Self { medium }
    }

    /// Build from `INSIGHTS_PATH` (default `./data/insights.json`).
    pub fn from_env() -> Self {
        let path =
            std::env::var("INSIGHTS_PATH").unwrap_or_else(|_| "./data/insights.json".into());
        info!(target: "edumate_backend", %path, "Insight storage at file");
        Self::new(Box::new(FileKv::new(Path::new(&path))))
    }

    /// Overwrite the slot with the latest record. Storage trouble is
    /// reported through tracing and otherwise swallowed.
    pub fn save(&self, subject: &str, insight: &Insight) {
        let record = PersistedInsight {
            subject: subject.to_string(),
            insight: insight.clone(),
        };
        let raw = match serde_json::to_string(&record) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(target: "edumate_backend", error = %e, "Could not serialize insight record");
                return;
            }
        };
        if let Err(e) = self.medium.set(LATEST_INSIGHT_KEY, &raw) {
            warn!(target: "edumate_backend", %subject, error = %e, "Could not persist insight; continuing with in-memory result");
        }
    }

    /// Latest persisted record, or `None` when nothing (valid) is stored.
    pub fn load(&self) -> Option<PersistedInsight> {
        let raw = self.medium.get(LATEST_INSIGHT_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(target: "edumate_backend", error = %e, "Stored insight is corrupt; treating as absent");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insight(score: u32) -> Insight {
        Insight {
            predicted_score: score,
            weakness_topic: "Fundamentals".into(),
            learning_milestone: "Review Mathematics Fundamentals".into(),
        }
    }

    #[test]
    fn absent_slot_loads_as_none() {
        let store = InsightsStore::new(Box::new(MemoryKv::default()));
        assert!(store.load().is_none());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let store = InsightsStore::new(Box::new(MemoryKv::default()));
        store.save("Mathematics", &insight(60));
        let record = store.load().expect("record");
        assert_eq!(record.subject, "Mathematics");
        assert_eq!(record.insight.predicted_score, 60);
    }

    #[test]
    fn newer_save_supersedes_the_slot() {
        let store = InsightsStore::new(Box::new(MemoryKv::default()));
        store.save("Mathematics", &insight(60));
        store.save("Computer Network", &insight(90));
        let record = store.load().expect("record");
        assert_eq!(record.subject, "Computer Network");
        assert_eq!(record.insight.predicted_score, 90);
    }

    #[test]
    fn corrupt_slot_loads_as_none() {
        let medium = MemoryKv::default();
        medium.set(LATEST_INSIGHT_KEY, "{not json").expect("set");
        let store = InsightsStore::new(Box::new(medium));
        assert!(store.load().is_none());
    }

    #[test]
    fn file_medium_roundtrips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store =
            InsightsStore::new(Box::new(FileKv::new(dir.path().join("insights.json"))));
        store.save("FLA", &insight(100));
        let record = store.load().expect("record");
        assert_eq!(record.subject, "FLA");
    }

    #[test]
    fn broken_file_medium_never_panics_the_caller() {
        let dir = tempfile::tempdir().expect("tempdir");
        // The storage path is a directory, so every write fails.
        let store = InsightsStore::new(Box::new(FileKv::new(dir.path())));
        store.save("FLA", &insight(100));
        assert!(store.load().is_none());
    }
}
