//! Per-role generation counters, persisted as `config/versions.json`.
//!
//! The store is an advisory record, not a lock: every mutation rewrites the
//! whole file, and callers persist the bumped counter before the matching
//! artifact is written. Concurrent writers can race; the last save wins.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Counter state for one role. Timestamps serialize as `null` until the
/// first generation so the file shape never changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub current: u32,
    pub last_generated: Option<String>,
    pub total_generated: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMeta {
    pub last_updated: Option<String>,
}

/// The whole version store: role code to counter record, plus a file-level
/// last-touched timestamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionStore {
    #[serde(default)]
    pub versions: BTreeMap<String, VersionRecord>,
    #[serde(default)]
    pub meta: StoreMeta,
}

impl VersionStore {
    /// Loads the store, treating a missing file as empty so a fresh checkout
    /// starts every role at version zero.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Rewrites the whole file, pretty-printed, creating the parent
    /// directory on first save.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Bumps a role's counter and touches both timestamps, creating the
    /// record on first use. Returns a snapshot of the updated record. The
    /// caller decides when to `save`.
    pub fn increment(&mut self, code: &str) -> VersionRecord {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let updated = {
            let record = self.versions.entry(code.to_string()).or_default();
            record.current += 1;
            record.last_generated = Some(now.clone());
            record.total_generated += 1;
            record.clone()
        };
        self.meta.last_updated = Some(now);
        updated
    }

    pub fn record(&self, code: &str) -> Option<&VersionRecord> {
        self.versions.get(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_creates_record_starting_at_one() {
        let mut store = VersionStore::default();
        let record = store.increment("PM");
        assert_eq!(record.current, 1);
        assert_eq!(record.total_generated, 1);
        assert!(record.last_generated.is_some());
    }

    #[test]
    fn test_increment_is_strictly_increasing() {
        let mut store = VersionStore::default();
        assert_eq!(store.increment("FSE").current, 1);
        assert_eq!(store.increment("FSE").current, 2);
        assert_eq!(store.increment("FSE").current, 3);
        assert_eq!(store.record("FSE").unwrap().total_generated, 3);
    }

    #[test]
    fn test_increment_touches_meta_timestamp() {
        let mut store = VersionStore::default();
        assert!(store.meta.last_updated.is_none());
        store.increment("DA");
        assert!(store.meta.last_updated.is_some());
    }

    #[test]
    fn test_load_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = VersionStore::load(&dir.path().join("versions.json")).unwrap();
        assert!(store.versions.is_empty());
        assert!(store.meta.last_updated.is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("versions.json");

        let mut store = VersionStore::default();
        store.increment("SWE");
        store.increment("SWE");
        store.save(&path).unwrap();

        let reloaded = VersionStore::load(&path).unwrap();
        assert_eq!(reloaded.record("SWE").unwrap().current, 2);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"lastGenerated\""));
        assert!(raw.contains("\"totalGenerated\""));
    }

    #[test]
    fn test_untouched_record_serializes_null_timestamp() {
        let value = serde_json::to_value(VersionRecord::default()).unwrap();
        assert!(value["lastGenerated"].is_null());
        assert_eq!(value["current"], 0);
    }
}
