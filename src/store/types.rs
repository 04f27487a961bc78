use crate::scoring::ScoreRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persisted score records, keyed by project name.
///
/// This is the file the lookup layer reads; the engine only ever replaces
/// whole records, it never mutates one in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreFile {
    pub version: u32,
    #[serde(default)]
    pub records: BTreeMap<String, ScoreRecord>,
}

impl Default for ScoreFile {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreFile {
    /// Create a new empty score file with version 1
    pub fn new() -> Self {
        Self {
            version: 1,
            records: BTreeMap::new(),
        }
    }

    /// Insert or replace the record for a project.
    pub fn upsert(&mut self, record: ScoreRecord) {
        self.records.insert(record.project.clone(), record);
    }

    pub fn get(&self, project: &str) -> Option<&ScoreRecord> {
        self.records.get(project)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted by composite score descending, project name ascending
    /// on ties.
    pub fn ranked(&self) -> Vec<&ScoreRecord> {
        let mut records: Vec<&ScoreRecord> = self.records.values().collect();
        records.sort_by(|a, b| {
            b.composite
                .partial_cmp(&a.composite)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.project.cmp(&b.project))
        });
        records
    }
}
