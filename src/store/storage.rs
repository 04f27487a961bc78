use super::types::ScoreFile;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::Path;

/// Load score records from a JSON file
///
/// If the file doesn't exist, returns a new empty state.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_scores(path: &Path) -> Result<ScoreFile> {
    if !path.exists() {
        return Ok(ScoreFile::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open score file at {}", path.display()))?;

    let scores: ScoreFile = serde_json::from_reader(file).context("Failed to load score file")?;

    // Version check
    if scores.version != 1 {
        anyhow::bail!("Unsupported score file version: {}", scores.version);
    }

    Ok(scores)
}

/// Save score records to a JSON file atomically
///
/// Uses atomic-write-file so a crash mid-write never leaves a corrupted
/// file behind. Creates the parent directory if it doesn't exist.
pub fn save_scores(path: &Path, scores: &ScoreFile) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, scores).context("Failed to serialize score file")?;

    file.commit().context("Failed to save score file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoreRecord;
    use chrono::{TimeZone, Utc};

    fn record(project: &str) -> ScoreRecord {
        ScoreRecord {
            project: project.to_string(),
            popularity: Some(68.04),
            community: Some(44.1),
            security: Some(90.0),
            license: Some(100.0),
            versioning: None,
            composite: 75.54,
            computed_at: Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap(),
            breakdown: Vec::new(),
        }
    }

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let scores = load_scores(&dir.path().join("missing.json")).unwrap();
        assert_eq!(scores.version, 1);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let mut scores = ScoreFile::new();
        scores.upsert(record("alpha"));
        scores.upsert(record("beta"));

        save_scores(&path, &scores).unwrap();
        let loaded = load_scores(&path).unwrap();

        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("alpha").unwrap().composite, 75.54);
        assert_eq!(loaded.get("alpha").unwrap().versioning, None);
    }

    #[test]
    fn test_unsupported_version_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, r#"{ "version": 9, "records": {} }"#).unwrap();
        assert!(load_scores(&path).is_err());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("scores.json");
        save_scores(&path, &ScoreFile::new()).unwrap();
        assert!(path.exists());
    }
}
