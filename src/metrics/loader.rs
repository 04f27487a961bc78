use super::types::ProjectMetrics;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a batch of project metrics from a JSON array file.
pub fn load_metrics(path: &Path) -> Result<Vec<ProjectMetrics>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open metrics file at {}", path.display()))?;

    let metrics: Vec<ProjectMetrics> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse metrics file at {}", path.display()))?;

    tracing::debug!(records = metrics.len(), "loaded metrics file");
    Ok(metrics)
}
