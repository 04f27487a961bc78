use anyhow::{Context, Result};
use std::path::Path;

/// Commented starter config written by `oss-vitals init`.
const STARTER_CONFIG: &str = "\
# oss-vitals configuration
#
# Dimension weights for the composite score. They must sum to 1; when a
# project is missing a dimension, the remaining weights are renormalized.
weights:
  popularity: 0.2
  community: 0.2
  security: 0.2
  license: 0.2
  versioning: 0.2

# Extra license table rows (or overrides of the builtin ones).
# legal_risk is one of: low, medium, high.
#licenses:
#  WTFPL: { permissiveness: 100, legal_risk: low, copyleft: false }

# Where score records are persisted. Defaults to scores.json next to this
# file.
#scores_path: /var/lib/oss-vitals/scores.json
";

/// Write the starter config to `path`. Refuses to overwrite an existing
/// file unless `force` is set.
pub fn write_starter_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, STARTER_CONFIG)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}
