use super::types::ProjectMetrics;
use crate::error::ScoreError;
use crate::scoring::security::SCORECARD_CHECKS;
use std::collections::HashSet;

/// Validate a metrics batch before any scoring happens.
/// Returns all validation errors at once (not just the first).
///
/// Negative counts are unrepresentable after deserialization, so this gate
/// covers what the type system cannot: out-of-range check results, malformed
/// chronology, and duplicate keys. Bad records fail fast instead of being
/// silently clamped inside the engine.
pub fn validate_metrics(metrics: &[ProjectMetrics]) -> Result<(), Vec<ScoreError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ScoreError::InvalidInput(message));
    let mut seen = HashSet::new();

    for record in metrics {
        let project = record.project.as_str();

        if project.trim().is_empty() {
            invalid("record with empty project name".to_string());
        }
        if !seen.insert(project.to_string()) {
            invalid(format!("{}: duplicate project record", project));
        }

        if let Some(ref security) = record.security {
            for (check, value) in &security.checks {
                if let Some(v) = value {
                    if *v > 10 {
                        invalid(format!(
                            "{}: security check '{}' out of range: {} (expected 0..=10)",
                            project, check, v
                        ));
                    }
                }
                if !SCORECARD_CHECKS.contains(&check.as_str()) {
                    tracing::debug!(project, check = check.as_str(), "unrecognized security check");
                }
            }
        }

        if let Some(ref history) = record.releases {
            if let Some(first) = history.releases.iter().map(|r| r.published_at).min() {
                if history.observed_at < first {
                    invalid(format!(
                        "{}: observed_at precedes the first release",
                        project
                    ));
                }
            }
            for release in &history.releases {
                if release.version.trim().is_empty() {
                    invalid(format!("{}: release with empty version string", project));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::types::{Release, ReleaseHistory, SecurityReport};
    use chrono::{Duration, Utc};

    fn record(name: &str) -> ProjectMetrics {
        ProjectMetrics {
            project: name.to_string(),
            popularity: None,
            community: None,
            license: None,
            security: None,
            releases: None,
        }
    }

    #[test]
    fn test_empty_batch_is_valid() {
        assert!(validate_metrics(&[]).is_ok());
    }

    #[test]
    fn test_duplicate_projects_rejected() {
        let batch = vec![record("dup"), record("dup")];
        let errors = validate_metrics(&batch).unwrap_err();
        assert!(errors[0].to_string().contains("duplicate"));
    }

    #[test]
    fn test_check_out_of_range_rejected() {
        let mut rec = record("proj");
        let mut report = SecurityReport::default();
        report.checks.insert("Fuzzing".to_string(), Some(11));
        rec.security = Some(report);

        let errors = validate_metrics(&[rec]).unwrap_err();
        assert!(matches!(
            &errors[0],
            crate::error::ScoreError::InvalidInput(m) if m.contains("out of range")
        ));
    }

    #[test]
    fn test_observed_before_first_release_rejected() {
        let now = Utc::now();
        let mut rec = record("proj");
        rec.releases = Some(ReleaseHistory {
            releases: vec![Release {
                version: "1.0.0".to_string(),
                published_at: now,
            }],
            observed_at: now - Duration::days(1),
        });

        let errors = validate_metrics(&[rec]).unwrap_err();
        assert!(errors[0].to_string().contains("observed_at"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut bad_security = record("a");
        let mut report = SecurityReport::default();
        report.checks.insert("SAST".to_string(), Some(99));
        bad_security.security = Some(report);

        let batch = vec![bad_security, record(""), record("a")];
        let errors = validate_metrics(&batch).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
