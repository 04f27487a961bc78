use super::community::community_score;
use super::config::Weights;
use super::license::LicenseTable;
use super::normalize::{available_weighted_mean, round2};
use super::popularity::popularity_score;
use super::security::security_score;
use super::versioning::versioning_score;
use crate::error::{Result, ScoreError};
use crate::metrics::types::ProjectMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One dimension's outcome: a score, or the reason it was excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: String,
    pub score: Option<f64>,
    pub detail: String,
}

/// Immutable result of scoring one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub project: String,
    pub popularity: Option<f64>,
    pub community: Option<f64>,
    pub security: Option<f64>,
    pub license: Option<f64>,
    pub versioning: Option<f64>,
    pub composite: f64,
    pub computed_at: DateTime<Utc>,
    pub breakdown: Vec<DimensionScore>,
}

/// The score engine: a pure function of its injected configuration and the
/// per-project input record. No I/O, no shared mutable state; scoring many
/// projects in parallel needs no synchronization beyond collecting results.
pub struct ScoreEngine {
    weights: Weights,
    licenses: LicenseTable,
}

impl ScoreEngine {
    pub fn new(weights: Weights, licenses: LicenseTable) -> Self {
        Self { weights, licenses }
    }

    /// Compute the five sub-scores and their composite for one project.
    ///
    /// Undefined dimensions (not collected, unknown license, no security
    /// checks, no versioning signal) are excluded from the composite and
    /// the remaining weights renormalized; they are never averaged in as 0.
    /// Only a project with no usable dimension at all fails.
    pub fn score_project(
        &self,
        metrics: &ProjectMetrics,
        computed_at: DateTime<Utc>,
    ) -> Result<ScoreRecord> {
        let (popularity, popularity_detail) = match &metrics.popularity {
            Some(m) => {
                let (score, variant) = popularity_score(m);
                (Some(score), variant.label().to_string())
            }
            None => (None, "no popularity data collected".to_string()),
        };

        let (community, community_detail) = match &metrics.community {
            Some(m) => {
                let parts = community_score(m);
                let detail = format!(
                    "fundamental {:.2}, github {:.2}, twitter {:.2}, stackexchange {:.2}",
                    parts.fundamental, parts.github, parts.twitter, parts.stack_exchange
                );
                (Some(parts.total), detail)
            }
            None => (None, "no community data collected".to_string()),
        };

        let (security, security_detail) = match &metrics.security {
            Some(report) => match security_score(report) {
                Ok((score, available)) => {
                    (Some(score), format!("mean over {} checks", available))
                }
                Err(ScoreError::NoSecurityChecks) => {
                    (None, "no security checks ran".to_string())
                }
                Err(e) => return Err(e),
            },
            None => (None, "no security report collected".to_string()),
        };

        let (license, license_detail) = match metrics.license.as_deref() {
            Some(id) => match self.licenses.score(id) {
                Ok(score) => {
                    let detail = match self.licenses.entry(id) {
                        Some(entry) => {
                            let copyleft = if entry.copyleft { ", copyleft" } else { "" };
                            format!("{}: {} legal risk{}", id, entry.legal_risk.label(), copyleft)
                        }
                        None => id.to_string(),
                    };
                    (Some(round2(score)), detail)
                }
                Err(ScoreError::UnknownLicense(id)) => {
                    tracing::warn!(
                        project = metrics.project.as_str(),
                        license = id.as_str(),
                        "unknown license excluded from composite"
                    );
                    (None, format!("unknown license '{}'", id))
                }
                Err(e) => return Err(e),
            },
            None => (None, "no license recorded".to_string()),
        };

        let (versioning, versioning_detail) = match &metrics.releases {
            Some(history) => match versioning_score(history) {
                Ok((score, derived)) => (
                    Some(score),
                    format!(
                        "{} majors, {} minors, {} patches",
                        derived.majors, derived.minors, derived.patches
                    ),
                ),
                Err(ScoreError::NoVersioningSignal) => {
                    (None, "no classifiable releases".to_string())
                }
                Err(e) => return Err(e),
            },
            None => (None, "no release history collected".to_string()),
        };

        let weighted = [
            (self.weights.popularity, popularity),
            (self.weights.community, community),
            (self.weights.security, security),
            (self.weights.license, license),
            (self.weights.versioning, versioning),
        ];
        let composite = available_weighted_mean(&weighted)
            .map(round2)
            .ok_or_else(|| ScoreError::NoUsableDimensions {
                project: metrics.project.clone(),
            })?;

        tracing::debug!(
            project = metrics.project.as_str(),
            composite,
            "scored project"
        );

        let breakdown = vec![
            DimensionScore {
                dimension: "popularity".to_string(),
                score: popularity,
                detail: popularity_detail,
            },
            DimensionScore {
                dimension: "community".to_string(),
                score: community,
                detail: community_detail,
            },
            DimensionScore {
                dimension: "security".to_string(),
                score: security,
                detail: security_detail,
            },
            DimensionScore {
                dimension: "license".to_string(),
                score: license,
                detail: license_detail,
            },
            DimensionScore {
                dimension: "versioning".to_string(),
                score: versioning,
                detail: versioning_detail,
            },
        ];

        Ok(ScoreRecord {
            project: metrics.project.clone(),
            popularity,
            community,
            security,
            license,
            versioning,
            composite,
            computed_at,
            breakdown,
        })
    }
}
