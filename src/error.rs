use thiserror::Error;

/// Errors produced by the score engine itself.
///
/// Missing optional data is not an error: it routes through the weight-table
/// variants or the metric-exclusion paths. These variants cover the states
/// that must stay distinguishable from a numeric score.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("unknown license identifier '{0}'")]
    UnknownLicense(String),
    #[error("no security checks available")]
    NoSecurityChecks,
    #[error("no versioning signal: all metrics are null")]
    NoVersioningSignal,
    #[error("no usable dimensions for project '{project}'")]
    NoUsableDimensions { project: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ScoreError>;
