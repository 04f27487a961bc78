use super::normalize::round2;
use crate::error::{Result, ScoreError};
use crate::metrics::types::SecurityReport;

/// The named checks the external Scorecard tool emits. Reports may carry a
/// subset; unrecognized names still score but are logged by the input gate.
pub const SCORECARD_CHECKS: [&str; 16] = [
    "Binary-Artifacts",
    "Branch-Protection",
    "CI-Tests",
    "CII-Best-Practices",
    "Code-Review",
    "Contributors",
    "Dependency-Update-Tool",
    "Fuzzing",
    "Maintained",
    "Packaging",
    "Pinned-Dependencies",
    "SAST",
    "Security-Policy",
    "Signed-Releases",
    "Token-Permissions",
    "Vulnerabilities",
];

/// Mean over the checks that ran, rescaled from 0..=10 to 0..=100.
/// Checks that did not run are excluded from the mean, never counted as 0;
/// a report where nothing ran is a distinguishable error state.
pub fn security_score(report: &SecurityReport) -> Result<(f64, usize)> {
    let available: Vec<u8> = report.checks.values().filter_map(|v| *v).collect();
    if available.is_empty() {
        return Err(ScoreError::NoSecurityChecks);
    }

    let sum: u64 = available.iter().map(|&v| u64::from(v)).sum();
    let score = 100.0 * sum as f64 / (10.0 * available.len() as f64);
    Ok((round2(score), available.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn report(values: &[(&str, Option<u8>)]) -> SecurityReport {
        let mut checks = BTreeMap::new();
        for &(name, value) in values {
            checks.insert(name.to_string(), value);
        }
        SecurityReport { checks }
    }

    #[test]
    fn test_all_sixteen_perfect_checks_score_100() {
        let values: Vec<(&str, Option<u8>)> =
            SCORECARD_CHECKS.iter().map(|&c| (c, Some(10))).collect();
        let (score, available) = security_score(&report(&values)).unwrap();
        assert_eq!(score, 100.0);
        assert_eq!(available, 16);
    }

    #[test]
    fn test_all_null_checks_is_an_error() {
        let values: Vec<(&str, Option<u8>)> =
            SCORECARD_CHECKS.iter().map(|&c| (c, None)).collect();
        let err = security_score(&report(&values)).unwrap_err();
        assert_eq!(err, ScoreError::NoSecurityChecks);
    }

    #[test]
    fn test_empty_report_is_an_error() {
        assert_eq!(
            security_score(&report(&[])).unwrap_err(),
            ScoreError::NoSecurityChecks
        );
    }

    #[test]
    fn test_mean_over_available_only() {
        // Two checks ran (8 and 4), one did not. Mean is 6 -> 60, not
        // dragged down by the missing check.
        let r = report(&[
            ("Code-Review", Some(8)),
            ("Fuzzing", Some(4)),
            ("SAST", None),
        ]);
        let (score, available) = security_score(&r).unwrap();
        assert_eq!(score, 60.0);
        assert_eq!(available, 2);
    }

    #[test]
    fn test_single_check() {
        let (score, _) = security_score(&report(&[("Maintained", Some(7))])).unwrap();
        assert_eq!(score, 70.0);
    }

    #[test]
    fn test_check_name_list_is_complete() {
        assert_eq!(SCORECARD_CHECKS.len(), 16);
    }
}
