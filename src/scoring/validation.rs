use super::config::Weights;
use super::license::LicenseEntry;
use std::collections::HashMap;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(
    weights: &Weights,
    license_overrides: &HashMap<String, LicenseEntry>,
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (name, weight) in weights.as_pairs() {
        if weight < 0.0 {
            errors.push(format!("weights.{}: must be non-negative", name));
        }
        if !weight.is_finite() {
            errors.push(format!("weights.{}: must be finite", name));
        }
    }

    let sum = weights.sum();
    if sum.is_finite() && (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        errors.push(format!(
            "weights: must sum to 1 across the five dimensions, got {}",
            sum
        ));
    }

    for (id, entry) in license_overrides {
        if id.trim().is_empty() {
            errors.push("licenses: empty license identifier".to_string());
        }
        if !(0.0..=100.0).contains(&entry.permissiveness) {
            errors.push(format!(
                "licenses.{}: permissiveness {} out of range (expected 0..=100)",
                id, entry.permissiveness
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
