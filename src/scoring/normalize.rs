//! Normalization primitives shared by the sub-calculators.
//!
//! Two distinct transforms are used throughout the scoring formulas and must
//! not be conflated: `logscale` squashes a count into [0, 1), `s_shape`
//! compresses toward a soft ceiling. Some formulas use the composition
//! (`norm`), others apply `s_shape` directly to raw counts or ratios.

/// Map a non-negative value into [0, 1) with diminishing returns.
pub fn logscale(x: f64) -> f64 {
    let x = x.max(0.0);
    x / (x + 1.0)
}

/// ln(1 + x), a late-saturating compression.
pub fn s_shape(x: f64) -> f64 {
    (1.0 + x.max(0.0)).ln()
}

/// Composed normalizer `s_shape(logscale(x))`, in [0, ln 2) for x >= 0.
pub fn norm(x: f64) -> f64 {
    s_shape(logscale(x))
}

/// Divide, yielding 0 when the denominator is zero. Undefined ratios
/// contribute nothing to their sub-formula instead of raising an error.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Weighted mean over the components that are present, with the weights
/// renormalized over the available ones. Returns None when no component is
/// available. Absent components are excluded, never treated as 0.
pub fn available_weighted_mean(parts: &[(f64, Option<f64>)]) -> Option<f64> {
    let mut total = 0.0;
    let mut weight_sum = 0.0;
    for (weight, value) in parts {
        if let Some(value) = value {
            total += weight * value;
            weight_sum += weight;
        }
    }
    if weight_sum == 0.0 {
        None
    } else {
        Some(total / weight_sum)
    }
}

/// Round to two decimal places, the precision every reported score uses.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
