use super::normalize::{available_weighted_mean, norm, round2};
use crate::error::{Result, ScoreError};
use crate::metrics::types::{Release, ReleaseHistory};
use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Expected cadence baselines: quarterly minors, ~20 patches a year.
const MINOR_CADENCE_DAYS: f64 = 365.0 / 3.0;
const PATCH_CADENCE_DAYS: f64 = 365.0 / 18.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReleaseKind {
    Major,
    Minor,
    Patch,
}

#[derive(Debug, Clone)]
struct TaggedRelease {
    at: DateTime<Utc>,
    triple: (u64, u64, u64),
    kind: Option<ReleaseKind>,
}

/// Derived versioning figures, kept for the breakdown display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersioningMetrics {
    pub majors: u64,
    pub minors: u64,
    pub patches: u64,
    /// Mean days between consecutive releases of each type.
    pub major_meantime: Option<f64>,
    pub minor_meantime: Option<f64>,
    pub patch_meantime: Option<f64>,
    pub age_days: Option<f64>,
    pub sum_metric: f64,
    pub time_metric: Option<f64>,
    pub freq_metric: Option<f64>,
}

/// Score the release history: the mean of the non-null metrics among
/// {sum, time, freq}, rescaled to 0..=100. Null metrics are excluded from
/// the mean, never averaged in as 0. A history with no classifiable
/// releases has no versioning signal at all.
pub fn versioning_score(history: &ReleaseHistory) -> Result<(f64, VersioningMetrics)> {
    let tagged = tag_releases(&history.releases);
    if tagged.is_empty() {
        return Err(ScoreError::NoVersioningSignal);
    }

    let majors = count_kind(&tagged, ReleaseKind::Major);
    let minors = count_kind(&tagged, ReleaseKind::Minor);
    let patches = count_kind(&tagged, ReleaseKind::Patch);

    let (major_deltas, minor_deltas, patch_deltas) = collect_deltas(&tagged);
    let major_meantime = mean(&major_deltas);
    let minor_meantime = mean(&minor_deltas);
    let patch_meantime = mean(&patch_deltas);

    let age_days = {
        let age = days_between(tagged[0].at, history.observed_at);
        (age > 0.0).then_some(age)
    };

    let sum = sum_metric(majors, minors, patches);
    let time = time_metric(major_meantime, minor_meantime, patch_meantime);
    let freq = freq_metric(minors, patches, age_days);

    let metrics = VersioningMetrics {
        majors,
        minors,
        patches,
        major_meantime,
        minor_meantime,
        patch_meantime,
        age_days,
        sum_metric: sum,
        time_metric: time,
        freq_metric: freq,
    };

    let parts = [(1.0, Some(sum)), (1.0, time), (1.0, freq)];
    let score = available_weighted_mean(&parts).ok_or(ScoreError::NoVersioningSignal)?;
    Ok((round2(100.0 * score), metrics))
}

/// Weighted release count: majors weigh 5, minors 2, patches 1.
pub fn sum_metric(majors: u64, minors: u64, patches: u64) -> f64 {
    (5.0 * majors as f64 + 2.0 * minors as f64 + patches as f64) / 8.0
}

/// Inverse-meantime mix: faster consecutive releases of a type push the
/// metric up, majors weighted hardest. A type needs at least two releases
/// for its meantime to exist; types without one contribute nothing, and
/// with no defined term the metric is null rather than a misleading 0.
fn time_metric(
    major_meantime: Option<f64>,
    minor_meantime: Option<f64>,
    patch_meantime: Option<f64>,
) -> Option<f64> {
    let weighted = [
        (6.0, major_meantime),
        (4.0, minor_meantime),
        (2.0, patch_meantime),
    ];
    let x: f64 = weighted
        .iter()
        .filter_map(|(w, mt)| match mt {
            Some(mt) if *mt > 0.0 => Some(w / mt),
            _ => None,
        })
        .sum();
    (x > 0.0).then(|| norm(x))
}

/// Minor/patch release rate against the expected cadences. Null when the
/// age is unknown or when the project has no minor or patch releases to
/// rate (a zero here would punish young single-release projects twice).
fn freq_metric(minors: u64, patches: u64, age_days: Option<f64>) -> Option<f64> {
    let age = age_days?;
    if minors + patches == 0 {
        return None;
    }
    let minor_frequency = minors as f64 * MINOR_CADENCE_DAYS / age;
    let patch_frequency = patches as f64 * PATCH_CADENCE_DAYS / age;
    Some(norm(minor_frequency + patch_frequency))
}

/// Order the raw events chronologically, drop pre-release builds (unless the
/// project only ever shipped pre-releases), parse the version triples, and
/// classify each transition by its first differing component.
fn tag_releases(releases: &[Release]) -> Vec<TaggedRelease> {
    let mut ordered: Vec<&Release> = releases.iter().collect();
    ordered.sort_by_key(|r| r.published_at);

    let stable: Vec<&Release> = ordered
        .iter()
        .copied()
        .filter(|r| !is_prerelease(&r.version))
        .collect();
    let ordered = if stable.is_empty() { ordered } else { stable };

    let mut tagged: Vec<TaggedRelease> = Vec::with_capacity(ordered.len());
    for release in ordered {
        let Some(triple) = parse_triple(&release.version) else {
            tracing::debug!(version = release.version.as_str(), "unparseable version");
            continue;
        };
        let kind = tagged.last().and_then(|prev| classify(prev.triple, triple));
        tagged.push(TaggedRelease {
            at: release.published_at,
            triple,
            kind,
        });
    }
    tagged
}

fn classify(prev: (u64, u64, u64), current: (u64, u64, u64)) -> Option<ReleaseKind> {
    if prev.0 != current.0 {
        Some(ReleaseKind::Major)
    } else if prev.1 != current.1 {
        Some(ReleaseKind::Minor)
    } else if prev.2 != current.2 {
        Some(ReleaseKind::Patch)
    } else {
        None
    }
}

fn is_prerelease(version: &str) -> bool {
    let v = version.trim().trim_start_matches(['v', 'V']);
    if let Ok(parsed) = semver::Version::parse(v) {
        return !parsed.pre.is_empty();
    }
    let lower = v.to_ascii_lowercase();
    ["rc", "dev", "nightly"].iter().any(|m| lower.contains(m))
}

/// Lenient triple parse: strict semver first, then pad registry-style
/// `X` / `X.Y` numbers and ignore anything past the third component.
fn parse_triple(version: &str) -> Option<(u64, u64, u64)> {
    let v = version.trim().trim_start_matches(['v', 'V']);
    if let Ok(parsed) = semver::Version::parse(v) {
        return Some((parsed.major, parsed.minor, parsed.patch));
    }

    let mut parts = v.split('.');
    let major = leading_number(parts.next()?)?;
    let minor = parts.next().map_or(Some(0), leading_number)?;
    let patch = parts.next().map_or(Some(0), leading_number)?;
    Some((major, minor, patch))
}

fn leading_number(part: &str) -> Option<u64> {
    let end = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    part[..end].parse().ok()
}

fn count_kind(tagged: &[TaggedRelease], kind: ReleaseKind) -> u64 {
    tagged.iter().filter(|t| t.kind == Some(kind)).count() as u64
}

/// Per-type gaps in days between consecutive releases of that type.
///
/// Projects maintaining several major lines in parallel interleave their
/// release dates, which would turn cross-line gaps into noise; for those,
/// gaps are measured within each major line, and the major gaps between the
/// first release of each line.
fn collect_deltas(tagged: &[TaggedRelease]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    if has_parallel_lines(tagged) {
        return collect_parallel_deltas(tagged);
    }

    let deltas_for = |kind: ReleaseKind| -> Vec<f64> {
        let dates: Vec<DateTime<Utc>> = tagged
            .iter()
            .filter(|t| t.kind == Some(kind))
            .map(|t| t.at)
            .collect();
        positive_gaps(&dates)
    };

    (
        deltas_for(ReleaseKind::Major),
        deltas_for(ReleaseKind::Minor),
        deltas_for(ReleaseKind::Patch),
    )
}

/// A major component that drops at least 3 times across the chronological
/// series signals several maintained lines (e.g. 1.x security fixes shipped
/// alongside 2.x features).
fn has_parallel_lines(tagged: &[TaggedRelease]) -> bool {
    let mut drops = 0;
    for pair in tagged.windows(2) {
        if pair[1].triple.0 < pair[0].triple.0 {
            drops += 1;
            if drops >= 3 {
                return true;
            }
        }
    }
    false
}

fn collect_parallel_deltas(tagged: &[TaggedRelease]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut lines: Vec<u64> = tagged.iter().map(|t| t.triple.0).collect();
    lines.sort_unstable();
    lines.dedup();

    let mut major_firsts = Vec::with_capacity(lines.len());
    let mut minor_deltas = Vec::new();
    let mut patch_deltas = Vec::new();

    for line in lines {
        let series: Vec<&TaggedRelease> =
            tagged.iter().filter(|t| t.triple.0 == line).collect();
        major_firsts.push(series[0].at);

        let mut prev_triple = series[0].triple;
        let mut prev_minor_at = series[0].at;
        let mut prev_patch_at = series[0].at;
        for release in &series[1..] {
            if release.triple.1 != prev_triple.1 {
                let gap = days_between(prev_minor_at, release.at);
                if gap > 0.0 {
                    minor_deltas.push(gap);
                }
                prev_minor_at = release.at;
                prev_patch_at = release.at;
            } else if release.triple.2 != prev_triple.2 {
                let gap = days_between(prev_patch_at, release.at);
                if gap > 0.0 {
                    patch_deltas.push(gap);
                }
                prev_patch_at = release.at;
            }
            prev_triple = release.triple;
        }
    }

    (positive_gaps(&major_firsts), minor_deltas, patch_deltas)
}

fn positive_gaps(dates: &[DateTime<Utc>]) -> Vec<f64> {
    dates
        .windows(2)
        .map(|pair| days_between(pair[0], pair[1]))
        .filter(|&gap| gap > 0.0)
        .collect()
}

fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / SECONDS_PER_DAY
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(offset: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + Duration::days(offset)
    }

    fn history(events: &[(&str, i64)], observed_day: i64) -> ReleaseHistory {
        ReleaseHistory {
            releases: events
                .iter()
                .map(|&(version, offset)| Release {
                    version: version.to_string(),
                    published_at: day(offset),
                })
                .collect(),
            observed_at: day(observed_day),
        }
    }

    #[test]
    fn test_classification_by_first_differing_component() {
        let tagged = tag_releases(&history(
            &[("0.1.0", 0), ("0.2.0", 10), ("1.0.0", 20), ("1.0.1", 30)],
            40,
        )
        .releases);
        let kinds: Vec<Option<ReleaseKind>> = tagged.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                None,
                Some(ReleaseKind::Minor),
                Some(ReleaseKind::Major),
                Some(ReleaseKind::Patch),
            ]
        );
    }

    #[test]
    fn test_single_major_fixture() {
        // One 0.x seed plus the 1.0.0 release: exactly one derived major,
        // nothing else. sum = 5/8, the other two metrics are null, so the
        // score is the mean over the single metric.
        let (score, metrics) = versioning_score(&history(&[("0.1.0", 0), ("1.0.0", 10)], 100)).unwrap();
        assert_eq!((metrics.majors, metrics.minors, metrics.patches), (1, 0, 0));
        assert_eq!(metrics.sum_metric, 0.625);
        assert_eq!(metrics.time_metric, None);
        assert_eq!(metrics.freq_metric, None);
        assert_eq!(score, 62.5);
    }

    #[test]
    fn test_sum_metric_weights() {
        assert_eq!(sum_metric(1, 0, 0), 0.625);
        assert_eq!(sum_metric(0, 1, 0), 0.25);
        assert_eq!(sum_metric(0, 0, 1), 0.125);
        assert_eq!(sum_metric(1, 1, 1), 1.0);
    }

    #[test]
    fn test_time_metric_needs_two_releases_of_a_type() {
        assert_eq!(time_metric(None, None, None), None);
        let t = time_metric(Some(100.0), None, None).unwrap();
        assert!((t - norm(6.0 / 100.0)).abs() < 1e-12);
    }

    #[test]
    fn test_time_metric_from_history() {
        // Three majors, 100 days apart: two major gaps, meantime 100.
        let (_, metrics) =
            versioning_score(&history(&[("1.0.0", 0), ("2.0.0", 100), ("3.0.0", 200)], 300))
                .unwrap();
        assert_eq!(metrics.major_meantime, Some(100.0));
        let expected = norm(6.0 / 100.0);
        assert!((metrics.time_metric.unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_freq_metric_against_cadence() {
        // One year old, 3 minors and 18 patches: exactly the expected
        // cadences, so each frequency is 1.
        let freq = freq_metric(3, 18, Some(365.0)).unwrap();
        assert!((freq - norm(2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_freq_metric_null_without_minor_or_patch_releases() {
        assert_eq!(freq_metric(0, 0, Some(365.0)), None);
        assert_eq!(freq_metric(3, 18, None), None);
    }

    #[test]
    fn test_empty_history_has_no_signal() {
        let err = versioning_score(&history(&[], 10)).unwrap_err();
        assert_eq!(err, ScoreError::NoVersioningSignal);
    }

    #[test]
    fn test_unparseable_versions_have_no_signal() {
        let err = versioning_score(&history(&[("latest", 0), ("stable", 5)], 10)).unwrap_err();
        assert_eq!(err, ScoreError::NoVersioningSignal);
    }

    #[test]
    fn test_prereleases_are_dropped() {
        let tagged = tag_releases(&history(
            &[("1.0.0", 0), ("1.1.0-rc.1", 5), ("1.1.0", 10)],
            20,
        )
        .releases);
        assert_eq!(tagged.len(), 2);
        assert_eq!(tagged[1].triple, (1, 1, 0));
    }

    #[test]
    fn test_all_prerelease_history_is_kept() {
        // A project that only ever shipped nightlies still gets classified.
        let tagged = tag_releases(&history(
            &[("1.0.0-rc.1", 0), ("1.0.0-rc.2", 5)],
            20,
        )
        .releases);
        assert_eq!(tagged.len(), 2);
    }

    #[test]
    fn test_lenient_version_parsing() {
        assert_eq!(parse_triple("v1.2.3"), Some((1, 2, 3)));
        assert_eq!(parse_triple("2"), Some((2, 0, 0)));
        assert_eq!(parse_triple("1.4"), Some((1, 4, 0)));
        assert_eq!(parse_triple("1.2.3.4"), Some((1, 2, 3)));
        assert_eq!(parse_triple("2021a"), Some((2021, 0, 0)));
        assert_eq!(parse_triple("latest"), None);
    }

    #[test]
    fn test_parallel_lines_detected() {
        // 1.x and 2.x maintained side by side: the major component drops
        // three times across the chronological series.
        let h = history(
            &[
                ("1.0.0", 0),
                ("2.0.0", 10),
                ("1.0.1", 20),
                ("2.0.1", 30),
                ("1.0.2", 40),
                ("2.0.2", 50),
                ("1.0.3", 60),
            ],
            70,
        );
        let tagged = tag_releases(&h.releases);
        assert!(has_parallel_lines(&tagged));

        // Patch gaps are measured within each line: 20 days apart in both
        // the 1.x and 2.x series, not the interleaved 10.
        let (_, metrics) = versioning_score(&h).unwrap();
        assert_eq!(metrics.patch_meantime, Some(20.0));
    }

    #[test]
    fn test_interleaved_but_few_drops_is_not_parallel() {
        let h = history(&[("1.0.0", 0), ("2.0.0", 10), ("1.0.1", 20), ("2.0.1", 30)], 40);
        let tagged = tag_releases(&h.releases);
        assert!(!has_parallel_lines(&tagged));
    }

    #[test]
    fn test_score_in_range_for_active_project() {
        let (score, _) = versioning_score(&history(
            &[
                ("1.0.0", 0),
                ("1.1.0", 30),
                ("1.1.1", 45),
                ("1.2.0", 90),
                ("2.0.0", 180),
                ("2.0.1", 200),
            ],
            365,
        ))
        .unwrap();
        assert!(score > 0.0 && score <= 100.0, "got {}", score);
    }
}
