use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;
use terminal_size::{terminal_size, Width};

use crate::scoring::ScoreRecord;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with two decimals, the precision scores carry everywhere.
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// An undefined sub-score renders as a dash, visibly distinct from 0.00.
fn format_sub_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{:.2}", s),
        None => "-".to_string(),
    }
}

/// Human-friendly "how long ago" for a record timestamp, truncated to
/// minutes so the output stays short.
pub fn format_since(computed_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - computed_at).num_seconds().max(0) as u64;
    if seconds < 60 {
        return "just now".to_string();
    }
    let truncated = Duration::from_secs(seconds / 60 * 60);
    format!("{} ago", humantime::format_duration(truncated))
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a project name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format records as a ranked table: index, composite, project, sub-scores.
/// Index column: 3 chars (fits "99."), right-aligned
/// Composite column is right-aligned, 7 chars wide
pub fn format_ranked_table(records: &[&ScoreRecord], use_colors: bool) -> String {
    if records.is_empty() {
        return "No scored projects found.".to_string();
    }

    let term_width = get_terminal_width();
    let index_width = 3;
    let score_width = 7;
    let separator = "  ";

    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let index = format!("{:>width$}", format!("{}.", idx + 1), width = index_width);
            let composite = format!("{:>width$}", format_score(record.composite), width = score_width);
            let subs = format!(
                "pop {}  com {}  sec {}  lic {}  ver {}",
                format_sub_score(record.popularity),
                format_sub_score(record.community),
                format_sub_score(record.security),
                format_sub_score(record.license),
                format_sub_score(record.versioning),
            );

            // Whatever the terminal leaves after the fixed columns goes to
            // the project name.
            let fixed = index_width + score_width + subs.len() + 3 * separator.len();
            let name = match term_width {
                Some(w) if w > fixed + 8 => truncate_name(&record.project, w - fixed),
                Some(_) => truncate_name(&record.project, 24),
                None => record.project.clone(),
            };

            if use_colors {
                format!(
                    "{}{}{}{}{}{}{}",
                    index.dimmed(),
                    separator,
                    composite.bold(),
                    separator,
                    name.cyan(),
                    separator,
                    subs.dimmed()
                )
            } else {
                format!(
                    "{}{}{}{}{}{}{}",
                    index, separator, composite, separator, name, separator, subs
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line breakdown for one project (the lookup view).
pub fn format_record_detail(record: &ScoreRecord, now: DateTime<Utc>, use_colors: bool) -> String {
    let mut lines = Vec::with_capacity(record.breakdown.len() + 2);

    let header = if use_colors {
        format!(
            "{}  {}  ({})",
            record.project.bold(),
            format_score(record.composite).bold(),
            format_since(record.computed_at, now)
        )
    } else {
        format!(
            "{}  {}  ({})",
            record.project,
            format_score(record.composite),
            format_since(record.computed_at, now)
        )
    };
    lines.push(header);

    for dim in &record.breakdown {
        let score = format!("{:>7}", format_sub_score(dim.score));
        let line = if use_colors {
            match dim.score {
                Some(_) => format!(
                    "  {:<11}{}  {}",
                    dim.dimension,
                    score.bold(),
                    dim.detail.dimmed()
                ),
                None => format!(
                    "  {:<11}{}  {}",
                    dim.dimension.dimmed(),
                    score.dimmed(),
                    dim.detail.dimmed()
                ),
            }
        } else {
            format!("  {:<11}{}  {}", dim.dimension, score, dim.detail)
        };
        lines.push(line);
    }

    lines.join("\n")
}
