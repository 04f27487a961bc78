use chrono::Utc;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use oss_vitals::config::Config;
use oss_vitals::scoring::{LicenseTable, ScoreEngine, ScoreRecord};
use oss_vitals::store::ScoreFile;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a batch of collected project metrics
    Score {
        /// JSON file with one metrics record per project
        #[arg(long)]
        metrics: PathBuf,

        /// Where to write score records (defaults to the configured path)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Look up the stored score for one project
    Lookup {
        /// Project name as it appears in the metrics records
        project: String,
    },
    /// List stored scores ranked by composite (default if no subcommand)
    List,
    /// Write a starter config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "oss-vitals")]
#[command(about = "Composite health scores for open-source projects", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/oss-vitals/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::List);

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Init { force } = &command {
        let path = cli
            .config
            .clone()
            .map(PathBuf::from)
            .unwrap_or_else(oss_vitals::config::get_config_path);
        if let Err(e) = oss_vitals::config::write_starter_config(&path, *force) {
            eprintln!("Init error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Config written to {}", path.display());
        println!("Run `oss-vitals score --metrics <file>` to score a batch.");
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match oss_vitals::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    if let Err(errors) = oss_vitals::scoring::validate_scoring(&config.weights, &config.licenses) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    match command {
        Commands::Score { metrics, out } => run_score(&config, &metrics, out),
        Commands::Lookup { project } => run_lookup(&config, &project),
        Commands::List => run_list(&config),
        Commands::Init { .. } => unreachable!("handled before config load"),
    }
}

fn scores_path(config: &Config, out: Option<PathBuf>) -> PathBuf {
    out.or_else(|| config.scores_path.clone())
        .unwrap_or_else(oss_vitals::config::get_scores_path)
}

fn run_score(config: &Config, metrics_path: &Path, out: Option<PathBuf>) {
    let batch = match oss_vitals::metrics::load_metrics(metrics_path) {
        Ok(batch) => batch,
        Err(e) => {
            eprintln!("Metrics error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    if let Err(errors) = oss_vitals::metrics::validate_metrics(&batch) {
        eprintln!("Invalid metrics input:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_DATA);
    }

    let licenses = LicenseTable::builtin().with_overrides(&config.licenses);
    let engine = ScoreEngine::new(config.weights, licenses);
    let computed_at = Utc::now();

    tracing::info!(projects = batch.len(), "scoring batch");

    // Each record is scored independently; the batch parallelizes with no
    // synchronization beyond collecting results.
    let results: Vec<_> = batch
        .par_iter()
        .map(|metrics| engine.score_project(metrics, computed_at))
        .collect();

    let mut scored: Vec<ScoreRecord> = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(record) => scored.push(record),
            Err(e) => {
                // Partial failure: skip the project, keep the batch going.
                eprintln!("Skipping project: {}", e);
            }
        }
    }

    if scored.is_empty() && !batch.is_empty() {
        eprintln!("No project produced a score.");
        std::process::exit(EXIT_DATA);
    }

    let path = scores_path(config, out);
    let mut file = match oss_vitals::store::load_scores(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Score file error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    let mut fresh = ScoreFile::new();
    for record in scored {
        fresh.upsert(record.clone());
        file.upsert(record);
    }

    if let Err(e) = oss_vitals::store::save_scores(&path, &file) {
        eprintln!("Score file error: {:#}", e);
        std::process::exit(EXIT_DATA);
    }

    let use_colors = oss_vitals::output::should_use_colors();
    println!(
        "{}",
        oss_vitals::output::format_ranked_table(&fresh.ranked(), use_colors)
    );
    tracing::info!(
        scored = fresh.len(),
        path = %path.display(),
        "batch complete"
    );

    std::process::exit(EXIT_SUCCESS);
}

fn run_lookup(config: &Config, project: &str) {
    let path = scores_path(config, None);
    let file = match oss_vitals::store::load_scores(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Score file error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    // Exact match first, then a case-insensitive fallback.
    let record = file.get(project).or_else(|| {
        file.ranked()
            .into_iter()
            .find(|r| r.project.eq_ignore_ascii_case(project))
    });

    match record {
        Some(record) => {
            let use_colors = oss_vitals::output::should_use_colors();
            println!(
                "{}",
                oss_vitals::output::format_record_detail(record, Utc::now(), use_colors)
            );
            std::process::exit(EXIT_SUCCESS);
        }
        None => {
            eprintln!(
                "No score recorded for '{}' ({} projects in {}).",
                project,
                file.len(),
                path.display()
            );
            std::process::exit(EXIT_DATA);
        }
    }
}

fn run_list(config: &Config) {
    let path = scores_path(config, None);
    let file = match oss_vitals::store::load_scores(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Score file error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    let use_colors = oss_vitals::output::should_use_colors();
    println!(
        "{}",
        oss_vitals::output::format_ranked_table(&file.ranked(), use_colors)
    );
    std::process::exit(EXIT_SUCCESS);
}
