//! CLI entry point for the exam report generator.
//!
//! Loads subject definitions and student marks, writes the exam report and
//! logs the failed students, top scorers and pass-rate extremes.

use anyhow::Result;
use clap::Parser;
use exam_reporter::{
    config::{Overrides, Settings},
    pipeline,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "exam_reporter")]
#[command(about = "Generate an exam report from subject and mark CSVs", long_about = None)]
struct Cli {
    /// JSON config file with the input and output paths
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Subjects CSV (overrides masterDataFilePath)
    #[arg(long)]
    subjects: Option<PathBuf>,

    /// Marks CSV (overrides studentMarksFilePath)
    #[arg(long)]
    marks: Option<PathBuf>,

    /// Report destination (overrides reportOutputPath)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Optional: also write the summaries as JSON to this file
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/exam_reporter.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("exam_reporter.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %format!("{e:#}"), "Error generating report");
        return Err(e);
    }

    Ok(())
}

/// Resolves the settings from the config file and flags, then runs the report.
#[tracing::instrument(skip(cli), fields(config = %cli.config.display()))]
async fn run(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        subjects_path: cli.subjects,
        marks_path: cli.marks,
        report_path: cli.output,
    };
    let settings = Settings::load_with_overrides(&cli.config, overrides)?;

    pipeline::run(&settings, cli.summary_json.as_deref()).await?;
    Ok(())
}
