//! Output for a finished report.
//!
//! Writes the report text, logs the derived summaries, and optionally writes
//! them as a JSON document.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::model::{ExamReport, PassRateExtremes, StudentResult};
use crate::report::types::OrderedMap;

/// JSON form of a report's derived data.
#[derive(Debug, Serialize)]
pub struct ReportSummary<'a> {
    pub generated_at: DateTime<Utc>,
    pub report_path: PathBuf,
    pub students: &'a [StudentResult],
    pub failed_students: &'a [String],
    pub top_scorer_by_subject: &'a OrderedMap<Vec<String>>,
    pub pass_rate_extremes: &'a PassRateExtremes,
}

impl<'a> ReportSummary<'a> {
    pub fn new(report: &'a ExamReport, report_path: &Path) -> Self {
        Self {
            generated_at: Utc::now(),
            report_path: report_path.to_path_buf(),
            students: &report.students,
            failed_students: &report.failed_students,
            top_scorer_by_subject: &report.top_scorer_by_subject,
            pass_rate_extremes: &report.pass_rate_extremes,
        }
    }
}

/// Writes `text` to `path`, creating missing parent directories.
pub fn write_report(path: &Path, text: &str) -> Result<()> {
    create_parent_dir(path)?;
    fs::write(path, text)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    debug!(path = %path.display(), bytes = text.len(), "Report written");
    Ok(())
}

/// Writes `summary` as pretty-printed JSON to `path`.
pub fn write_summary_json(path: &Path, summary: &ReportSummary<'_>) -> Result<()> {
    create_parent_dir(path)?;
    let body = serde_json::to_string_pretty(summary)?;
    fs::write(path, body)
        .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    Ok(())
}

/// Logs the failed students, the top scorers and the pass-rate extremes.
pub fn log_summary(report: &ExamReport) -> Result<()> {
    info!(
        failed = %report.failed_students.join(", "),
        count = report.failed_students.len(),
        "Failed students"
    );
    info!(
        "Highest marks by subject: {}",
        serde_json::to_string_pretty(&report.top_scorer_by_subject)?
    );
    info!(
        highest = %report.pass_rate_extremes.highest,
        lowest = %report.pass_rate_extremes.lowest,
        "Subjects with highest and lowest pass percentage"
    );
    Ok(())
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}
