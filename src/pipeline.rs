//! One complete run: load both inputs, aggregate, then write the outputs.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::config::Settings;
use crate::loader::{CsvSource, load_all};
use crate::model::ExamReport;
use crate::output::{ReportSummary, log_summary, write_report, write_summary_json};
use crate::report::generate_report;

/// Runs the report for `settings` and returns it.
///
/// Nothing is written unless both inputs load. A failed report write aborts
/// the run before the summary JSON is written.
#[tracing::instrument(skip(settings), fields(report = %settings.report_path.display()))]
pub async fn run(settings: &Settings, summary_json: Option<&Path>) -> Result<ExamReport> {
    let source = CsvSource::new(&settings.subjects_path, &settings.marks_path);
    let (subjects, marks) = load_all(&source).await?;

    let report = generate_report(&subjects, &marks);

    write_report(&settings.report_path, &report.report_text)?;
    info!(
        path = %settings.report_path.display(),
        students = report.students.len(),
        "Report generated successfully"
    );

    log_summary(&report)?;

    if let Some(path) = summary_json {
        write_summary_json(path, &ReportSummary::new(&report, &settings.report_path))?;
        info!(path = %path.display(), "Summary JSON written");
    }

    Ok(report)
}
