//! Record shapes exchanged between the loaders, the aggregator and the output layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::report::types::OrderedMap;

/// A subject definition: its maximum score and the pass threshold as a
/// percentage of that maximum.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Subject {
    #[serde(rename = "SubjectName")]
    pub name: String,
    #[serde(rename = "TotalMarks")]
    pub total_marks: i64,
    #[serde(rename = "PassPercentage")]
    pub pass_percentage: f64,
}

impl Subject {
    pub fn new(name: &str, total_marks: i64, pass_percentage: f64) -> Self {
        Self {
            name: name.to_string(),
            total_marks,
            pass_percentage,
        }
    }

    /// Minimum score needed to pass. Not rounded.
    pub fn pass_marks(&self) -> f64 {
        self.total_marks as f64 * self.pass_percentage / 100.0
    }

    /// Inclusive threshold check.
    pub fn is_pass(&self, marks_obtained: i64) -> bool {
        marks_obtained as f64 >= self.pass_marks()
    }
}

/// One student's score on one subject.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Mark {
    pub student_name: String,
    pub subject_name: String,
    pub marks_obtained: i64,
}

impl Mark {
    pub fn new(student_name: &str, subject_name: &str, marks_obtained: i64) -> Self {
        Self {
            student_name: student_name.to_string(),
            subject_name: subject_name.to_string(),
            marks_obtained,
        }
    }
}

/// Overall result for a student, or the result of a single mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    pub fn from_passed(passed: bool) -> Self {
        if passed { Outcome::Pass } else { Outcome::Fail }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => f.write_str("Pass"),
            Outcome::Fail => f.write_str("Fail"),
        }
    }
}

/// Subjects with the best and worst pass rate. Empty strings when no mark
/// joined any subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PassRateExtremes {
    pub highest: String,
    pub lowest: String,
}

/// One finalized report row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentResult {
    pub student_name: String,
    pub total_marks: i64,
    pub subject_count: usize,
    pub total_percentage: f64,
    pub outcome: Outcome,
}

impl StudentResult {
    /// Formats the row as it appears in the report text, without the line break.
    pub fn report_line(&self) -> String {
        format!(
            "Student: {}, Total Marks: {}, Total Percentage: {:.2}%, Result: {}",
            self.student_name, self.total_marks, self.total_percentage, self.outcome
        )
    }
}

/// Everything produced by [`crate::report::generate_report`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExamReport {
    pub report_text: String,
    /// Per-student rows in first-appearance order.
    pub students: Vec<StudentResult>,
    pub failed_students: Vec<String>,
    pub top_scorer_by_subject: OrderedMap<Vec<String>>,
    pub pass_rate_extremes: PassRateExtremes,
}
