use std::collections::HashMap;

use tracing::debug;

use crate::model::{ExamReport, Mark, Outcome, PassRateExtremes, StudentResult, Subject};
use crate::report::types::{OrderedMap, StudentAggregate, SubjectPassRate, SubjectTopScore};

/// First line of every report.
pub const REPORT_HEADER: &str = "Exam Report:";

/// Builds a name lookup over `subjects`. The first definition of a name wins.
fn index_subjects(subjects: &[Subject]) -> HashMap<&str, &Subject> {
    let mut index = HashMap::with_capacity(subjects.len());
    for subject in subjects {
        index.entry(subject.name.as_str()).or_insert(subject);
    }
    index
}

/// Joins marks against subjects and produces the exam report.
///
/// Marks whose subject is not defined are skipped entirely. Students, top
/// scorers and pass rates are all reported in the order their first joined
/// mark appears in `marks`, and that order also decides ties.
pub fn generate_report(subjects: &[Subject], marks: &[Mark]) -> ExamReport {
    let subject_index = index_subjects(subjects);

    let mut students: OrderedMap<StudentAggregate> = OrderedMap::new();
    let mut top_scores: OrderedMap<SubjectTopScore> = OrderedMap::new();
    let mut pass_rates: OrderedMap<SubjectPassRate> = OrderedMap::new();
    let mut dropped = 0usize;

    for mark in marks {
        let Some(subject) = subject_index.get(mark.subject_name.as_str()) else {
            dropped += 1;
            continue;
        };

        let passed = subject.is_pass(mark.marks_obtained);

        students
            .get_or_insert_with(&mark.student_name, StudentAggregate::default)
            .record(mark.marks_obtained, passed);

        match top_scores.get_mut(&mark.subject_name) {
            Some(top) if top.marks < mark.marks_obtained => {
                top.student_name = mark.student_name.clone();
                top.marks = mark.marks_obtained;
            }
            Some(_) => {}
            None => top_scores.insert(
                &mark.subject_name,
                SubjectTopScore {
                    student_name: mark.student_name.clone(),
                    marks: mark.marks_obtained,
                },
            ),
        }

        pass_rates
            .get_or_insert_with(&mark.subject_name, SubjectPassRate::default)
            .record(passed);
    }

    debug!(
        marks = marks.len(),
        dropped,
        students = students.len(),
        subjects = pass_rates.len(),
        "Marks joined against subjects"
    );

    let results: Vec<StudentResult> = students
        .iter()
        .map(|(name, agg)| StudentResult {
            student_name: name.to_string(),
            total_marks: agg.total_marks,
            subject_count: agg.subject_count,
            total_percentage: agg.total_percentage(),
            outcome: agg.outcome(),
        })
        .collect();

    let mut report_text = format!("{REPORT_HEADER}\n\n");
    for row in &results {
        report_text.push_str(&row.report_line());
        report_text.push('\n');
    }

    let failed_students = results
        .iter()
        .filter(|row| row.outcome == Outcome::Fail)
        .map(|row| row.student_name.clone())
        .collect();

    let top_scorer_by_subject = top_scores.map_values(|top| vec![top.student_name.clone()]);

    ExamReport {
        report_text,
        students: results,
        failed_students,
        top_scorer_by_subject,
        pass_rate_extremes: pass_rate_extremes(&pass_rates),
    }
}

/// Picks the subjects with the highest and lowest pass rate. Ties go to the
/// subject seen first.
fn pass_rate_extremes(pass_rates: &OrderedMap<SubjectPassRate>) -> PassRateExtremes {
    let mut extremes = PassRateExtremes::default();
    let mut highest = -1.0;
    let mut lowest = 101.0;

    for (subject, counter) in pass_rates.iter() {
        let rate = counter.pass_rate();
        if rate > highest {
            highest = rate;
            extremes.highest = subject.to_string();
        }
        if rate < lowest {
            lowest = rate;
            extremes.lowest = subject.to_string();
        }
    }

    extremes
}
