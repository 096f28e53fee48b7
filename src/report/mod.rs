//! Exam report aggregation.
//!
//! Joins marks against subject definitions, folds them into per-student and
//! per-subject accumulators, and derives the report text, the failed students,
//! the top scorer per subject and the pass-rate extremes.

pub mod aggregate;
pub mod types;
pub mod utility;

pub use aggregate::generate_report;
