//! Loading subject definitions and marks from their sources.
//!
//! [`RecordSource`] is the async seam the CLI loads through; [`CsvSource`]
//! reads the two CSV files the tool is configured with.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::model::{Mark, Subject};

/// Supplies already-parsed subjects and marks.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    async fn load_subjects(&self) -> Result<Vec<Subject>>;
    async fn load_marks(&self) -> Result<Vec<Mark>>;
}

/// Loads both collections concurrently and returns once both are complete.
///
/// # Errors
///
/// Returns the first load error; nothing is returned for the other source.
#[tracing::instrument(skip(source))]
pub async fn load_all<S: RecordSource + ?Sized>(source: &S) -> Result<(Vec<Subject>, Vec<Mark>)> {
    let (subjects, marks) = tokio::try_join!(source.load_subjects(), source.load_marks())?;
    info!(
        subjects = subjects.len(),
        marks = marks.len(),
        "Input records loaded"
    );
    Ok((subjects, marks))
}

/// Reads subjects and marks from two CSV files with header rows.
///
/// Subject columns: `SubjectName`, `TotalMarks`, `PassPercentage`.
/// Mark columns: `StudentName`, `SubjectName`, `MarksObtained`.
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub subjects_path: PathBuf,
    pub marks_path: PathBuf,
}

impl CsvSource {
    pub fn new(subjects_path: impl Into<PathBuf>, marks_path: impl Into<PathBuf>) -> Self {
        Self {
            subjects_path: subjects_path.into(),
            marks_path: marks_path.into(),
        }
    }
}

#[async_trait::async_trait]
impl RecordSource for CsvSource {
    async fn load_subjects(&self) -> Result<Vec<Subject>> {
        let path = self.subjects_path.clone();
        tokio::task::spawn_blocking(move || {
            read_csv::<Subject>(&path)
                .with_context(|| format!("Error reading subjects from {}", path.display()))
        })
        .await?
    }

    async fn load_marks(&self) -> Result<Vec<Mark>> {
        let path = self.marks_path.clone();
        tokio::task::spawn_blocking(move || {
            read_csv::<Mark>(&path)
                .with_context(|| format!("Error reading marks from {}", path.display()))
        })
        .await?
    }
}

/// Deserializes every row of the CSV file at `path`.
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: T = result?;
        rows.push(record);
    }

    debug!(path = %path.display(), rows = rows.len(), "CSV file read");
    Ok(rows)
}
