//! Run settings: where to read subjects and marks, and where to write the report.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Paths used by a single run.
///
/// Stored as a JSON object on disk:
/// ```json
/// {
///   "masterDataFilePath": "data/subjects.csv",
///   "studentMarksFilePath": "data/marks.csv",
///   "reportOutputPath": "out/report.txt"
/// }
/// ```
/// Relative paths are resolved against the directory holding the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(rename = "masterDataFilePath")]
    pub subjects_path: PathBuf,
    #[serde(rename = "studentMarksFilePath")]
    pub marks_path: PathBuf,
    #[serde(rename = "reportOutputPath")]
    pub report_path: PathBuf,
}

/// Per-run replacements for individual settings, e.g. from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub subjects_path: Option<PathBuf>,
    pub marks_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from the JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        let base = path.parent().unwrap_or(Path::new(""));
        Ok(settings.resolved_against(base))
    }

    /// Loads settings from `path` and applies `overrides` on top.
    ///
    /// When every value is overridden the file is not read at all.
    pub fn load_with_overrides(path: &Path, overrides: Overrides) -> Result<Self> {
        if let Overrides {
            subjects_path: Some(subjects_path),
            marks_path: Some(marks_path),
            report_path: Some(report_path),
        } = &overrides
        {
            return Ok(Self {
                subjects_path: subjects_path.clone(),
                marks_path: marks_path.clone(),
                report_path: report_path.clone(),
            });
        }

        let mut settings = Self::load(path)?;
        if let Some(p) = overrides.subjects_path {
            settings.subjects_path = p;
        }
        if let Some(p) = overrides.marks_path {
            settings.marks_path = p;
        }
        if let Some(p) = overrides.report_path {
            settings.report_path = p;
        }
        Ok(settings)
    }

    fn resolved_against(self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        Self {
            subjects_path: resolve(self.subjects_path),
            marks_path: resolve(self.marks_path),
            report_path: resolve(self.report_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(dir: &Path) -> PathBuf {
        let path = dir.join("config.json");
        fs::write(
            &path,
            r#"{
                "masterDataFilePath": "data/subjects.csv",
                "studentMarksFilePath": "data/marks.csv",
                "reportOutputPath": "/tmp/report.txt"
            }"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path());

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.subjects_path, dir.path().join("data/subjects.csv"));
        assert_eq!(settings.marks_path, dir.path().join("data/marks.csv"));
        assert_eq!(settings.report_path, PathBuf::from("/tmp/report.txt"));
    }

    #[test]
    fn test_overrides_replace_individual_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path());

        let overrides = Overrides {
            report_path: Some(PathBuf::from("elsewhere.txt")),
            ..Default::default()
        };
        let settings = Settings::load_with_overrides(&path, overrides).unwrap();

        assert_eq!(settings.subjects_path, dir.path().join("data/subjects.csv"));
        assert_eq!(settings.report_path, PathBuf::from("elsewhere.txt"));
    }

    #[test]
    fn test_missing_file_is_fine_when_fully_overridden() {
        let overrides = Overrides {
            subjects_path: Some(PathBuf::from("s.csv")),
            marks_path: Some(PathBuf::from("m.csv")),
            report_path: Some(PathBuf::from("r.txt")),
        };

        let settings =
            Settings::load_with_overrides(Path::new("does/not/exist.json"), overrides).unwrap();

        assert_eq!(settings.marks_path, PathBuf::from("m.csv"));
    }

    #[test]
    fn test_malformed_file_is_ignored_when_fully_overridden() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let overrides = Overrides {
            subjects_path: Some(PathBuf::from("s.csv")),
            marks_path: Some(PathBuf::from("m.csv")),
            report_path: Some(PathBuf::from("r.txt")),
        };
        let settings = Settings::load_with_overrides(&path, overrides).unwrap();

        assert_eq!(settings.subjects_path, PathBuf::from("s.csv"));
        assert_eq!(settings.report_path, PathBuf::from("r.txt"));
    }

    #[test]
    fn test_malformed_file_is_an_error_when_partly_overridden() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let overrides = Overrides {
            subjects_path: Some(PathBuf::from("s.csv")),
            ..Default::default()
        };
        let err = Settings::load_with_overrides(&path, overrides).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_missing_file_is_an_error_otherwise() {
        let err = Settings::load_with_overrides(Path::new("does/not/exist.json"), Overrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "masterDataFilePath": "s.csv" }"#).unwrap();

        assert!(Settings::load(&path).is_err());
    }
}
