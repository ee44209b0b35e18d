// ⚠️ Error taxonomy
// Every failure here is recoverable: callers report it and keep their prior state

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Lookup or translation file does not exist
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// Header row is empty or lacks required columns
    #[error("{}: missing required columns ({})", .path.display(), .missing.join(", "))]
    MalformedHeader { path: PathBuf, missing: Vec<String> },

    /// Nothing to export
    #[error("no records to export")]
    EmptyInput,

    /// An 8-digit date that is not a calendar date
    #[error("invalid date: {0}")]
    DateFormat(String),

    /// Import source lacks required columns; nothing was merged
    #[error("import file must contain columns: {}", .0.join(", "))]
    ImportColumn(Vec<String>),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("document error: {0}")]
    Docx(String),

    #[error("config error: {0}")]
    Config(String),
}

impl ReportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }

    /// Warnings are shown and then ignored; everything else aborts the action
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            ReportError::MissingFile(_) | ReportError::MalformedHeader { .. } | ReportError::DateFormat(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// Result of a load that never fails outright
///
/// Loading a lookup table always produces a usable (possibly empty) value.
/// Anything that went wrong along the way lands in `warnings`.
#[derive(Debug)]
pub struct LoadOutcome<T> {
    pub value: T,
    pub warnings: Vec<ReportError>,
}

impl<T> LoadOutcome<T> {
    pub fn clean(value: T) -> Self {
        LoadOutcome {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(value: T, warning: ReportError) -> Self {
        LoadOutcome {
            value,
            warnings: vec![warning],
        }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_classification() {
        assert!(ReportError::MissingFile(PathBuf::from("a.csv")).is_warning());
        assert!(ReportError::MalformedHeader {
            path: PathBuf::from("a.csv"),
            missing: vec!["ID".to_string()],
        }
        .is_warning());
        assert!(!ReportError::EmptyInput.is_warning());
        assert!(!ReportError::ImportColumn(vec!["中文名".to_string()]).is_warning());
    }

    #[test]
    fn test_error_messages() {
        let err = ReportError::MalformedHeader {
            path: PathBuf::from("name_id_map.csv"),
            missing: vec!["中文名".to_string(), "ID".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "name_id_map.csv: missing required columns (中文名, ID)"
        );
        assert_eq!(ReportError::EmptyInput.to_string(), "no records to export");
    }

    #[test]
    fn test_load_outcome() {
        let outcome = LoadOutcome::clean(3);
        assert!(outcome.is_clean());

        let outcome = LoadOutcome::with_warning(0, ReportError::EmptyInput);
        assert!(!outcome.is_clean());
        assert_eq!(outcome.warnings.len(), 1);
    }
}
