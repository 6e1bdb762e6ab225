use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Could not load {path}: {reason}")]
    DataLoad { path: String, reason: String },

    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("Not enough data: correlation needs at least 2 rows, got {rows}")]
    InsufficientData { rows: usize },

    #[error("Unknown aggregate: {0}")]
    UnknownAggregate(String),

    #[error("Unknown branch: {0}")]
    UnknownBranch(String),

    #[error("Unknown product line: {0}")]
    UnknownProductLine(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

impl DashError {
    pub fn data_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Recoverable errors reject a single interaction; the rest halt the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidRange { .. } | Self::InsufficientData { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classes() {
        let from = NaiveDate::from_ymd_opt(2019, 3, 2).unwrap();
        let to = NaiveDate::from_ymd_opt(2019, 3, 1).unwrap();
        assert!(DashError::InvalidRange { from, to }.is_recoverable());
        assert!(DashError::InsufficientData { rows: 1 }.is_recoverable());
        assert!(!DashError::data_load("data.csv", "missing").is_recoverable());
    }

    #[test]
    fn test_messages() {
        let from = NaiveDate::from_ymd_opt(2019, 3, 2).unwrap();
        let to = NaiveDate::from_ymd_opt(2019, 3, 1).unwrap();
        assert_eq!(
            DashError::InvalidRange { from, to }.to_string(),
            "Invalid date range: 2019-03-02 is after 2019-03-01"
        );
        assert_eq!(
            DashError::data_load("data.csv", "missing column: Total").to_string(),
            "Could not load data.csv: missing column: Total"
        );
    }
}
