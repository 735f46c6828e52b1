use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the inventory summary job.
#[derive(Error, Debug)]
pub enum SummaryError {
    /// An input file (extract, sales summary, config) could not be read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written to disk.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV record could not be decoded.
    #[error("Failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The CSV header row lacks a column the aggregator needs.
    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// An inventory amount cell was not a number.
    #[error("Invalid amount '{value}' at line {line} of {path}")]
    InvalidAmount {
        path: PathBuf,
        line: u64,
        value: String,
    },

    /// A JSON document could not be parsed or serialized.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A month label did not match the `YYYY.MM` convention.
    #[error("Invalid month label: {0}")]
    InvalidMonth(String),

    /// The pipeline configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O failure without a known path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the summary crates.
pub type Result<T> = std::result::Result<T, SummaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = SummaryError::FileRead {
            path: PathBuf::from("/data/inventory/2024.01.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("2024.01.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_file_write() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SummaryError::FileWrite {
            path: PathBuf::from("/out/summary.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to write file /out/summary.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_display_missing_column() {
        let err = SummaryError::MissingColumn {
            path: PathBuf::from("2024.01.csv"),
            column: "产品品牌".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required column '产品品牌' in 2024.01.csv"
        );
    }

    #[test]
    fn test_error_display_invalid_amount() {
        let err = SummaryError::InvalidAmount {
            path: PathBuf::from("2024.02.csv"),
            line: 17,
            value: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid amount 'abc' at line 17 of 2024.02.csv"
        );
    }

    #[test]
    fn test_error_display_invalid_month() {
        let err = SummaryError::InvalidMonth("2024-13".to_string());
        assert_eq!(err.to_string(), "Invalid month label: 2024-13");
    }

    #[test]
    fn test_error_display_config() {
        let err = SummaryError::Config("chunk_size must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: chunk_size must be at least 1"
        );
    }

    #[test]
    fn test_io_error_converts_with_question_mark() {
        fn open_missing() -> Result<String> {
            Ok(std::fs::read_to_string("/nonexistent/inventory/2024.01.csv")?)
        }
        assert!(matches!(open_missing(), Err(SummaryError::Io(_))));
    }

    #[test]
    fn test_malformed_sales_json_converts() {
        fn parse() -> Result<serde_json::Value> {
            Ok(serde_json::from_str("{\"brands\": ")?)
        }
        let err = parse().unwrap_err();
        assert!(matches!(err, SummaryError::JsonParse(_)));
        assert!(err.to_string().starts_with("Failed to parse JSON"));
    }
}
