//! Error types for the billing engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for the failures that can stop a billing run: configuration problems,
//! unreadable input tables, and output files that cannot be written.
//!
//! Problems with an individual attendance record are not errors in this
//! sense. They are reported as [`ErrorReason`](crate::models::ErrorReason)s
//! inside an [`ErrorRecord`](crate::models::ErrorRecord) and never abort
//! the batch.

use thiserror::Error;

/// The main error type for the billing engine.
///
/// # Example
///
/// ```
/// use billing_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/billing.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/billing.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds a value the engine cannot use.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// An input table was not found.
    #[error("Input file not found: {path}")]
    InputNotFound {
        /// The path that was not found.
        path: String,
    },

    /// An input table could not be read as CSV.
    #[error("Failed to read input file '{path}' at line {line}: {message}")]
    InputParseError {
        /// The path of the input table.
        path: String,
        /// The 1-based line of the failure (0 when unknown).
        line: u64,
        /// A description of the parse error.
        message: String,
    },

    /// A column the engine cannot default is absent from an input table.
    #[error("Input file '{path}' is missing required column '{column}'")]
    MissingColumn {
        /// The path of the input table.
        path: String,
        /// The missing column header.
        column: String,
    },

    /// An output file or directory could not be written.
    #[error("Failed to write output '{path}': {message}")]
    OutputError {
        /// The path being written.
        path: String,
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/billing.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/billing.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_config_displays_field_and_message() {
        let error = EngineError::InvalidConfig {
            field: "billing.month".to_string(),
            message: "must be between 1 and 12, got 13".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration field 'billing.month': must be between 1 and 12, got 13"
        );
    }

    #[test]
    fn test_input_parse_error_displays_line() {
        let error = EngineError::InputParseError {
            path: "data/attendance.csv".to_string(),
            line: 7,
            message: "found record with 3 fields".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to read input file 'data/attendance.csv' at line 7: found record with 3 fields"
        );
    }

    #[test]
    fn test_missing_column_displays_path_and_column() {
        let error = EngineError::MissingColumn {
            path: "data/attendance.csv".to_string(),
            column: "Billing Cycle".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Input file 'data/attendance.csv' is missing required column 'Billing Cycle'"
        );
    }

    #[test]
    fn test_output_error_displays_path_and_message() {
        let error = EngineError::OutputError {
            path: "out/Master_Summary.csv".to_string(),
            message: "permission denied".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to write output 'out/Master_Summary.csv': permission denied"
        );
    }

    #[test]
    fn test_input_errors_propagate_unchanged() {
        fn read_table() -> EngineResult<Vec<String>> {
            Err(EngineError::InputNotFound {
                path: "data/charges.csv".to_string(),
            })
        }

        fn run() -> EngineResult<usize> {
            let rows = read_table()?;
            Ok(rows.len())
        }

        match run() {
            Err(EngineError::InputNotFound { path }) => assert_eq!(path, "data/charges.csv"),
            other => panic!("expected InputNotFound, got {:?}", other),
        }
    }
}
