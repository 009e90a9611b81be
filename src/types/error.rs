//! Error types for the expense summary engine
//!
//! This module defines all error conditions the pipeline can surface.
//! Errors are descriptive and user-facing: the CLI prints them verbatim.
//!
//! # Error Categories
//!
//! - **Input errors**: empty upload, unreadable/corrupt workbook
//! - **Data errors**: a data row whose amount cell is not numeric
//! - **Configuration errors**: malformed or empty category rule table
//! - **Output errors**: failure while building the summary workbook
//!
//! Unresolvable categories and empty descriptions are never errors; those
//! rows flow into the uncategorized passthrough block instead.

use thiserror::Error;

/// Main error type for the expense summary engine
///
/// Every fatal condition is reported exactly once, synchronously, and no
/// partial output artifact is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SummaryError {
    /// The input file contains no bytes
    ///
    /// Rejected before the core pipeline is invoked.
    #[error("Input file is empty")]
    EmptyInput,

    /// The input workbook could not be read
    ///
    /// Covers unreadable files, corrupt containers, and workbooks without a
    /// sheet. Fatal; no output is produced.
    #[error("Failed to read input workbook: {message}")]
    InputRead {
        /// Description of the read failure
        message: String,
    },

    /// A data row's amount cell could not be interpreted as a number
    ///
    /// The amount is structurally required, unlike the description. Fatal in
    /// strict mode; skipped and counted in lenient mode.
    #[error("Invalid value at column {column} (row {row})")]
    InvalidAmount {
        /// 0-based row index in the source sheet
        row: usize,
        /// 0-based column index of the amount cell
        column: usize,
    },

    /// The category rule table could not be loaded
    ///
    /// Covers unreadable rule files, malformed TOML, and empty rule lists.
    /// Fatal before any input row is read.
    #[error("Failed to load category rules: {message}")]
    RulesLoad {
        /// Description of the load failure
        message: String,
    },

    /// The output workbook could not be built or written
    #[error("Failed to build output workbook: {message}")]
    OutputBuild {
        /// Description of the write failure
        message: String,
    },
}

impl From<calamine::Error> for SummaryError {
    fn from(error: calamine::Error) -> Self {
        SummaryError::InputRead {
            message: error.to_string(),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for SummaryError {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        SummaryError::OutputBuild {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl SummaryError {
    /// Create an InputRead error
    pub fn input_read(message: impl Into<String>) -> Self {
        SummaryError::InputRead {
            message: message.into(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(row: usize, column: usize) -> Self {
        SummaryError::InvalidAmount { row, column }
    }

    /// Create a RulesLoad error
    pub fn rules_load(message: impl Into<String>) -> Self {
        SummaryError::RulesLoad {
            message: message.into(),
        }
    }

    /// Create an OutputBuild error
    pub fn output_build(message: impl Into<String>) -> Self {
        SummaryError::OutputBuild {
            message: message.into(),
        }
    }
}
