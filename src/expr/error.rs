//! Expression error types
//!
//! Any of these aborts the surrounding template resolution; the caller sees
//! the terminal error message through `Display`, never a partially
//! substituted template.

use thiserror::Error;

/// Errors that can occur while parsing or evaluating an expression
#[derive(Error, Debug)]
pub enum EvalError {
    /// Expression parsing failed
    #[error("parse error: {0}")]
    Parse(String),

    /// The callee is not in the function library
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// A function was invoked with the wrong number of arguments
    #[error("{function} expects {expected} argument(s), got {got}")]
    Arity {
        /// The offending callee
        function: String,
        /// Human-readable accepted count ("1", "0 or 1", ...)
        expected: &'static str,
        /// Arguments actually supplied
        got: usize,
    },

    /// A function argument did not evaluate to a dataset
    #[error("{function} expects a dataset argument")]
    InvalidArgument {
        /// The offending callee
        function: String,
    },

    /// An operator was applied to operand shapes it does not support
    #[error("unsupported operands for '{op}'")]
    InvalidOperands {
        /// The offending operator
        op: String,
    },

    /// `dataset()` was called with something other than a whole number id
    #[error("dataset id must be a non-negative integer")]
    InvalidDatasetId,

    /// `dataset()` named an id the collection does not hold
    #[error("dataset {0} does not exist")]
    UnknownDataset(usize),

    /// A zero-argument function found no non-x-axis series to default to
    #[error("no dataset available to evaluate")]
    NoDefaultSeries,

    /// A date-valued statistic has no run of days to report
    #[error("{function}: no matching days in the series")]
    NoData {
        /// The offending callee
        function: String,
    },

    /// The `::` format string could not be applied
    #[error("invalid format string: '{0}'")]
    BadFormat(String),

    /// The marker evaluated to a whole series, which has no textual form
    #[error("expression result is a series and cannot be substituted into text")]
    SeriesSubstitution,
}

/// Result type for expression operations
pub type EvalResult<T> = Result<T, EvalError>;
