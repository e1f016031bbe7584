//! Engine configuration
//!
//! The host hands the engine an already-deserialized [`TrackerConfig`]
//! describing what to search for and how to shape the output (YAML parsing
//! and the settings surface live host-side). Validation runs before any
//! extraction starts; a bad configuration never produces a partial result.

use crate::date::{is_valid_format, DEFAULT_DATE_FORMAT};
use crate::series::QueryKind;
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

/// Errors detected before extraction starts
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration names no queries
    #[error("no queries configured")]
    NoQueries,

    /// A query has an empty or whitespace-only target
    #[error("query {index} has an empty target")]
    EmptyTarget {
        /// Position of the offending query
        index: usize,
    },

    /// Explicit bounds are reversed
    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Configured start
        start: NaiveDate,
        /// Configured end
        end: NaiveDate,
    },

    /// The date format contains an invalid strftime specifier
    #[error("invalid date format: '{0}'")]
    InvalidDateFormat(String),
}

/// Result type for configuration validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// One query plus its shaping options
#[derive(Debug, Clone, Deserialize)]
pub struct QuerySpec {
    /// What to search for
    pub kind: QueryKind,

    /// The tag name, front-matter key, or literal text to match
    pub target: String,

    /// Weight contributed per occurrence when no explicit value is attached
    #[serde(default = "default_const_value")]
    pub const_value: f64,

    /// Treat valued tag occurrences as bare ones
    #[serde(default)]
    pub ignore_attached_value: bool,

    /// Suppress attached values that are exactly zero
    #[serde(default)]
    pub ignore_zero_value: bool,

    /// Substitute for days with no observation, applied after reduction
    #[serde(default)]
    pub penalty: Option<f64>,

    /// Replace values with their running prefix sum
    #[serde(default)]
    pub accumulate: bool,

    /// Feed the x axis only; skipped by the evaluator's default selection
    #[serde(default)]
    pub x_axis: bool,
}

fn default_const_value() -> f64 {
    1.0
}

impl QuerySpec {
    /// Create a spec with default shaping options
    pub fn new(kind: QueryKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            const_value: default_const_value(),
            ignore_attached_value: false,
            ignore_zero_value: false,
            penalty: None,
            accumulate: false,
            x_axis: false,
        }
    }

    /// Builder: set the per-occurrence constant value
    pub fn const_value(mut self, value: f64) -> Self {
        self.const_value = value;
        self
    }

    /// Builder: ignore attached tag values
    pub fn ignore_attached_value(mut self) -> Self {
        self.ignore_attached_value = true;
        self
    }

    /// Builder: suppress exact-zero attached values
    pub fn ignore_zero_value(mut self) -> Self {
        self.ignore_zero_value = true;
        self
    }

    /// Builder: fill missing days with a penalty value
    pub fn penalty(mut self, value: f64) -> Self {
        self.penalty = Some(value);
        self
    }

    /// Builder: accumulate into a running sum
    pub fn accumulate(mut self) -> Self {
        self.accumulate = true;
        self
    }

    /// Builder: mark as x-axis-only
    pub fn x_axis(mut self) -> Self {
        self.x_axis = true;
        self
    }
}

/// Full engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Searches to run, in id order
    pub queries: Vec<QuerySpec>,

    /// strftime format for document date keys and default date rendering
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Explicit axis start; derived from the documents when absent
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// Explicit axis end; derived from the documents when absent
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl TrackerConfig {
    /// Create a configuration with default format and derived bounds
    pub fn new(queries: Vec<QuerySpec>) -> Self {
        Self {
            queries,
            date_format: default_date_format(),
            start_date: None,
            end_date: None,
        }
    }

    /// Builder: set the date format
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Builder: set explicit axis bounds
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Check the configuration before extraction
    pub fn validate(&self) -> ConfigResult<()> {
        if self.queries.is_empty() {
            return Err(ConfigError::NoQueries);
        }

        for (index, spec) in self.queries.iter().enumerate() {
            if spec.target.trim().is_empty() {
                return Err(ConfigError::EmptyTarget { index });
            }
        }

        if !is_valid_format(&self.date_format) {
            return Err(ConfigError::InvalidDateFormat(self.date_format.clone()));
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ConfigError::InvalidDateRange { start, end });
            }
        }

        Ok(())
    }
}
