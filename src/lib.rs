//! # Almanac
//!
//! Daily note tracker engine - extracts numeric observations embedded in
//! dated free-form notes, aligns them onto a continuous daily timeline and
//! evaluates expression templates over the resulting time series.
//!
//! ## Features
//!
//! - **Flexible extraction**: inline `#tag:value` occurrences, front-matter
//!   fields, existence checks and literal text searches
//! - **Honest missing data**: a day without observations stays `None`,
//!   distinct from an observed zero
//! - **One shared date axis**: every series is index-aligned by construction
//! - **Template language**: `{{ expr }}` markers with arithmetic, series
//!   broadcast and a streak/break statistics library
//!
//! ## Modules
//!
//! - [`series`]: queries, the shared date axis, series and collections
//! - [`collect`]: document scanning and reduction onto the axis
//! - [`expr`]: expression parser, evaluator and template engine
//! - [`config`]: engine configuration and validation
//!
//! ## Quick Start
//!
//! ```rust
//! use almanac::{collect, resolve_template, Document, QueryKind, QuerySpec, TrackerConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let docs = vec![
//!         Document::new("2024-01-01", "#weight:72.5kg after breakfast"),
//!         Document::new("2024-01-02", "rest day"),
//!         Document::new("2024-01-03", "#weight:71.8kg"),
//!     ];
//!
//!     let config = TrackerConfig::new(vec![QuerySpec::new(QueryKind::Tag, "weight")]);
//!     let collection = collect(&docs, &config)?;
//!
//!     let line = resolve_template(
//!         "average {{ average() :: %.2f }} kg over {{ numDays() :: %d }} days",
//!         &collection,
//!         &config.date_format,
//!     )?;
//!     assert_eq!(line, "average 72.15 kg over 3 days");
//!     Ok(())
//! }
//! ```

pub mod collect;
pub mod config;
pub mod date;
pub mod expr;
pub mod series;

// Re-export top-level types for convenience
pub use collect::{collect, CollectError, CollectResult, Document, Observation, ObservationMap};

pub use config::{ConfigError, ConfigResult, QuerySpec, TrackerConfig};

pub use date::{date_to_str, str_to_date, DEFAULT_DATE_FORMAT};

pub use expr::{
    evaluate, parse_expression, resolve_template, BinaryOp, EvalError, EvalResult, Expr,
    SeriesFunction, Value,
};

pub use series::{DateAxis, Query, QueryKind, Series, SeriesCollection};
