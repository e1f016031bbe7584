//! Series data model
//!
//! The date-aligned heart of the engine:
//!
//! - **Query**: one logical search (kind + target), immutable, id = order
//! - **DateAxis**: the shared, gap-free sequence of calendar days
//! - **Series**: one query's values, one slot per axis day, `None` = missing
//! - **SeriesCollection**: all series aligned on one axis
//!
//! Everything here is plain in-memory data; extraction fills it
//! ([`crate::collect`]) and the expression evaluator consumes it
//! ([`crate::expr`]).

mod axis;
mod dataset;
mod query;

pub use axis::DateAxis;
pub use dataset::{Series, SeriesCollection};
pub use query::{Query, QueryKind};
