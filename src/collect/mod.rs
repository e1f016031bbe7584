//! Document collection
//!
//! Turns a batch of dated documents into a [`SeriesCollection`] aligned on one
//! daily date axis.
//!
//! # Collection Pipeline
//!
//! ```text
//! Documents → Scan (per query) → ObservationMap → Reduce → Transform → SeriesCollection
//! ```
//!
//! Extraction is sequential per document and the observation map is
//! append-only, so same-date contributions merge in deterministic order.
//! Documents whose date key fails to parse are skipped silently; the batch
//! succeeds as long as the axis bounds can be resolved.

mod document;
mod error;
mod observations;
mod scanner;

pub use document::{deep_get, frontmatter_tags, value_exists, Document};
pub use error::{CollectError, CollectResult};
pub use observations::{Observation, ObservationMap};

use crate::config::{ConfigError, TrackerConfig};
use crate::date::str_to_date;
use crate::series::{DateAxis, Query, SeriesCollection};
use chrono::NaiveDate;
use scanner::QueryScanner;

/// Collect a document batch into a date-aligned series collection
///
/// Validates the configuration, scans every document against every query,
/// folds the observations onto the shared date axis and applies the
/// configured per-series transforms. The axis spans the explicit
/// `start_date`/`end_date` bounds when set, otherwise the earliest to latest
/// parseable document date.
pub fn collect(documents: &[Document], config: &TrackerConfig) -> CollectResult<SeriesCollection> {
    // 1. Reject bad configurations before touching any document
    config.validate()?;

    let scanners = build_scanners(config)?;

    // 2. Scan documents into the transient observation map
    let mut observations = ObservationMap::new();
    let mut earliest: Option<NaiveDate> = None;
    let mut latest: Option<NaiveDate> = None;

    for doc in documents {
        let Some(date) = str_to_date(&doc.date_key, &config.date_format) else {
            tracing::debug!(date_key = %doc.date_key, "skipping document with unparseable date");
            continue;
        };

        earliest = Some(earliest.map_or(date, |d| d.min(date)));
        latest = Some(latest.map_or(date, |d| d.max(date)));

        for scanner in &scanners {
            if let Some(value) = scanner.scan(doc) {
                observations.add(date, scanner.query().id, Some(value));
            }
        }
    }

    tracing::debug!(
        documents = documents.len(),
        dates_with_observations = observations.len(),
        "scan complete"
    );

    // 3. Resolve the axis bounds
    let start = config.start_date.or(earliest).ok_or(CollectError::NoValidDates)?;
    let end = config.end_date.or(latest).ok_or(CollectError::NoValidDates)?;
    let axis = DateAxis::try_new(start, end)
        .ok_or(ConfigError::InvalidDateRange { start, end })?;

    // 4. Reduce the map into date-aligned series
    let mut collection = SeriesCollection::new(axis);
    for (id, spec) in config.queries.iter().enumerate() {
        collection.create_series(Query::new(id, spec.kind, spec.target.clone()), spec.x_axis);
    }

    let axis = *collection.axis();
    for date in axis.iter() {
        for id in 0..collection.len() {
            if let Some(sum) = observations.sum_for(date, id) {
                if let Some(series) = collection.series_by_id_mut(id) {
                    series.set_value(date, sum);
                }
            }
        }
    }

    // 5. Per-series transforms; fill first so filled days join the running sum
    for (id, spec) in config.queries.iter().enumerate() {
        if let Some(series) = collection.series_by_id_mut(id) {
            if let Some(penalty) = spec.penalty {
                series.fill_missing(penalty);
            }
            if spec.accumulate {
                series.accumulate();
            }
        }
    }

    tracing::debug!(
        series = collection.len(),
        days = collection.axis().len(),
        "collection complete"
    );

    Ok(collection)
}

fn build_scanners(config: &TrackerConfig) -> CollectResult<Vec<QueryScanner>> {
    config
        .queries
        .iter()
        .enumerate()
        .map(|(id, spec)| {
            let query = Query::new(id, spec.kind, spec.target.clone());
            Ok(QueryScanner::new(query, spec)?)
        })
        .collect()
}
