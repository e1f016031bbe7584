//! Series and series collections
//!
//! A [`Series`] is one query's observations as a dense, date-indexed array of
//! optional values over the shared [`DateAxis`]. `None` means "no observation
//! for that day" and is distinct from `Some(0.0)`. A [`SeriesCollection`]
//! owns the axis plus every series aligned to it.
//!
//! Series are created all-missing, filled through merge-on-write
//! [`Series::set_value`] during collection, then optionally reshaped with
//! [`Series::fill_missing`] (penalty fill) and [`Series::accumulate`].

use crate::series::axis::DateAxis;
use crate::series::query::Query;
use chrono::{Duration, NaiveDate};
use std::sync::Arc;

/// One query's date-aligned numeric observations
#[derive(Debug, Clone)]
pub struct Series {
    /// The query this series answers
    query: Query,
    /// Axis shared with the owning collection
    axis: Arc<DateAxis>,
    /// One slot per axis day; `None` = no observation
    values: Vec<Option<f64>>,
    /// Excluded from the evaluator's default-dataset selection
    x_axis_only: bool,
}

impl Series {
    fn new(query: Query, axis: Arc<DateAxis>, x_axis_only: bool) -> Self {
        let len = axis.len();
        Self {
            query,
            axis,
            values: vec![None; len],
            x_axis_only,
        }
    }

    /// The query this series answers
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// The shared date axis
    pub fn axis(&self) -> &DateAxis {
        &self.axis
    }

    /// Whether this series only feeds the x axis
    pub fn is_x_axis_only(&self) -> bool {
        self.x_axis_only
    }

    /// Number of days on the axis (equals the value slot count)
    pub fn num_days(&self) -> usize {
        self.values.len()
    }

    /// Raw value slots, index-aligned with the axis
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Write a value for a date, merging on conflict
    ///
    /// A second write to the same date sums with the existing value. Returns
    /// false when the date is off the axis (nothing written).
    pub fn set_value(&mut self, date: NaiveDate, value: f64) -> bool {
        match self.axis.index_of(date) {
            Some(i) => {
                self.values[i] = Some(self.values[i].unwrap_or(0.0) + value);
                true
            }
            None => false,
        }
    }

    /// Value for a date shifted by `day_offset` days; `None` off the axis or
    /// when the day holds no observation
    pub fn get_value(&self, date: NaiveDate, day_offset: i64) -> Option<f64> {
        let shifted = date + Duration::days(day_offset);
        self.axis.index_of(shifted).and_then(|i| self.values[i])
    }

    /// Value at an axis index; `None` past the end or when missing
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Replace every missing value with a penalty value
    ///
    /// Days already holding a real value (including 0) are untouched.
    /// Idempotent: a second fill finds nothing missing.
    pub fn fill_missing(&mut self, penalty: f64) {
        for slot in &mut self.values {
            if slot.is_none() {
                *slot = Some(penalty);
            }
        }
    }

    /// Running prefix sum over the non-missing values in date order
    ///
    /// Each present value becomes the cumulative sum up to and including
    /// itself; missing days are skipped, keep their `None`, and do not reset
    /// the accumulator. Run [`Series::fill_missing`] first if filled days
    /// should participate.
    pub fn accumulate(&mut self) {
        let mut running = 0.0;
        for slot in &mut self.values {
            if let Some(v) = slot {
                running += *v;
                *slot = Some(running);
            }
        }
    }

    /// Iterate `(date, value)` pairs oldest to newest
    ///
    /// Finite and restartable; reverse with `.rev()` for newest-first scans.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, Option<f64>)> + '_ {
        let start = self.axis.start();
        self.values
            .iter()
            .enumerate()
            .map(move |(i, v)| (start + Duration::days(i as i64), *v))
    }

    /// Count of days holding an observation
    pub fn count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Sum of observed values (0.0 when nothing was observed)
    pub fn sum(&self) -> f64 {
        self.values.iter().flatten().sum()
    }

    /// Smallest observed value
    pub fn min(&self) -> Option<f64> {
        self.values
            .iter()
            .flatten()
            .copied()
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.min(v))))
    }

    /// Largest observed value
    pub fn max(&self) -> Option<f64> {
        self.values
            .iter()
            .flatten()
            .copied()
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }

    /// Mean of observed values
    pub fn average(&self) -> Option<f64> {
        let count = self.count();
        if count == 0 {
            None
        } else {
            Some(self.sum() / count as f64)
        }
    }

    /// Median of observed values
    pub fn median(&self) -> Option<f64> {
        let mut observed: Vec<f64> = self.values.iter().flatten().copied().collect();
        if observed.is_empty() {
            return None;
        }
        observed.sort_by(|a, b| a.total_cmp(b));
        let mid = observed.len() / 2;
        if observed.len() % 2 == 1 {
            Some(observed[mid])
        } else {
            Some((observed[mid - 1] + observed[mid]) / 2.0)
        }
    }

    /// Sample variance of observed values (`None` with fewer than 2)
    pub fn variance(&self) -> Option<f64> {
        let observed: Vec<f64> = self.values.iter().flatten().copied().collect();
        if observed.len() < 2 {
            return None;
        }
        let mean = observed.iter().sum::<f64>() / observed.len() as f64;
        let sum_sq: f64 = observed.iter().map(|v| (v - mean) * (v - mean)).sum();
        Some(sum_sq / (observed.len() - 1) as f64)
    }

    /// Derive a new series by mapping each value slot
    ///
    /// The result keeps this series' query and axis; used by the expression
    /// evaluator for broadcasts and rescaling.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Series {
        Series {
            query: self.query.clone(),
            axis: Arc::clone(&self.axis),
            values: self.values.iter().map(|v| v.map(&f)).collect(),
            x_axis_only: self.x_axis_only,
        }
    }

    /// Derive a new series by combining value slots pairwise with another
    ///
    /// Both series share one axis by construction, so slots are already
    /// index-aligned. A pair with a missing side yields a missing slot.
    pub fn zip_values(&self, other: &Series, f: impl Fn(f64, f64) -> f64) -> Series {
        Series {
            query: self.query.clone(),
            axis: Arc::clone(&self.axis),
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(a, b)| match (a, b) {
                    (Some(x), Some(y)) => Some(f(*x, *y)),
                    _ => None,
                })
                .collect(),
            x_axis_only: self.x_axis_only,
        }
    }
}

/// The set of series sharing one date axis
#[derive(Debug, Clone)]
pub struct SeriesCollection {
    axis: Arc<DateAxis>,
    series: Vec<Series>,
}

impl SeriesCollection {
    /// Create an empty collection owning the given axis
    pub fn new(axis: DateAxis) -> Self {
        Self {
            axis: Arc::new(axis),
            series: Vec::new(),
        }
    }

    /// The shared date axis
    pub fn axis(&self) -> &DateAxis {
        &self.axis
    }

    /// Create an all-missing series for a query, returning its index
    ///
    /// Series indices follow creation order and match query ids when queries
    /// are registered in assignment order.
    pub fn create_series(&mut self, query: Query, x_axis_only: bool) -> usize {
        self.series
            .push(Series::new(query, Arc::clone(&self.axis), x_axis_only));
        self.series.len() - 1
    }

    /// Series by creation-order id
    pub fn series_by_id(&self, id: usize) -> Option<&Series> {
        self.series.get(id)
    }

    /// Mutable series by creation-order id
    pub fn series_by_id_mut(&mut self, id: usize) -> Option<&mut Series> {
        self.series.get_mut(id)
    }

    /// Series matching a query (kind + target equality)
    pub fn series_for_query(&self, query: &Query) -> Option<&Series> {
        self.series.iter().find(|s| s.query() == query)
    }

    /// First series not flagged as x-axis-only
    ///
    /// The expression evaluator's default target when a function is called
    /// without arguments.
    pub fn first_value_series(&self) -> Option<&Series> {
        self.series.iter().find(|s| !s.is_x_axis_only())
    }

    /// Number of series
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether the collection holds no series
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Iterate the series in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.series.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::query::QueryKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_collection(days: u32) -> SeriesCollection {
        let axis = DateAxis::try_new(date(2024, 1, 1), date(2024, 1, days)).unwrap();
        let mut collection = SeriesCollection::new(axis);
        collection.create_series(Query::new(0, QueryKind::Tag, "weight"), false);
        collection
    }

    fn series_from(values: &[Option<f64>]) -> Series {
        let mut collection = test_collection(values.len() as u32);
        let series = collection.series_by_id_mut(0).unwrap();
        for (i, v) in values.iter().enumerate() {
            if let Some(v) = v {
                series.set_value(date(2024, 1, i as u32 + 1), *v);
            }
        }
        collection.series.remove(0)
    }

    #[test]
    fn test_created_all_missing() {
        let collection = test_collection(5);
        let series = collection.series_by_id(0).unwrap();
        assert_eq!(series.num_days(), 5);
        assert_eq!(series.count(), 0);
        assert!(series.values().iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_set_value_merges_on_conflict() {
        let mut collection = test_collection(3);
        let series = collection.series_by_id_mut(0).unwrap();

        assert!(series.set_value(date(2024, 1, 2), 1.5));
        assert!(series.set_value(date(2024, 1, 2), 2.0));
        assert_eq!(series.get_value(date(2024, 1, 2), 0), Some(3.5));

        // Off-axis writes are rejected
        assert!(!series.set_value(date(2024, 2, 1), 1.0));
    }

    #[test]
    fn test_zero_is_not_missing() {
        let mut collection = test_collection(2);
        let series = collection.series_by_id_mut(0).unwrap();
        series.set_value(date(2024, 1, 1), 0.0);

        assert_eq!(series.get_value(date(2024, 1, 1), 0), Some(0.0));
        assert_eq!(series.get_value(date(2024, 1, 2), 0), None);
        assert_eq!(series.count(), 1);
    }

    #[test]
    fn test_get_value_with_offset() {
        let series = series_from(&[Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(series.get_value(date(2024, 1, 2), -1), Some(1.0));
        assert_eq!(series.get_value(date(2024, 1, 2), 1), Some(3.0));
        // Shifted off the axis
        assert_eq!(series.get_value(date(2024, 1, 1), -1), None);
        assert_eq!(series.get_value(date(2024, 1, 3), 1), None);
    }

    #[test]
    fn test_fill_missing_keeps_real_values() {
        let mut series = series_from(&[Some(0.0), None, Some(2.0)]);
        series.fill_missing(-1.0);
        assert_eq!(
            series.values(),
            &[Some(0.0), Some(-1.0), Some(2.0)]
        );
    }

    #[test]
    fn test_accumulate_skips_missing() {
        // [1, null, 2] accumulates to [1, null, 3]
        let mut series = series_from(&[Some(1.0), None, Some(2.0)]);
        series.accumulate();
        assert_eq!(series.values(), &[Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn test_fill_then_accumulate() {
        let mut series = series_from(&[Some(1.0), None, Some(2.0)]);
        series.fill_missing(0.5);
        series.accumulate();
        assert_eq!(series.values(), &[Some(1.0), Some(1.5), Some(3.5)]);
    }

    #[test]
    fn test_statistics_skip_missing() {
        let series = series_from(&[Some(4.0), None, Some(1.0), Some(3.0), None]);
        assert_eq!(series.count(), 3);
        assert_eq!(series.sum(), 8.0);
        assert_eq!(series.min(), Some(1.0));
        assert_eq!(series.max(), Some(4.0));
        assert_eq!(series.median(), Some(3.0));
        let avg = series.average().unwrap();
        assert!((avg - 8.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_statistics_on_empty_series() {
        let series = series_from(&[None, None]);
        assert_eq!(series.count(), 0);
        assert_eq!(series.sum(), 0.0);
        assert_eq!(series.min(), None);
        assert_eq!(series.max(), None);
        assert_eq!(series.average(), None);
        assert_eq!(series.median(), None);
        assert_eq!(series.variance(), None);
    }

    #[test]
    fn test_median_even_count() {
        let series = series_from(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        assert_eq!(series.median(), Some(2.5));
    }

    #[test]
    fn test_variance() {
        let series = series_from(&[Some(2.0), Some(4.0), Some(4.0), Some(4.0), Some(5.0)]);
        // Sample variance of [2, 4, 4, 4, 5] with mean 3.8
        let v = series.variance().unwrap();
        assert!((v - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let series = series_from(&[Some(1.0), None, Some(3.0)]);

        let first: Vec<_> = series.iter().collect();
        let second: Vec<_> = series.iter().collect();
        assert_eq!(first, second);

        let newest_first: Vec<_> = series.iter().rev().map(|(_, v)| v).collect();
        assert_eq!(newest_first, vec![Some(3.0), None, Some(1.0)]);
    }

    #[test]
    fn test_collection_lookup() {
        let axis = DateAxis::try_new(date(2024, 1, 1), date(2024, 1, 7)).unwrap();
        let mut collection = SeriesCollection::new(axis);
        let dates_id = collection.create_series(Query::new(0, QueryKind::FrontmatterField, "date"), true);
        let weight_id = collection.create_series(Query::new(1, QueryKind::Tag, "weight"), false);

        assert_eq!(dates_id, 0);
        assert_eq!(weight_id, 1);
        assert_eq!(collection.len(), 2);

        let lookup = Query::new(99, QueryKind::Tag, "weight");
        assert_eq!(
            collection.series_for_query(&lookup).map(|s| s.query().id),
            Some(1)
        );

        // Default dataset skips x-axis-only series
        assert_eq!(collection.first_value_series().map(|s| s.query().id), Some(1));
    }

    #[test]
    fn test_all_series_share_axis_length() {
        let axis = DateAxis::try_new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        let mut collection = SeriesCollection::new(axis);
        collection.create_series(Query::new(0, QueryKind::Tag, "a"), false);
        collection.create_series(Query::new(1, QueryKind::Text, "b"), false);

        for series in collection.iter() {
            assert_eq!(series.num_days(), collection.axis().len());
        }
    }
}
