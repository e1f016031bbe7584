//! Transient observation accumulation
//!
//! During extraction every document appends query-tagged observations here,
//! keyed by date, before any series exists. Multiple documents and multiple
//! queries may land on the same date; the reduction pass folds this map into
//! the date-aligned series afterwards. Append-only while extraction runs.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// One extracted (query, value) pair for some date
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Id of the query that produced the match
    pub query_id: usize,
    /// Extracted value; `None` marks a match without a usable value
    pub value: Option<f64>,
}

/// date → observations accumulated across all documents
#[derive(Debug, Default)]
pub struct ObservationMap {
    entries: BTreeMap<NaiveDate, Vec<Observation>>,
}

impl ObservationMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one observation for a date
    pub fn add(&mut self, date: NaiveDate, query_id: usize, value: Option<f64>) {
        self.entries
            .entry(date)
            .or_default()
            .push(Observation { query_id, value });
    }

    /// Sum of the non-null values a query contributed on a date
    ///
    /// `None` when the date has no entry or only null values for the query;
    /// the absent/zero distinction survives reduction this way.
    pub fn sum_for(&self, date: NaiveDate, query_id: usize) -> Option<f64> {
        let entries = self.entries.get(&date)?;
        let mut total = 0.0;
        let mut any = false;
        for obs in entries.iter().filter(|o| o.query_id == query_id) {
            if let Some(v) = obs.value {
                total += v;
                any = true;
            }
        }
        if any {
            Some(total)
        } else {
            None
        }
    }

    /// Earliest date with an observation
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.entries.keys().next().copied()
    }

    /// Latest date with an observation
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.entries.keys().next_back().copied()
    }

    /// Number of dates holding at least one observation
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no document contributed anything
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sum_filters_by_query() {
        let mut map = ObservationMap::new();
        let day = date(2024, 1, 5);
        map.add(day, 0, Some(1.0));
        map.add(day, 1, Some(10.0));
        map.add(day, 0, Some(2.5));

        assert_eq!(map.sum_for(day, 0), Some(3.5));
        assert_eq!(map.sum_for(day, 1), Some(10.0));
        assert_eq!(map.sum_for(day, 2), None);
    }

    #[test]
    fn test_null_observations_do_not_become_zero() {
        let mut map = ObservationMap::new();
        let day = date(2024, 1, 5);
        map.add(day, 0, None);

        assert_eq!(map.sum_for(day, 0), None);

        // A real zero is a value
        map.add(day, 0, Some(0.0));
        assert_eq!(map.sum_for(day, 0), Some(0.0));
    }

    #[test]
    fn test_date_bounds() {
        let mut map = ObservationMap::new();
        assert_eq!(map.first_date(), None);

        map.add(date(2024, 1, 10), 0, Some(1.0));
        map.add(date(2024, 1, 3), 0, Some(1.0));
        map.add(date(2024, 1, 7), 0, Some(1.0));

        assert_eq!(map.first_date(), Some(date(2024, 1, 3)));
        assert_eq!(map.last_date(), Some(date(2024, 1, 10)));
        assert_eq!(map.len(), 3);
    }
}
