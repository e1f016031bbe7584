//! Shared date axis
//!
//! The axis is the ascending, gap-free sequence of calendar days from a start
//! date to an end date inclusive. A [`crate::series::SeriesCollection`] owns
//! exactly one axis and hands it to every series by reference, so the
//! date-to-index mapping is shared by construction and never copied per
//! series. Once built, the axis is immutable.

use crate::date::days_inclusive;
use chrono::{Duration, NaiveDate};

/// An inclusive, gap-free range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateAxis {
    /// First day (inclusive)
    start: NaiveDate,
    /// Last day (inclusive)
    end: NaiveDate,
}

impl DateAxis {
    /// Create a new axis, returning `None` when `start > end`
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// First day of the axis
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the axis
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive day count
    pub fn len(&self) -> usize {
        days_inclusive(self.start, self.end)
    }

    /// An axis always spans at least one day
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check if a date falls on the axis
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Index of a date on the axis, `None` outside the range
    ///
    /// Bijective over `[start, end]`: `date_at(index_of(d)) == d`.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        if self.contains(date) {
            Some((date - self.start).num_days() as usize)
        } else {
            None
        }
    }

    /// Date at an index, `None` past the end
    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        if index < self.len() {
            Some(self.start + Duration::days(index as i64))
        } else {
            None
        }
    }

    /// Iterate the axis dates in ascending order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NaiveDate> + ExactSizeIterator + '_ {
        (0..self.len()).map(move |i| self.start + Duration::days(i as i64))
    }
}
