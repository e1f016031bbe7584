//! Series function library
//!
//! The fixed set of functions an expression may call on a series: aggregates,
//! day counts, axis bounds, the streak/break family and `normalize`. All of
//! them take one series (explicit or the collection's default) and return a
//! scalar, a date or a new series.
//!
//! A **streak** is a maximal run of consecutive days holding a value; a
//! **break** is a maximal run of consecutive missing days. The `max*` family
//! reports the historical longest run scanning oldest to newest (first
//! maximal run wins ties); the `current*` family reports only the trailing
//! run, scanning newest to oldest and stopping at the first day that ends it.
//! The two families are intentionally asymmetric.

use crate::expr::error::{EvalError, EvalResult};
use crate::expr::eval::Value;
use crate::series::Series;
use chrono::NaiveDate;

/// A function from the fixed library, applied to one series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesFunction {
    /// Smallest observed value
    Min,
    /// Largest observed value
    Max,
    /// Sum of observed values
    Sum,
    /// Mean of observed values
    Average,
    /// Median of observed values
    Median,
    /// Sample variance of observed values
    Variance,
    /// Number of days holding a value
    Count,
    /// Axis length in days
    NumDays,
    /// Number of days holding a value
    NumDaysHavingData,
    /// First day of the axis
    StartDate,
    /// Last day of the axis
    EndDate,
    /// Length of the longest streak
    MaxStreak,
    /// First day of the longest streak
    MaxStreakStart,
    /// Last day of the longest streak
    MaxStreakEnd,
    /// Length of the longest break
    MaxBreaks,
    /// First day of the longest break
    MaxBreaksStart,
    /// Last day of the longest break
    MaxBreaksEnd,
    /// Length of the trailing streak
    CurrentStreak,
    /// First day of the trailing streak
    CurrentStreakStart,
    /// Last day of the trailing streak
    CurrentStreakEnd,
    /// Length of the trailing break
    CurrentBreaks,
    /// First day of the trailing break
    CurrentBreaksStart,
    /// Last day of the trailing break
    CurrentBreaksEnd,
    /// Rescale into [0, 1] by the series' own min/max
    Normalize,
}

impl SeriesFunction {
    /// Look up a callee name; names are case-sensitive camelCase
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "sum" => Some(Self::Sum),
            "average" => Some(Self::Average),
            "median" => Some(Self::Median),
            "variance" => Some(Self::Variance),
            "count" => Some(Self::Count),
            "numDays" => Some(Self::NumDays),
            "numDaysHavingData" => Some(Self::NumDaysHavingData),
            "startDate" => Some(Self::StartDate),
            "endDate" => Some(Self::EndDate),
            "maxStreak" => Some(Self::MaxStreak),
            "maxStreakStart" => Some(Self::MaxStreakStart),
            "maxStreakEnd" => Some(Self::MaxStreakEnd),
            "maxBreaks" => Some(Self::MaxBreaks),
            "maxBreaksStart" => Some(Self::MaxBreaksStart),
            "maxBreaksEnd" => Some(Self::MaxBreaksEnd),
            "currentStreak" => Some(Self::CurrentStreak),
            "currentStreakStart" => Some(Self::CurrentStreakStart),
            "currentStreakEnd" => Some(Self::CurrentStreakEnd),
            "currentBreaks" => Some(Self::CurrentBreaks),
            "currentBreaksStart" => Some(Self::CurrentBreaksStart),
            "currentBreaksEnd" => Some(Self::CurrentBreaksEnd),
            "normalize" => Some(Self::Normalize),
            _ => None,
        }
    }

    /// The canonical callee name, for error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::Sum => "sum",
            Self::Average => "average",
            Self::Median => "median",
            Self::Variance => "variance",
            Self::Count => "count",
            Self::NumDays => "numDays",
            Self::NumDaysHavingData => "numDaysHavingData",
            Self::StartDate => "startDate",
            Self::EndDate => "endDate",
            Self::MaxStreak => "maxStreak",
            Self::MaxStreakStart => "maxStreakStart",
            Self::MaxStreakEnd => "maxStreakEnd",
            Self::MaxBreaks => "maxBreaks",
            Self::MaxBreaksStart => "maxBreaksStart",
            Self::MaxBreaksEnd => "maxBreaksEnd",
            Self::CurrentStreak => "currentStreak",
            Self::CurrentStreakStart => "currentStreakStart",
            Self::CurrentStreakEnd => "currentStreakEnd",
            Self::CurrentBreaks => "currentBreaks",
            Self::CurrentBreaksStart => "currentBreaksStart",
            Self::CurrentBreaksEnd => "currentBreaksEnd",
            Self::Normalize => "normalize",
        }
    }

    /// Apply the function to a series
    ///
    /// Value-aggregates over an all-missing series yield NaN (`sum` yields
    /// 0), matching the evaluator's floating-point stance; date-valued run
    /// statistics with no run to report are an error instead, since there is
    /// no honest date to fabricate.
    pub fn apply(&self, series: &Series) -> EvalResult<Value> {
        let value = match self {
            Self::Min => Value::Number(series.min().unwrap_or(f64::NAN)),
            Self::Max => Value::Number(series.max().unwrap_or(f64::NAN)),
            Self::Sum => Value::Number(series.sum()),
            Self::Average => Value::Number(series.average().unwrap_or(f64::NAN)),
            Self::Median => Value::Number(series.median().unwrap_or(f64::NAN)),
            Self::Variance => Value::Number(series.variance().unwrap_or(f64::NAN)),
            Self::Count | Self::NumDaysHavingData => Value::Number(series.count() as f64),
            Self::NumDays => Value::Number(series.num_days() as f64),
            Self::StartDate => Value::Date(series.axis().start()),
            Self::EndDate => Value::Date(series.axis().end()),
            Self::MaxStreak => run_length(longest_run(series, false)),
            Self::MaxStreakStart => self.run_start(longest_run(series, false))?,
            Self::MaxStreakEnd => self.run_end(longest_run(series, false))?,
            Self::MaxBreaks => run_length(longest_run(series, true)),
            Self::MaxBreaksStart => self.run_start(longest_run(series, true))?,
            Self::MaxBreaksEnd => self.run_end(longest_run(series, true))?,
            Self::CurrentStreak => run_length(trailing_run(series, false)),
            Self::CurrentStreakStart => self.run_start(trailing_run(series, false))?,
            Self::CurrentStreakEnd => self.run_end(trailing_run(series, false))?,
            Self::CurrentBreaks => run_length(trailing_run(series, true)),
            Self::CurrentBreaksStart => self.run_start(trailing_run(series, true))?,
            Self::CurrentBreaksEnd => self.run_end(trailing_run(series, true))?,
            Self::Normalize => Value::Series(normalize(series)),
        };
        Ok(value)
    }

    fn run_start(&self, run: Option<Run>) -> EvalResult<Value> {
        run.map(|r| Value::Date(r.start)).ok_or(EvalError::NoData {
            function: self.name().to_string(),
        })
    }

    fn run_end(&self, run: Option<Run>) -> EvalResult<Value> {
        run.map(|r| Value::Date(r.end)).ok_or(EvalError::NoData {
            function: self.name().to_string(),
        })
    }
}

/// One run of consecutive days, all holding a value or all missing
#[derive(Debug, Clone, Copy)]
struct Run {
    start: NaiveDate,
    end: NaiveDate,
    len: usize,
}

fn run_length(run: Option<Run>) -> Value {
    Value::Number(run.map_or(0.0, |r| r.len as f64))
}

/// Longest run scanning oldest to newest; the first maximal run wins ties
fn longest_run(series: &Series, missing: bool) -> Option<Run> {
    let mut best: Option<Run> = None;
    let mut current: Option<Run> = None;

    for (date, value) in series.iter() {
        if value.is_none() == missing {
            let run = match current {
                Some(r) => Run {
                    start: r.start,
                    end: date,
                    len: r.len + 1,
                },
                None => Run {
                    start: date,
                    end: date,
                    len: 1,
                },
            };
            // Strictly longer only, so an equal-length later run never wins
            if best.map_or(true, |b| run.len > b.len) {
                best = Some(run);
            }
            current = Some(run);
        } else {
            current = None;
        }
    }

    best
}

/// Trailing run scanning newest to oldest, stopping at the first day that
/// ends it; describes the current state only, not the historical maximum
fn trailing_run(series: &Series, missing: bool) -> Option<Run> {
    let mut run: Option<Run> = None;

    for (date, value) in series.iter().rev() {
        if value.is_none() != missing {
            break;
        }
        run = Some(match run {
            Some(r) => Run {
                start: date,
                end: r.end,
                len: r.len + 1,
            },
            None => Run {
                start: date,
                end: date,
                len: 1,
            },
        });
    }

    run
}

/// Linear rescale into [0, 1] using the series' own min/max
///
/// Missing days stay missing. A constant or empty series divides by zero and
/// keeps the resulting float specials.
fn normalize(series: &Series) -> Series {
    let min = series.min().unwrap_or(f64::NAN);
    let max = series.max().unwrap_or(f64::NAN);
    series.map_values(|v| (v - min) / (max - min))
}
