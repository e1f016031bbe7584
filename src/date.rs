//! Day-granularity date helpers
//!
//! Every date in the engine is a calendar day (`chrono::NaiveDate`); there is
//! no time-of-day or timezone component. Format strings are chrono strftime
//! specifiers (e.g. `"%Y-%m-%d"`).

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;

/// Default format for parsing document date keys and rendering dates
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date string with the given strftime format
///
/// Returns `None` when the string does not match the format; callers decide
/// whether that is a soft skip or a hard error.
pub fn str_to_date(s: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), format).ok()
}

/// Render a date with the given strftime format
///
/// The format must have been validated with [`is_valid_format`] first;
/// rendering an invalid specifier would otherwise abort mid-write.
pub fn date_to_str(date: NaiveDate, format: &str) -> String {
    date.format(format).to_string()
}

/// Check that a strftime format string contains no invalid specifiers
pub fn is_valid_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Number of calendar days in the inclusive range `[start, end]`
///
/// Returns 0 when `start > end`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> usize {
    if start > end {
        return 0;
    }
    (end - start).num_days() as usize + 1
}
