//! Inclusive calendar date range.

use core::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Errors that can occur when building a [`DateRange`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// The start date falls after the end date.
    #[error("start date {start} is after end date {end}")]
    Inverted {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },
    /// A date could not be parsed.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// An inclusive `(start, end)` date range used to scope order listings and stats.
///
/// ## Constraints
///
/// - `start <= end`
///
/// ## Examples
///
/// ```
/// use order_desk_core::DateRange;
///
/// assert!(DateRange::parse("2026-01-01", "2026-01-31").is_ok());
/// assert!(DateRange::parse("2026-02-01", "2026-01-31").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a new date range.
    ///
    /// # Errors
    ///
    /// Returns [`DateRangeError::Inverted`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a date range from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either date is malformed or the range is inverted.
    pub fn parse(start: &str, end: &str) -> Result<Self, DateRangeError> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|_| DateRangeError::InvalidDate(s.to_owned()))
        };
        Self::new(parse(start)?, parse(end)?)
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_single_day_range_is_valid() {
        let range = DateRange::parse("2026-03-05", "2026-03-05").unwrap();
        assert_eq!(range.start(), range.end());
        assert_eq!(range.to_string(), "2026-03-05..2026-03-05");
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = DateRange::parse("2026-03-06", "2026-03-05").unwrap_err();
        assert!(matches!(err, DateRangeError::Inverted { .. }));
    }

    #[test]
    fn test_malformed_date_rejected() {
        let err = DateRange::parse("03/05/2026", "2026-03-05").unwrap_err();
        assert_eq!(err, DateRangeError::InvalidDate("03/05/2026".to_string()));
    }
}
