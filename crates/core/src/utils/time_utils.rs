use chrono::{Datelike, Local, NaiveDate};

use crate::errors::Result;

/// Date format used on the wire and in persisted documents.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in the server's local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// First day of the year containing `date` (start of the year-to-date window).
pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// Parses an ISO `YYYY-MM-DD` date, ignoring surrounding whitespace.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)?)
}
