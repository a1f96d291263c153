//! Calendar-day helpers shared by search and the stores.
//!
//! Dates travel through the system as `YYYY-MM-DD` text; arithmetic is
//! done on [`NaiveDate`] so month and year boundaries roll over correctly.

use chrono::{Duration, NaiveDate};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `date` shifted by `days` calendar days, `None` on overflow.
pub fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

pub fn same_city(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
