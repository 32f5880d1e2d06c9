//! Horizon helpers: calendar months, ordering and day adjacency.

use chrono::{Datelike, NaiveDate};

use crate::rota::RotaError;

/// Every date of a calendar month, in order.
pub fn month_horizon(year: i32, month: u32) -> Result<Vec<NaiveDate>, RotaError> {
    let first =
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(RotaError::InvalidMonth { year, month })?;
    Ok(first
        .iter_days()
        .take_while(|date| date.month() == month)
        .collect())
}

/// Sort a horizon chronologically and drop duplicate dates.
pub fn normalize_horizon(horizon: &[NaiveDate]) -> Vec<NaiveDate> {
    let mut dates = horizon.to_vec();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// True when `date` is exactly one calendar day after `previous`.
pub fn is_next_day(previous: NaiveDate, date: NaiveDate) -> bool {
    (date - previous).num_days() == 1
}
