//! Calendar helpers: month stepping and the annual salary cadence
//!
//! Period dates are always derived from the start date and a period index
//! rather than by repeatedly stepping the previous date, so a start on the
//! 31st does not drift to the 28th after February.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LoanError;

/// Number of periods in one salary year
pub const PERIODS_PER_YEAR: u32 = 12;

/// Longest accepted gap between start and write-off (100 years)
pub const MAX_TERM_MONTHS: u32 = 1_200;

/// How period dates are laid out on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRoll {
    /// Same day of month as the start date (clamped to the month length)
    #[default]
    SameDay,
    /// First period on the start date, every later period on a month end
    MonthEnd,
}

impl FromStr for DateRoll {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "same-day" | "sameday" | "same_day" => Ok(DateRoll::SameDay),
            "month-end" | "monthend" | "month_end" => Ok(DateRoll::MonthEnd),
            other => Err(LoanError::invalid(
                "date_roll",
                format!("expected 'same-day' or 'month-end', got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for DateRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRoll::SameDay => write!(f, "same-day"),
            DateRoll::MonthEnd => write!(f, "month-end"),
        }
    }
}

impl DateRoll {
    /// Date of the period `index` periods after `start` (index 0 is `start`)
    ///
    /// Returns `None` if the date falls outside chrono's representable range.
    pub fn period_date(&self, start: NaiveDate, index: u32) -> Option<NaiveDate> {
        if index == 0 {
            return Some(start);
        }
        let shifted = start.checked_add_months(Months::new(index))?;
        match self {
            DateRoll::SameDay => Some(shifted),
            DateRoll::MonthEnd => last_day_of_month(shifted),
        }
    }
}

/// Last calendar day of the month containing `date`
pub fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// True once `periods_completed` closes a 12-period cycle
pub fn is_anniversary(periods_completed: u32) -> bool {
    periods_completed > 0 && periods_completed % PERIODS_PER_YEAR == 0
}

/// Whole calendar months from `start` up to (but not reaching) `end`
///
/// Upper bound on the number of periods a simulation can record.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    if end <= start {
        return 0;
    }
    let months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    let months = months.max(0) as u32;
    // Round up when the end day lies past the start day within the final month
    if end.day() > start.day() {
        months + 1
    } else {
        months
    }
}
