pub mod day_count;
pub mod holidays;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

pub use day_count::{days_in_year, is_leap_year, year_fraction};
pub use holidays::{
    corpus_christi, easter_sunday, is_business_day, is_holiday, pentecost,
    roll_forward_to_business_day,
};

/// add calendar months, clamping to the last day of shorter months
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// calendar distance between two dates in years, months and days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalendarPeriod {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl CalendarPeriod {
    /// period from `start` to `end`; zero when `end` is not after `start`.
    ///
    /// Whole months are counted first; when the day of month of `end` is
    /// below that of `start` one month is borrowed and the remaining days
    /// are counted from the shifted start.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        if end <= start {
            return Self::default();
        }

        let month_index = |d: NaiveDate| d.year() as i64 * 12 + d.month0() as i64;
        let mut total_months = month_index(end) - month_index(start);
        let mut days = end.day() as i64 - start.day() as i64;

        if total_months > 0 && days < 0 {
            total_months -= 1;
            if let Some(shifted) = add_months(start, total_months as u32) {
                days = (end - shifted).num_days();
            }
        }

        Self {
            years: (total_months / 12) as u32,
            months: (total_months % 12) as u32,
            days: days.max(0) as u32,
        }
    }

    pub fn total_months(&self) -> u32 {
        self.years * 12 + self.months
    }
}
