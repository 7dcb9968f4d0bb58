use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// 365 or 366
pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// actual/actual year fraction between two dates.
///
/// The interval is cut at every january 1st and each slice is divided by
/// the length of its own calendar year, so a period spanning a leap year
/// is weighted correctly and the fraction is additive over any split
/// point. Returns zero when `end` is not after `start`.
pub fn year_fraction(start: NaiveDate, end: NaiveDate) -> Decimal {
    let mut fraction = Decimal::ZERO;
    let mut slice_start = start;

    while slice_start < end {
        let year = slice_start.year();
        let slice_end = match NaiveDate::from_ymd_opt(year + 1, 1, 1) {
            Some(next_year) if next_year < end => next_year,
            _ => end,
        };

        let days = (slice_end - slice_start).num_days();
        fraction += Decimal::from(days) / Decimal::from(days_in_year(year));
        slice_start = slice_end;
    }

    fraction
}
