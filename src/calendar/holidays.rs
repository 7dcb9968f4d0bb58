use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// holidays falling on the same (month, day) every year
const FIXED_HOLIDAYS: [(u32, u32); 7] = [
    (1, 1),   // new year
    (1, 6),   // epiphany
    (5, 1),   // labour day
    (5, 3),   // constitution day
    (11, 11), // independence day
    (12, 25), // christmas day
    (12, 26), // second day of christmas
];

/// easter sunday of the gregorian calendar for `year`
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let g = (8 * b + 13) / 25;
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let j = c / 4;
    let k = c % 4;
    let m = (a + 11 * h) / 319;
    let r = (2 * e + 2 * j - k - h + m + 32).rem_euclid(7);
    let month = (h - m + r + 90) / 25;
    let day = (h - m + r + month + 19).rem_euclid(32);

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// pentecost sunday, 49 days after easter
pub fn pentecost(year: i32) -> Option<NaiveDate> {
    easter_sunday(year).map(|easter| easter + Duration::days(49))
}

/// corpus christi thursday, 60 days after easter
pub fn corpus_christi(year: i32) -> Option<NaiveDate> {
    easter_sunday(year).map(|easter| easter + Duration::days(60))
}

/// true if `date` falls on one of the observed holidays
pub fn is_holiday(date: NaiveDate) -> bool {
    if FIXED_HOLIDAYS.contains(&(date.month(), date.day())) {
        return true;
    }

    let year = date.year();
    [easter_sunday(year), pentecost(year), corpus_christi(year)]
        .iter()
        .any(|feast| *feast == Some(date))
}

/// weekdays that are not holidays
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !is_holiday(date)
}

/// move `date` forward until it lands on a business day
pub fn roll_forward_to_business_day(date: NaiveDate) -> NaiveDate {
    let mut rolled = date;
    while !is_business_day(rolled) {
        rolled = rolled + Duration::days(1);
    }
    rolled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_easter_dates() {
        assert_eq!(easter_sunday(2000), Some(date(2000, 4, 23)));
        assert_eq!(easter_sunday(2019), Some(date(2019, 4, 21)));
        assert_eq!(easter_sunday(2024), Some(date(2024, 3, 31)));
        assert_eq!(easter_sunday(2025), Some(date(2025, 4, 20)));
        assert_eq!(easter_sunday(2038), Some(date(2038, 4, 25)));
    }

    #[test]
    fn test_moveable_feasts() {
        assert_eq!(pentecost(2024), Some(date(2024, 5, 19)));
        assert_eq!(corpus_christi(2024), Some(date(2024, 5, 30)));
        assert_eq!(pentecost(2025), Some(date(2025, 6, 8)));
        assert_eq!(corpus_christi(2025), Some(date(2025, 6, 19)));
    }

    #[test]
    fn test_business_days() {
        // plain wednesday
        assert!(is_business_day(date(2024, 3, 6)));
        // weekend
        assert!(!is_business_day(date(2024, 3, 9)));
        assert!(!is_business_day(date(2024, 3, 10)));
        // fixed holidays in any year
        assert!(!is_business_day(date(2025, 1, 6)));
        assert!(!is_business_day(date(2030, 11, 11)));
        assert!(!is_business_day(date(2024, 12, 26)));
        // corpus christi thursday
        assert!(!is_business_day(date(2024, 5, 30)));
        assert!(is_business_day(date(2024, 5, 31)));
    }

    #[test]
    fn test_roll_forward() {
        // saturday -> monday
        assert_eq!(roll_forward_to_business_day(date(2024, 3, 9)), date(2024, 3, 11));
        // christmas eve is a tuesday and a business day
        assert_eq!(roll_forward_to_business_day(date(2024, 12, 24)), date(2024, 12, 24));
        // christmas wednesday + thursday -> friday
        assert_eq!(roll_forward_to_business_day(date(2024, 12, 25)), date(2024, 12, 27));
        // may 1st wed, 2nd thu is a business day
        assert_eq!(roll_forward_to_business_day(date(2024, 5, 1)), date(2024, 5, 2));
        // corpus christi -> friday
        assert_eq!(roll_forward_to_business_day(date(2024, 5, 30)), date(2024, 5, 31));
    }

    #[test]
    fn test_roll_forward_never_moves_back_and_is_idempotent() {
        let mut day = date(2024, 1, 1);
        while day < date(2026, 1, 1) {
            let rolled = roll_forward_to_business_day(day);
            assert!(rolled >= day);
            assert!(is_business_day(rolled));
            assert_eq!(roll_forward_to_business_day(rolled), rolled);
            day = day + Duration::days(1);
        }
    }
}
