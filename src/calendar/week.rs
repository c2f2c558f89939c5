use chrono::{Datelike, Days, NaiveDate, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub week_monday: NaiveDate,
    pub target_day: NaiveDate,
}

/// Maps "today" to the school week whose menu should be served.
///
/// From Saturday on, the current week is over and the window moves to the
/// next Monday, which also becomes the target day.
pub fn compute_week_window(now: NaiveDate) -> WeekWindow {
    let week_monday = match now.weekday() {
        Weekday::Sat => now + Days::new(2),
        Weekday::Sun => now + Days::new(1),
        _ => now - Days::new(u64::from(now.weekday().num_days_from_monday())),
    };
    let target_day = match now.weekday() {
        Weekday::Sat | Weekday::Sun => week_monday,
        _ => now,
    };

    WeekWindow {
        week_monday,
        target_day,
    }
}

/// `iso_year * 52 + iso_week`, the marker persisted after a weekly send.
pub fn week_key(date: NaiveDate) -> i64 {
    let iso = date.iso_week();
    i64::from(iso.year()) * 52 + i64::from(iso.week())
}

/// `YYYYDDD`, the marker persisted after a daily send.
pub fn day_key(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 1000 + i64::from(date.ordinal())
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Days, NaiveDate, Weekday};

    use super::{compute_week_window, day_key, week_key};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn week_monday_is_always_a_monday() {
        let mut day = date(2023, 1, 1);
        while day < date(2025, 1, 1) {
            let window = compute_week_window(day);
            assert_eq!(window.week_monday.weekday(), Weekday::Mon, "for {}", day);
            day = day + Days::new(1);
        }
    }

    #[test]
    fn weekdays_point_back_to_their_own_monday() {
        let monday = date(2024, 9, 9);
        for offset in 0..5u64 {
            let day = monday + Days::new(offset);
            let window = compute_week_window(day);
            assert_eq!(window.week_monday, monday);
            assert_eq!(window.target_day, day);
        }
    }

    #[test]
    fn weekend_moves_to_next_monday() {
        let saturday = date(2024, 9, 14);
        let sunday = date(2024, 9, 15);
        let next_monday = date(2024, 9, 16);

        let window = compute_week_window(saturday);
        assert_eq!(window.week_monday, next_monday);
        assert_eq!(window.target_day, next_monday);

        let window = compute_week_window(sunday);
        assert_eq!(window.week_monday, next_monday);
        assert_eq!(window.target_day, next_monday);
    }

    #[test]
    fn week_key_uses_iso_week_year() {
        assert_eq!(week_key(date(2024, 9, 9)), 2024 * 52 + 37);
        // 2024-12-30 belongs to ISO week 1 of 2025.
        assert_eq!(week_key(date(2024, 12, 30)), 2025 * 52 + 1);
    }

    #[test]
    fn week_53_shares_its_key_with_next_years_week_1() {
        let week_53 = date(2020, 12, 28);
        let week_1 = date(2021, 1, 4);
        assert_eq!(week_53.iso_week().week(), 53);
        assert_eq!(week_key(week_53), 105093);
        assert_eq!(week_key(week_53), week_key(week_1));
    }

    #[test]
    fn day_key_is_year_and_ordinal() {
        assert_eq!(day_key(date(2024, 1, 1)), 2024001);
        assert_eq!(day_key(date(2024, 12, 31)), 2024366);
    }
}
