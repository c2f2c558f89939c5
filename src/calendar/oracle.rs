use chrono::NaiveDate;

use super::public_holidays::is_public_holiday;
use super::vacations::HolidayPeriod;

pub trait NonWorkingDays {
    fn is_non_working_day(&self, date: NaiveDate) -> bool;
}

/// Answers whether a date is off for one vacation zone.
#[derive(Debug, Clone, Copy)]
pub struct HolidayOracle<'a> {
    periods: &'a [HolidayPeriod],
}

impl<'a> HolidayOracle<'a> {
    pub fn new(periods: &'a [HolidayPeriod]) -> Self {
        Self { periods }
    }

    fn vacation_covering(&self, date: NaiveDate) -> Option<&'a HolidayPeriod> {
        self.periods.iter().find(|period| period.contains(date))
    }
}

impl NonWorkingDays for HolidayOracle<'_> {
    fn is_non_working_day(&self, date: NaiveDate) -> bool {
        if is_public_holiday(date) {
            log::debug!("non_working_day date={} reason=public_holiday", date);
            return true;
        }

        match self.vacation_covering(date) {
            Some(period) => {
                log::debug!(
                    "non_working_day date={} reason=vacation description={:?}",
                    date,
                    period.description
                );
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
pub(crate) struct FixedOffDays(std::collections::HashSet<NaiveDate>);

#[cfg(test)]
impl FixedOffDays {
    pub(crate) fn new(days: &[NaiveDate]) -> Self {
        Self(days.iter().copied().collect())
    }
}

#[cfg(test)]
impl NonWorkingDays for FixedOffDays {
    fn is_non_working_day(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{HolidayOracle, NonWorkingDays};
    use crate::calendar::vacations::HolidayPeriod;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn vacation_bounds_are_inclusive() {
        let periods = vec![HolidayPeriod::new(
            "Vacances de la Toussaint",
            date(2024, 10, 19),
            date(2024, 11, 3),
        )
        .expect("ordered period")];
        let oracle = HolidayOracle::new(&periods);

        assert!(!oracle.is_non_working_day(date(2024, 10, 18)));
        assert!(oracle.is_non_working_day(date(2024, 10, 19)));
        assert!(oracle.is_non_working_day(date(2024, 10, 28)));
        assert!(oracle.is_non_working_day(date(2024, 11, 3)));
        assert!(!oracle.is_non_working_day(date(2024, 11, 4)));
    }

    #[test]
    fn public_holidays_apply_without_any_vacation() {
        let oracle = HolidayOracle::new(&[]);

        assert!(oracle.is_non_working_day(date(2024, 11, 11)));
        assert!(!oracle.is_non_working_day(date(2024, 11, 12)));
    }
}
