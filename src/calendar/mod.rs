//! School calendar resolution: public holidays, zone vacations and the
//! Monday-to-Friday window a weekly menu is published for.

mod oracle;
mod public_holidays;
mod vacations;
mod week;
mod work_days;

use chrono::NaiveDate;
use thiserror::Error;

#[cfg(test)]
pub(crate) use oracle::FixedOffDays;
pub use oracle::{HolidayOracle, NonWorkingDays};
pub use vacations::VacationCache;
pub use week::{WeekWindow, compute_week_window, day_key, week_key};
pub use work_days::first_working_day;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("vacation calendar is not an iCalendar document")]
    NotACalendar,
    #[error("vacation event is malformed: {0}")]
    InvalidEvent(String),
    #[error("vacation period {description} ends ({end}) before it starts ({start})")]
    PeriodOrder {
        description: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("summer vacation starting {summer_start} has no matching school year start")]
    MissingSchoolYearStart { summer_start: NaiveDate },
}

impl CalendarError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotACalendar => "CALENDAR_NOT_ICS",
            Self::InvalidEvent(_) => "CALENDAR_INVALID_EVENT",
            Self::PeriodOrder { .. } => "CALENDAR_PERIOD_ORDER",
            Self::MissingSchoolYearStart { .. } => "CALENDAR_MISSING_SCHOOL_YEAR_START",
        }
    }
}
