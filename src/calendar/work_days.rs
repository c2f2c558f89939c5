use chrono::{Days, NaiveDate};

use super::oracle::NonWorkingDays;

/// Walks from `date` by `step_days` until a working day is found.
///
/// `max_offset_days` is a signed budget consumed by `step_days` on every
/// move; the walk gives up with `None` once it reaches zero. A budget of
/// zero therefore never inspects `date` at all.
pub fn first_working_day(
    oracle: &impl NonWorkingDays,
    date: NaiveDate,
    step_days: i64,
    max_offset_days: i64,
) -> Option<NaiveDate> {
    if step_days == 0 || (max_offset_days != 0 && step_days.signum() != max_offset_days.signum())
    {
        return None;
    }

    let mut current = date;
    let mut remaining = max_offset_days;

    loop {
        if remaining == 0 {
            return None;
        }
        if !oracle.is_non_working_day(current) {
            return Some(current);
        }

        current = shift_days(current, step_days)?;
        remaining -= step_days;

        // Budgets not divisible by the step would otherwise skip past zero.
        if remaining.signum() == -step_days.signum() {
            return None;
        }
    }
}

fn shift_days(date: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(offset.unsigned_abs());
    if offset >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
}
