use crate::calendar::{WeekWindow, day_key, week_key};

use super::store::RunStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateReason {
    NothingSentYet,
    AlreadySentThisWeek,
    AlreadySentToday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    pub run: bool,
    /// The send markers said "done" but the configuration changed since.
    pub sent_anyway: bool,
    pub reason: GateReason,
}

/// Decides whether this run should send, given what was last sent.
///
/// Weekly mode only looks at the week marker. The day marker catches both
/// modes, so switching `include_day_menu` on mid-week still sends the day.
pub fn should_run(
    status: &RunStatus,
    window: &WeekWindow,
    include_day_menu: bool,
    conf_hash: &str,
) -> GateDecision {
    let reason = if !include_day_menu
        && status
            .sent_week
            .is_some_and(|sent| sent >= week_key(window.week_monday))
    {
        GateReason::AlreadySentThisWeek
    } else if status
        .sent_day
        .is_some_and(|sent| sent >= day_key(window.target_day))
    {
        GateReason::AlreadySentToday
    } else {
        return GateDecision {
            run: true,
            sent_anyway: false,
            reason: GateReason::NothingSentYet,
        };
    };

    let config_changed = status
        .conf_hash
        .as_deref()
        .is_some_and(|previous| previous != conf_hash);

    GateDecision {
        run: config_changed,
        sent_anyway: config_changed,
        reason,
    }
}
