use chrono::{Datelike, Days, NaiveDate};

use crate::calendar::{NonWorkingDays, first_working_day};
use crate::config::Config;

const SEGMENT_SEPARATOR: &str = "%20";
const FRENCH_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

pub fn french_month_name(date: NaiveDate) -> &'static str {
    FRENCH_MONTHS[date.month0() as usize]
}

pub fn menus_base(config: &Config) -> String {
    let code = config.rpc_code.trim();
    let prefix: String = code.chars().take(2).collect();
    format!(
        "{}/menus-{}/menus-{}",
        config.menus_base_url.trim_end_matches('/'),
        prefix,
        code
    )
}

/// Builds the published URL of the menu for the week starting `week_monday`.
///
/// The file is named after the first and last working days of the week,
/// e.g. `201637-semaine%20du%2012%20au%2016%20septembre%202016.pdf`.
/// Returns `None` when the whole week is off.
pub fn build_resource_id(
    config: &Config,
    oracle: &impl NonWorkingDays,
    week_monday: NaiveDate,
) -> Option<String> {
    let start = first_working_day(oracle, week_monday, 1, 4)?;
    let week_friday = week_monday.checked_add_days(Days::new(4))?;
    let end = first_working_day(oracle, week_friday, -1, -4)?;

    let iso = week_monday.iso_week();
    Some(format!(
        "{}/{}{}-{}.pdf",
        menus_base(config),
        iso.year(),
        iso.week(),
        date_range_label(start, end)
    ))
}

fn date_range_label(start: NaiveDate, end: NaiveDate) -> String {
    let same_year = start.year() == end.year();
    let same_month = same_year && start.month() == end.month();

    let start_month = if same_month {
        String::new()
    } else {
        french_month_name(start).to_string()
    };
    let start_year = if same_year {
        String::new()
    } else {
        start.year().to_string()
    };

    [
        "semaine".to_string(),
        "du".to_string(),
        start.day().to_string(),
        start_month,
        start_year,
        "au".to_string(),
        end.day().to_string(),
        french_month_name(end).to_string(),
        end.year().to_string(),
    ]
    .into_iter()
    .filter(|segment| !segment.is_empty())
    .collect::<Vec<_>>()
    .join(SEGMENT_SEPARATOR)
}
