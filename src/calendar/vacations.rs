use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};

use super::CalendarError;
use crate::config::Config;
use crate::error::RunError;
use crate::fetch::Fetcher;

const SUMMER_VACATION_MARKER: &str = "vacances d'été";
const SCHOOL_YEAR_START_MARKER: &str = "rentrée scolaire";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayPeriod {
    pub description: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HolidayPeriod {
    pub fn new(
        description: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, CalendarError> {
        let description = description.into();
        if end < start {
            return Err(CalendarError::PeriodOrder {
                description,
                start,
                end,
            });
        }
        Ok(Self {
            description,
            start,
            end,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Default)]
struct RawEvent {
    summary: Option<String>,
    description: Option<String>,
    start: Option<String>,
    end: Option<String>,
}

impl RawEvent {
    fn label(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.summary.clone())
            .unwrap_or_default()
    }

    fn matches(&self, marker: &str) -> bool {
        [&self.summary, &self.description]
            .into_iter()
            .flatten()
            .any(|text| normalize(text).contains(marker))
    }
}

fn normalize(text: &str) -> String {
    text.to_lowercase().replace('’', "'")
}

/// Parses the published school calendar into vacation periods.
///
/// A summer vacation event carries no end date; it is closed by the start of
/// the following school year.
pub fn parse_vacation_calendar(raw: &str) -> Result<Vec<HolidayPeriod>, CalendarError> {
    let lines = unfold_lines(raw);
    if !lines
        .iter()
        .any(|line| line.trim().eq_ignore_ascii_case("BEGIN:VCALENDAR"))
    {
        return Err(CalendarError::NotACalendar);
    }

    let events = collect_events(&lines);
    let mut school_year_starts = Vec::new();
    for event in events.iter().filter(|event| event.matches(SCHOOL_YEAR_START_MARKER)) {
        let (start, _) = event_start(event)?;
        school_year_starts.push(start);
    }
    school_year_starts.sort();

    let mut periods = Vec::new();
    for event in &events {
        if event.matches(SCHOOL_YEAR_START_MARKER) {
            continue;
        }

        let (start, _) = event_start(event)?;
        let end = match event.end.as_deref() {
            Some(value) => exclusive_end_to_inclusive(value, start)?,
            None if event.matches(SUMMER_VACATION_MARKER) => school_year_starts
                .iter()
                .copied()
                .find(|school_start| *school_start >= start)
                .ok_or(CalendarError::MissingSchoolYearStart {
                    summer_start: start,
                })?,
            None => start,
        };

        periods.push(HolidayPeriod::new(event.label(), start, end)?);
    }

    periods.sort_by_key(|period| period.start);
    Ok(periods)
}

fn unfold_lines(raw: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in raw.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(continuation) = line.strip_prefix(|ch: char| ch == ' ' || ch == '\t') {
            if let Some(last) = lines.last_mut() {
                last.push_str(continuation);
                continue;
            }
        }
        lines.push(line.to_string());
    }
    lines
}

fn collect_events(lines: &[String]) -> Vec<RawEvent> {
    let mut events = Vec::new();
    let mut current: Option<RawEvent> = None;

    for line in lines {
        let Some((head, value)) = line.split_once(':') else {
            continue;
        };
        let name = head.split(';').next().unwrap_or_default().to_ascii_uppercase();
        let value = value.trim();

        if name == "BEGIN" && value.eq_ignore_ascii_case("VEVENT") {
            current = Some(RawEvent::default());
            continue;
        }
        if name == "END" && value.eq_ignore_ascii_case("VEVENT") {
            if let Some(event) = current.take() {
                events.push(event);
            }
            continue;
        }

        let Some(event) = current.as_mut() else {
            continue;
        };
        match name.as_str() {
            "SUMMARY" => event.summary = Some(unescape_text(value)),
            "DESCRIPTION" => event.description = Some(unescape_text(value)),
            "DTSTART" => event.start = Some(value.to_string()),
            "DTEND" => event.end = Some(value.to_string()),
            _ => {}
        }
    }

    events
}

fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn event_start(event: &RawEvent) -> Result<(NaiveDate, bool), CalendarError> {
    let value = event
        .start
        .as_deref()
        .ok_or_else(|| CalendarError::InvalidEvent(format!("{} has no DTSTART", event.label())))?;
    parse_ics_date(value)
}

/// Returns the date and whether the value marks midnight (all-day or `T000000`).
fn parse_ics_date(value: &str) -> Result<(NaiveDate, bool), CalendarError> {
    let date_part = value
        .get(..8)
        .ok_or_else(|| CalendarError::InvalidEvent(format!("invalid date value {:?}", value)))?;
    let date = NaiveDate::parse_from_str(date_part, "%Y%m%d")
        .map_err(|_| CalendarError::InvalidEvent(format!("invalid date value {:?}", value)))?;
    let time_part = value.get(8..).unwrap_or_default().trim_end_matches('Z');
    let at_midnight = time_part.is_empty() || time_part == "T000000";
    Ok((date, at_midnight))
}

fn exclusive_end_to_inclusive(value: &str, start: NaiveDate) -> Result<NaiveDate, CalendarError> {
    let (end, at_midnight) = parse_ics_date(value)?;
    if !at_midnight {
        return Ok(end);
    }
    Ok(end
        .checked_sub_days(Days::new(1))
        .filter(|inclusive| *inclusive >= start)
        .unwrap_or(start))
}

/// Vacation periods per zone, loaded on first use and kept for the run.
///
/// The raw calendar is also kept on disk so later runs skip the download.
/// That copy never expires.
#[derive(Debug)]
pub struct VacationCache {
    cache_dir: PathBuf,
    url_template: String,
    periods: HashMap<String, Vec<HolidayPeriod>>,
}

impl VacationCache {
    pub fn new(cache_dir: impl Into<PathBuf>, url_template: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            url_template: url_template.into(),
            periods: HashMap::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let cache_dir = config
            .vacations
            .cache_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);
        Self::new(cache_dir, config.vacations.url_template.clone())
    }

    pub fn cache_path(&self, zone: &str) -> PathBuf {
        let zone: String = zone
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '-' || *ch == '_')
            .collect();
        self.cache_dir
            .join(format!("cantine_bot-vacances-zone-{}.ics", zone))
    }

    pub async fn periods_for(
        &mut self,
        zone: &str,
        user_agent: &str,
        fetcher: &impl Fetcher,
    ) -> Result<&[HolidayPeriod], RunError> {
        if !self.periods.contains_key(zone) {
            let loaded = self.load(zone, user_agent, fetcher).await?;
            log::info!(
                "vacations_loaded zone={} periods={}",
                zone,
                loaded.len()
            );
            self.periods.insert(zone.to_string(), loaded);
        }

        Ok(self.periods.get(zone).map(Vec::as_slice).unwrap_or_default())
    }

    async fn load(
        &self,
        zone: &str,
        user_agent: &str,
        fetcher: &impl Fetcher,
    ) -> Result<Vec<HolidayPeriod>, RunError> {
        let path = self.cache_path(zone);
        if let Some(periods) = read_cached(&path).await {
            return Ok(periods);
        }

        let url = self.url_template.replace("{zone}", zone);
        log::info!("vacations_fetch zone={} url={}", zone, url);
        let bytes = fetcher.fetch(&url, user_agent).await?;
        let raw = String::from_utf8_lossy(&bytes);
        let periods = parse_vacation_calendar(&raw).map_err(crate::config::ConfigError::from)?;

        if let Err(error) = write_cache(&path, raw.as_bytes()).await {
            log::warn!(
                "vacations_cache_write_failed path={} error={}",
                path.display(),
                error
            );
        }

        Ok(periods)
    }
}

async fn read_cached(path: &Path) -> Option<Vec<HolidayPeriod>> {
    let raw = tokio::fs::read_to_string(path).await.ok()?;
    match parse_vacation_calendar(&raw) {
        Ok(periods) => Some(periods),
        Err(error) => {
            log::warn!(
                "vacations_cache_ignored path={} error={}",
                path.display(),
                error
            );
            None
        }
    }
}

async fn write_cache(path: &Path, raw: &[u8]) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, raw).await
}
