//! One run, start to finish: pick the week, gate on what was already sent,
//! fetch the menu when it is not cached, optionally cut out the day, mail it
//! and record the send.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

use crate::calendar::{
    HolidayOracle, NonWorkingDays, VacationCache, WeekWindow, compute_week_window, day_key,
    week_key,
};
use crate::config::Config;
use crate::crop::Cropper;
use crate::error::RunError;
use crate::fetch::Fetcher;
use crate::mail::{Mailer, OutgoingMail};
use crate::menu::{MenuFiles, build_resource_id, is_cached, render_date_template};
use crate::status::{GateReason, RunStatus, read_status, should_run, write_status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Init,
    WindowComputed,
    Gated,
    IdentifierBuilt,
    SkippedNoWorkingWeek,
    CacheChecked,
    Fetched,
    CacheHit,
    Extracted,
    ExtractionSkipped,
    Sent,
    Persisted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Declined(GateReason),
    SkippedNoWorkingWeek,
    Sent {
        url: String,
        attachments: Vec<PathBuf>,
    },
}

pub struct Orchestrator<'a, F, C, M> {
    config: &'a Config,
    conf_hash: String,
    vacations: VacationCache,
    fetcher: &'a F,
    cropper: &'a C,
    mailer: &'a M,
    stages: Vec<RunStage>,
}

impl<'a, F, C, M> Orchestrator<'a, F, C, M>
where
    F: Fetcher,
    C: Cropper,
    M: Mailer,
{
    pub fn new(
        config: &'a Config,
        conf_hash: String,
        vacations: VacationCache,
        fetcher: &'a F,
        cropper: &'a C,
        mailer: &'a M,
    ) -> Self {
        Self {
            config,
            conf_hash,
            vacations,
            fetcher,
            cropper,
            mailer,
            stages: Vec::new(),
        }
    }

    pub fn stages(&self) -> &[RunStage] {
        &self.stages
    }

    pub async fn run(&mut self, today: NaiveDate) -> Result<RunOutcome, RunError> {
        let result = self.execute(today).await;
        if let Err(error) = &result {
            log::error!(
                "run_failed after_stage={:?} code={} error={}",
                self.stages.last().copied().unwrap_or(RunStage::Init),
                error.code(),
                error
            );
        }
        result
    }

    async fn execute(&mut self, today: NaiveDate) -> Result<RunOutcome, RunError> {
        let config = self.config;
        self.enter(RunStage::Init);

        let window = compute_week_window(today);
        log::info!(
            "week_window today={} week_monday={} target_day={}",
            today,
            window.week_monday,
            window.target_day
        );
        self.enter(RunStage::WindowComputed);

        let status_path = Path::new(&config.status_path);
        let status = read_status(status_path).await;
        let decision = should_run(&status, &window, config.include_day_menu, &self.conf_hash);
        self.enter(RunStage::Gated);
        if !decision.run {
            log::info!("run_declined reason={:?}", decision.reason);
            return Ok(RunOutcome::Declined(decision.reason));
        }
        if decision.sent_anyway {
            log::info!(
                "config_changed previous_reason={:?} action=send_anyway",
                decision.reason
            );
        }

        let periods = self
            .vacations
            .periods_for(&config.zone, &config.user_agent, self.fetcher)
            .await?;
        let oracle = HolidayOracle::new(periods);
        let url = build_resource_id(config, &oracle, window.week_monday);
        let target_off = oracle.is_non_working_day(window.target_day);
        let Some(url) = url else {
            log::info!(
                "no_working_day week_monday={} action=skip",
                window.week_monday
            );
            self.enter(RunStage::SkippedNoWorkingWeek);
            return Ok(RunOutcome::SkippedNoWorkingWeek);
        };
        log::info!("menu_url url={}", url);
        self.enter(RunStage::IdentifierBuilt);

        let files = MenuFiles::for_window(config, &window)?;
        let cached = is_cached(&files.menu).await;
        self.enter(RunStage::CacheChecked);

        if cached {
            log::info!("menu_cache_hit path={}", files.menu.display());
            self.enter(RunStage::CacheHit);
        } else {
            self.download(&url, &files.menu).await?;
            self.enter(RunStage::Fetched);
        }

        let mut attachments = vec![files.menu.clone()];
        if config.include_day_menu && !target_off {
            let day_index = window.target_day.weekday().number_from_monday();
            let rect = self
                .cropper
                .crop_day(&files.menu, day_index, &files.thumbnail)
                .await?;
            log::info!(
                "day_menu_extracted day={} path={} x={} y={} w={} h={}",
                day_index,
                files.thumbnail.display(),
                rect.x,
                rect.y,
                rect.width,
                rect.height
            );
            attachments.push(files.thumbnail.clone());
            self.enter(RunStage::Extracted);
        } else if config.include_day_menu {
            log::info!(
                "day_menu_extraction skipped target_day={} reason=non_working_day",
                window.target_day
            );
            self.enter(RunStage::ExtractionSkipped);
        } else {
            log::info!("day_menu_extraction disabled");
            self.enter(RunStage::ExtractionSkipped);
        }

        let mail = compose_mail(config, &window, &url, attachments.clone())?;
        let delivery = self.mailer.send(&mail).await?;
        log::info!("mail_sent response={}", delivery.response);
        self.enter(RunStage::Sent);

        let new_status = RunStatus {
            sent_week: Some(week_key(window.week_monday)),
            sent_day: Some(day_key(window.target_day)),
            conf_hash: Some(self.conf_hash.clone()),
        };
        write_status(status_path, &new_status).await?;
        self.enter(RunStage::Persisted);

        Ok(RunOutcome::Sent { url, attachments })
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<(), RunError> {
        log::info!("menu_fetch url={}", url);
        let bytes = self.fetcher.fetch(url, &self.config.user_agent).await?;

        let io_error = |source: std::io::Error| RunError::Io {
            path: dest.display().to_string(),
            source,
        };
        if let Some(parent) = dest.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        tokio::fs::write(dest, &bytes).await.map_err(io_error)?;

        log::info!("menu_written path={} bytes={}", dest.display(), bytes.len());
        Ok(())
    }

    fn enter(&mut self, stage: RunStage) {
        log::debug!("run_stage stage={:?}", stage);
        self.stages.push(stage);
    }
}

fn compose_mail(
    config: &Config,
    window: &WeekWindow,
    url: &str,
    attachments: Vec<PathBuf>,
) -> Result<OutgoingMail, RunError> {
    Ok(OutgoingMail {
        from: config.mail.from.clone(),
        to: config.mail.to.clone(),
        bcc: config.mail.bcc.clone(),
        subject: render_date_template(&config.mail.subject, window.week_monday)?,
        body: config.mail.text.replace("{URL}", url),
        attachments,
    })
}
