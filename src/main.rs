mod calendar;
mod config;
mod crop;
mod error;
mod fetch;
mod mail;
mod menu;
mod pipeline;
mod status;
mod system;

use std::process::ExitCode;

use chrono::Local;
use tracing_subscriber::EnvFilter;

use crate::calendar::VacationCache;
use crate::config::{config_hash, load_config, resolve_config_path};
use crate::crop::ImageCropper;
use crate::error::RunError;
use crate::fetch::HttpFetcher;
use crate::mail::SmtpMailer;
use crate::pipeline::{Orchestrator, RunOutcome};

fn init_json_logging() {
    if let Err(error) = tracing_log::LogTracer::init() {
        eprintln!(
            "logging bridge initialization failed (continuing with existing logger): {}",
            error
        );
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("global logger initialization failed: {}", error);
    }
}

async fn run() -> Result<RunOutcome, RunError> {
    let config_path = resolve_config_path(std::env::args().nth(1));
    let config = load_config(&config_path)?;
    let conf_hash = config_hash(&config);
    log::info!(
        "config_loaded path={} rpc_code={} zone={} include_day_menu={}",
        config_path.display(),
        config.rpc_code,
        config.zone,
        config.include_day_menu
    );

    let fetcher = HttpFetcher::new(config.fetch_timeout_secs)?;
    let cropper = ImageCropper::from_config(&config.day_menu);
    let mailer = SmtpMailer::from_url(&config.mail.transport)?;
    let vacations = VacationCache::from_config(&config);

    let mut orchestrator =
        Orchestrator::new(&config, conf_hash, vacations, &fetcher, &cropper, &mailer);
    orchestrator.run(Local::now().date_naive()).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_json_logging();

    match run().await {
        Ok(RunOutcome::Sent { url, attachments }) => {
            log::info!(
                "run_finished outcome=sent url={} attachments={}",
                url,
                attachments.len()
            );
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            log::info!("run_finished outcome={:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(error) => {
            log::error!("run_aborted code={} error={}", error.code(), error);
            ExitCode::FAILURE
        }
    }
}
