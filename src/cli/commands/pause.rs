use crate::cli::commands::open_pool;
use crate::config::Config;
use crate::core::session::SessionLogic;
use crate::errors::AppResult;
use crate::models::outcome::PauseOutcome;
use crate::ui::messages::{info, success};
use crate::utils::time::format_duration;
use chrono::Utc;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let mut pool = open_pool(cfg)?;

    match SessionLogic::pause(&mut pool, Utc::now())? {
        PauseOutcome::Paused(interval) => success(format!(
            "Session #{} paused after {}",
            interval.session_id,
            format_duration(interval.duration_until(Utc::now()))
        )),
        PauseOutcome::AlreadyPaused => info("Session is already paused."),
    }
    Ok(())
}
