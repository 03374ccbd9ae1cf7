use crate::cli::commands::open_pool;
use crate::config::Config;
use crate::core::session::SessionLogic;
use crate::errors::AppResult;
use crate::models::outcome::ResumeOutcome;
use crate::ui::messages::{info, success};
use chrono::Utc;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let mut pool = open_pool(cfg)?;

    match SessionLogic::resume(&mut pool, Utc::now())? {
        ResumeOutcome::Resumed(interval) => {
            success(format!("Session #{} resumed", interval.session_id))
        }
        ResumeOutcome::AlreadyRunning => info("Session is already running."),
    }
    Ok(())
}
