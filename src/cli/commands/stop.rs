use crate::cli::parser::Commands;
use crate::cli::commands::open_pool;
use crate::config::Config;
use crate::core::session::SessionLogic;
use crate::errors::AppResult;
use crate::models::outcome::StopOutcome;
use crate::ui::messages::{header, info, success};
use crate::utils::time::format_duration;
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stop { id } = cmd {
        let mut pool = open_pool(cfg)?;
        let now = Utc::now();

        let outcome = match id {
            Some(id) => SessionLogic::stop_session(&mut pool, *id, now)?,
            None => SessionLogic::stop(&mut pool, now)?,
        };

        match outcome {
            StopOutcome::Stopped { session, durations } => {
                success(format!("Session #{} stopped", session.id));
                header("Session summary");
                println!("Active : {}", format_duration(durations.active));
                println!("Paused : {}", format_duration(durations.paused));
                println!("Total  : {}", format_duration(durations.total));
            }
            StopOutcome::AlreadyStopped => info("Session is already stopped."),
        }
    }
    Ok(())
}
