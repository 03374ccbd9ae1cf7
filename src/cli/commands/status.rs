use crate::cli::commands::open_pool;
use crate::config::Config;
use crate::core::session::SessionLogic;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::time::{format_duration, format_local};
use chrono::Utc;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;

    let Some(state) = SessionLogic::status(&pool, Utc::now())? else {
        info("No active task session.");
        return Ok(());
    };

    println!("📌 Session #{}: {}", state.session.id, state.task.description);
    println!("   Status   : {}", state.status.as_str());
    println!("   Started  : {}", format_local(state.session.started_at));
    println!("   Intervals: {}", state.intervals.len());
    println!("   Active   : {}", format_duration(state.active));
    Ok(())
}
