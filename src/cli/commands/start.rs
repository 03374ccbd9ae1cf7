use crate::cli::parser::Commands;
use crate::cli::commands::open_pool;
use crate::config::Config;
use crate::core::session::{SessionLogic, StartRequest};
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::time::format_local;
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Start {
        description,
        tags,
        kpis,
    } = cmd
    {
        let mut pool = open_pool(cfg)?;
        let request = StartRequest {
            description: description.clone(),
            tags: tags.clone(),
            kpis: kpis.clone(),
        };

        let started = SessionLogic::start(&mut pool, &request, Utc::now())?;

        success(format!(
            "Started session #{} for '{}' at {}",
            started.session.id,
            started.task.description,
            format_local(started.session.started_at)
        ));
    }
    Ok(())
}
