use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::ReportLogic;
use crate::errors::AppResult;
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { json } = cmd {
        let pool = open_pool(cfg)?;
        let rows = ReportLogic::session_rows(&pool, Utc::now())?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            ReportLogic::print_rows(&rows);
        }
    }
    Ok(())
}
