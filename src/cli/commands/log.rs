use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log { audit } = cmd {
        let pool = open_pool(cfg)?;

        if *audit {
            LogLogic::print_audit(&pool)?;
        } else {
            let days = LogLogic::session_log(&pool)?;
            LogLogic::print_sessions(&days, &cfg.separator_char);
        }
    }

    Ok(())
}
