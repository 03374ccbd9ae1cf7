use crate::cli::parser::{Cli, Commands};
use crate::core::hook::HookLogic;
use crate::db::log::ttlog_lenient;
use crate::cli::commands::open_pool;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use std::path::Path;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::SetupHook { repo } = &cli.command {
        let root = Path::new(repo.as_deref().unwrap_or("."));

        // a --db override is pinned into the hook so commits land in the same file
        let path = HookLogic::install(root, cli.db.as_deref())?;

        let pool = open_pool(cfg)?;
        ttlog_lenient(
            &pool.conn,
            "setup_hook",
            &path.display().to_string(),
            "Installed post-commit hook",
        );

        success(format!("Git post-commit hook installed at {}", path.display()));
        info("All future commits will be recorded by worklogger.");
    }
    Ok(())
}
