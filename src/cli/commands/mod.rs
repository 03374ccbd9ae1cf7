use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub mod config;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod pause;
pub mod record_commit;
pub mod resume;
pub mod setup_hook;
pub mod start;
pub mod status;
pub mod stop;
pub mod summary;
pub mod sync;

/// Open the configured database; pending migrations are applied on the way.
pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::with_timeout(&cfg.database, cfg.transaction_timeout_secs)?;
    init_db(&pool.conn)?;
    Ok(pool)
}
