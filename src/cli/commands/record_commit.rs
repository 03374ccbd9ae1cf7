use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::sync::CommitSyncEngine;
use crate::errors::AppResult;
use crate::models::commit::GitCommit;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::RecordCommit {
        hash,
        message,
        author,
        date,
    } = cmd
    {
        let mut pool = open_pool(cfg)?;
        let commit = GitCommit {
            hash: hash.clone(),
            author: author.clone(),
            date: date.clone(),
            message: message.clone(),
        };

        let outcome = CommitSyncEngine::record(&mut pool, &commit)?;

        match (outcome.inserted, outcome.session_id) {
            (false, _) => info(format!("Commit {} already recorded", commit.hash)),
            (true, Some(id)) => success(format!("Commit recorded in session #{}", id)),
            (true, None) => success("Commit recorded (no active session)"),
        }
    }
    Ok(())
}
