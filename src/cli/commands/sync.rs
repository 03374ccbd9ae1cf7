use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::SessionLogic;
use crate::core::sync::{Association, CommitSyncEngine, SyncTarget};
use crate::errors::{AppError, AppResult};
use crate::git::GitLog;
use crate::ui::messages::{info, success, warning};
use chrono::Utc;
use std::io::{self, BufRead, Write};

/// Choices of the interactive sync prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOption {
    Existing,
    New,
    Unassociated,
    Cancel,
}

impl SyncOption {
    pub const ALL: [SyncOption; 4] = [
        SyncOption::Existing,
        SyncOption::New,
        SyncOption::Unassociated,
        SyncOption::Cancel,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SyncOption::Existing => "Attach to an existing session",
            SyncOption::New => "Create a new session",
            SyncOption::Unassociated => "Leave commits unassociated",
            SyncOption::Cancel => "Cancel",
        }
    }

    /// Parse a 1-based menu choice.
    pub fn from_choice(input: &str) -> Option<Self> {
        let n: usize = input.trim().parse().ok()?;
        Self::ALL.get(n.checked_sub(1)?).copied()
    }
}

fn ask<R: BufRead>(input: &mut R, prompt: &str) -> AppResult<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(AppError::InvalidInput("no answer given".into()));
    }
    Ok(line.trim().to_string())
}

/// Ask which association to use. `None` means the user cancelled.
pub fn prompt_target<R: BufRead>(input: &mut R) -> AppResult<Option<SyncTarget>> {
    println!("No active session. Where should new commits go?");
    for (i, opt) in SyncOption::ALL.iter().enumerate() {
        println!("  {}) {}", i + 1, opt.label());
    }

    let choice = ask(input, "Choice: ")?;
    let option = SyncOption::from_choice(&choice)
        .ok_or_else(|| AppError::InvalidInput(format!("invalid choice '{}'", choice)))?;

    let target = match option {
        SyncOption::Existing => {
            let raw = ask(input, "Session id: ")?;
            let id = raw
                .parse::<i64>()
                .map_err(|_| AppError::InvalidInput(format!("invalid session id '{}'", raw)))?;
            SyncTarget::Existing(id)
        }
        SyncOption::New => SyncTarget::NewSession(ask(input, "Task description: ")?),
        SyncOption::Unassociated => SyncTarget::Unassociated,
        SyncOption::Cancel => return Ok(None),
    };
    Ok(Some(target))
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sync {
        repo,
        session,
        new,
        unassociated,
    } = cmd
    {
        let mut pool = open_pool(cfg)?;

        let requested = match (session, new, unassociated) {
            (Some(id), _, _) => Some(SyncTarget::Existing(*id)),
            (_, Some(desc), _) => Some(SyncTarget::NewSession(desc.clone())),
            (_, _, true) => Some(SyncTarget::Unassociated),
            _ => None,
        };

        let target = match requested {
            Some(t) => t,
            // the open session takes every commit anyway
            None if SessionLogic::get_open_session(&pool)?.is_some() => SyncTarget::Unassociated,
            None => match prompt_target(&mut io::stdin().lock())? {
                Some(t) => t,
                None => {
                    info("Sync cancelled.");
                    return Ok(());
                }
            },
        };

        let source = GitLog::new(repo.as_deref().unwrap_or(cfg.repository.as_str()));
        let report = CommitSyncEngine::sync(&mut pool, &source, target, Utc::now())?;

        match report.association {
            Association::ActiveSession(id) => success(format!(
                "Synced {} new commits to the active session #{}",
                report.inserted, id
            )),
            Association::Existing(id) => success(format!(
                "Synced {} new commits to session #{}",
                report.inserted, id
            )),
            Association::NewSession(id) => success(format!(
                "Created new session #{} and synced {} commits",
                id, report.inserted
            )),
            Association::Unassociated => success(format!(
                "Synced {} new commits (unassociated)",
                report.inserted
            )),
        }

        if !report.failures.is_empty() {
            warning(format!("{} commits could not be stored", report.failures.len()));
        }
    }
    Ok(())
}
