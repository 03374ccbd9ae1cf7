//! Version-control log boundary.

use crate::errors::{AppError, AppResult};
use crate::models::commit::GitCommit;
use std::path::{Path, PathBuf};
use std::process::Command;

/// `hash|author|date|subject`, one commit per line.
pub const LOG_FORMAT: &str = "--pretty=format:%H|%an|%ad|%s";

/// Anything that can list the commit history, newest first.
pub trait CommitSource {
    fn fetch(&self) -> AppResult<Vec<GitCommit>>;
}

/// Parse `git log` output. Lines with fewer than four fields are skipped;
/// the subject keeps any further `|`.
pub fn parse_log(output: &str) -> Vec<GitCommit> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.splitn(4, '|');
            let hash = parts.next()?.trim();
            let author = parts.next()?;
            let date = parts.next()?;
            let message = parts.next()?;

            if hash.is_empty() {
                return None;
            }

            Some(GitCommit {
                hash: hash.to_string(),
                author: author.to_string(),
                date: date.to_string(),
                message: message.to_string(),
            })
        })
        .collect()
}

/// Runs `git log` inside a repository.
#[derive(Debug, Clone)]
pub struct GitLog {
    repository: PathBuf,
}

impl GitLog {
    pub fn new(repository: impl AsRef<Path>) -> Self {
        Self {
            repository: repository.as_ref().to_path_buf(),
        }
    }
}

impl CommitSource for GitLog {
    fn fetch(&self) -> AppResult<Vec<GitCommit>> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repository)
            .args(["log", LOG_FORMAT])
            .output()
            .map_err(|e| AppError::VersionControl(format!("failed to run git log: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::VersionControl(format!(
                "git log failed: {}",
                stderr.trim()
            )));
        }

        Ok(parse_log(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// A fixed history, e.g. for tests or replays.
impl CommitSource for Vec<GitCommit> {
    fn fetch(&self) -> AppResult<Vec<GitCommit>> {
        Ok(self.clone())
    }
}
