use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Quote a value for a POSIX shell script.
fn sh_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

pub struct HookLogic;

impl HookLogic {
    /// Body of the `post-commit` hook. `db` pins the database the hook writes to.
    pub fn script(db: Option<&str>) -> String {
        let db_arg = db
            .map(|p| format!(" --db {}", sh_quote(p)))
            .unwrap_or_default();

        format!(
            r#"#!/bin/sh
commit_hash=$(git rev-parse HEAD)
commit_message=$(git log -1 --pretty=%s)
commit_author=$(git log -1 --pretty=%an)
commit_date=$(git log -1 --pretty=%ad)

worklogger{db_arg} record-commit \
  --hash "$commit_hash" \
  --message "$commit_message" \
  --author "$commit_author" \
  --date "$commit_date"
"#
        )
    }

    /// Write `<repo>/.git/hooks/post-commit`. The hooks directory must already exist.
    pub fn install(repo: &Path, db: Option<&str>) -> AppResult<PathBuf> {
        let hooks = repo.join(".git").join("hooks");
        if !hooks.is_dir() {
            return Err(AppError::VersionControl(format!(
                "git hooks directory not found at {}; run 'git init' first",
                hooks.display()
            )));
        }

        let path = hooks.join("post-commit");
        fs::write(&path, Self::script(db))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        }

        Ok(path)
    }
}
