use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::commit::CommitRecord;
use crate::error::{AppError, AppResult};
use crate::history::commands;
use crate::history::details::{parse_metadata_line, parse_path_list};
use crate::services::ProcessInvoker;

/// Lists the commits of a time window, newest first.
pub struct CommitListResolver<'a> {
    invoker: &'a dyn ProcessInvoker,
    repo: &'a Path,
}

impl<'a> CommitListResolver<'a> {
    pub fn new(invoker: &'a dyn ProcessInvoker, repo: &'a Path) -> Self {
        Self { invoker, repo }
    }

    /// Commit ids dated between `date 00:00:00` and `date 23:59:59`, both inclusive.
    pub async fn day_window(&self, date: NaiveDate) -> AppResult<Vec<String>> {
        let stdout = self.query(commands::day_log(date)).await?;
        let ids = dedup_ids(parse_path_list(&stdout).into_iter().map(|id| id.trim().to_string()));
        debug!(%date, commits = ids.len(), "resolved day window");
        Ok(ids)
    }

    /// Shallow records (metadata and paths only) for the last `days` days.
    pub async fn recent_window(&self, days: u32) -> AppResult<Vec<CommitRecord>> {
        let stdout = self.query(commands::recent_log(days)).await?;
        let records = parse_recent_log(&stdout);
        debug!(days, commits = records.len(), "resolved recent window");
        Ok(records)
    }

    async fn query(&self, argv: Vec<String>) -> AppResult<String> {
        self.invoker
            .run(self.repo, &argv)
            .await
            .map_err(|err| classify(self.repo, err))
    }
}

fn classify(repo: &Path, err: AppError) -> AppError {
    match err {
        AppError::ProcessExecution { stderr, .. }
            if stderr.to_lowercase().contains("not a git repository") =>
        {
            AppError::NotARepository {
                path: repo.to_path_buf(),
                message: stderr,
            }
        }
        other => other,
    }
}

fn dedup_ids(ids: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.filter(|id| {
        let fresh = seen.insert(id.clone());
        if !fresh {
            warn!(commit = %id, "dropping repeated commit id");
        }
        fresh
    })
    .collect()
}

/// Full SHA-1 or SHA-256 object name.
fn is_object_id(value: &str) -> bool {
    matches!(value.len(), 40 | 64) && value.chars().all(|c| c.is_ascii_hexdigit())
}

fn is_header_line(line: &str) -> bool {
    let mut fields = line.split('|');
    let id = fields.next().unwrap_or("");
    is_object_id(id) && fields.count() >= 2
}

/// Parses `log --pretty=format:%H|%an|%ad|%s --name-only` output.
///
/// Each metadata line opens a record; the non-blank lines after it are that
/// commit's paths until the next metadata line.
pub fn parse_recent_log(stdout: &str) -> Vec<CommitRecord> {
    let mut records: Vec<CommitRecord> = Vec::new();
    let mut seen = HashSet::new();
    let mut skipping = false;

    for line in stdout.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        if is_header_line(line) {
            match parse_metadata_line(line) {
                Ok(record) if seen.insert(record.id.clone()) => {
                    records.push(record);
                    skipping = false;
                }
                Ok(record) => {
                    warn!(commit = %record.id, "dropping repeated commit id");
                    skipping = true;
                }
                Err(err) => {
                    warn!(error = %err, "skipping unparsable log entry");
                    skipping = true;
                }
            }
            continue;
        }
        if skipping {
            continue;
        }
        match records.last_mut() {
            Some(current) => current.changed_files.push(line.to_string()),
            None => warn!(line, "path listed before any commit"),
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::scripted::ScriptedInvoker;

    const H1: &str = "1111111111111111111111111111111111111111";
    const H2: &str = "2222222222222222222222222222222222222222";

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn day_window_keeps_git_order() {
        let dir = tempfile::tempdir().unwrap();
        let invoker = ScriptedInvoker::new()
            .respond(commands::day_log(may_first()), format!("{H2}\n{H1}\n\n"));
        let ids = CommitListResolver::new(&invoker, dir.path())
            .day_window(may_first())
            .await
            .unwrap();
        assert_eq!(ids, vec![H2, H1]);
    }

    #[tokio::test]
    async fn empty_window_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let invoker = ScriptedInvoker::new().respond(commands::day_log(may_first()), "");
        let ids = CommitListResolver::new(&invoker, dir.path())
            .day_window(may_first())
            .await
            .unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn repeated_ids_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let invoker = ScriptedInvoker::new()
            .respond(commands::day_log(may_first()), format!("{H1}\n{H2}\n{H1}\n"));
        let ids = CommitListResolver::new(&invoker, dir.path())
            .day_window(may_first())
            .await
            .unwrap();
        assert_eq!(ids, vec![H1, H2]);
    }

    #[tokio::test]
    async fn non_repository_is_classified() {
        let dir = tempfile::tempdir().unwrap();
        let invoker = ScriptedInvoker::new().fail(
            commands::day_log(may_first()),
            128,
            "fatal: not a git repository (or any of the parent directories): .git",
        );
        let err = CommitListResolver::new(&invoker, dir.path())
            .day_window(may_first())
            .await
            .unwrap_err();
        match err {
            AppError::NotARepository { message, .. } => {
                assert!(message.contains("not a git repository"))
            }
            other => panic!("expected NotARepository, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn other_failures_stay_process_errors() {
        let dir = tempfile::tempdir().unwrap();
        let invoker =
            ScriptedInvoker::new().fail(commands::recent_log(3), 129, "usage: git log");
        let err = CommitListResolver::new(&invoker, dir.path())
            .recent_window(3)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::ProcessExecution {
                status: Some(129),
                ..
            }
        ));
    }

    #[test]
    fn recent_log_groups_paths_under_commits() {
        let stdout = format!(
            "{H2}|Bob|Thu May 2 09:00:00 2024 +0000|docs: a | b\nREADME.md\ndocs/x.md\n\n\
             {H1}|Alice|Wed May 1 10:00:00 2024 +0000|merge\n\
             {H1}|Alice|Wed May 1 10:00:00 2024 +0000|again\nlost.rs\n"
        );
        let records = parse_recent_log(&stdout);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, H2);
        assert_eq!(records[0].subject, "docs: a | b");
        assert_eq!(records[0].changed_files, vec!["README.md", "docs/x.md"]);
        assert!(records[0].file_changes.is_empty());
        assert_eq!(records[1].id, H1);
        assert_eq!(records[1].subject, "merge");
        assert!(records[1].changed_files.is_empty());
    }

    #[test]
    fn recent_log_without_output() {
        assert!(parse_recent_log("").is_empty());
        assert!(parse_recent_log("\n\n").is_empty());
    }

    #[test]
    fn file_names_with_pipes_are_not_headers() {
        assert!(!is_header_line("src/a|b|c.txt"));
        assert!(is_header_line(&format!("{H1}|a|d|s")));
        assert!(is_header_line(&format!("{H1}|a|d")));
    }
}
