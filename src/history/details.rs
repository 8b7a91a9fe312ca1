use std::path::Path;

use tracing::debug;

use crate::domain::commit::CommitRecord;
use crate::error::{AppError, AppResult};
use crate::history::commands;
use crate::services::ProcessInvoker;

/// Fetches metadata, changed paths and the stat block of single commits.
pub struct CommitDetailFetcher<'a> {
    invoker: &'a dyn ProcessInvoker,
    repo: &'a Path,
}

impl<'a> CommitDetailFetcher<'a> {
    pub fn new(invoker: &'a dyn ProcessInvoker, repo: &'a Path) -> Self {
        Self { invoker, repo }
    }

    /// Returns the record with `file_changes` still empty.
    ///
    /// The three queries succeed or fail together: any failure is reported as
    /// `AppError::CommitFetch` for `id`.
    pub async fn fetch(&self, id: &str) -> AppResult<CommitRecord> {
        self.fetch_inner(id)
            .await
            .map_err(|err| AppError::commit_fetch(id, err))
    }

    async fn fetch_inner(&self, id: &str) -> AppResult<CommitRecord> {
        let metadata = self
            .invoker
            .run(self.repo, &commands::commit_metadata(id))
            .await?;
        let mut record = parse_metadata_line(first_line(&metadata))?;

        let names = self
            .invoker
            .run(self.repo, &commands::changed_files(id))
            .await?;
        record.changed_files = parse_path_list(&names);

        record.diff_stat_text = self.invoker.run(self.repo, &commands::diff_stat(id)).await?;

        debug!(
            commit = record.short_id(),
            files = record.changed_files.len(),
            "fetched commit details"
        );
        Ok(record)
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

/// Parses `id|author|date|subject`.
///
/// Only the first three `|` are separators. Everything after them is the
/// subject, pipes included.
pub fn parse_metadata_line(line: &str) -> AppResult<CommitRecord> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields = line.splitn(4, '|');
    let (Some(id), Some(author), Some(date)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(AppError::MalformedOutput(format!(
            "commit metadata: '{line}'"
        )));
    };
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::MalformedOutput(format!(
            "commit metadata has no hash: '{line}'"
        )));
    }
    let subject = fields.next().unwrap_or("");

    Ok(CommitRecord::new(
        id.to_string(),
        author.to_string(),
        date.to_string(),
        subject.to_string(),
    ))
}

/// One path per line, blank lines dropped, order kept.
pub fn parse_path_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
