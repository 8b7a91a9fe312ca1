use std::path::Path;

use crate::domain::commit::{FileChange, MAX_EXCERPT_LINES};
use crate::error::{AppError, AppResult};
use crate::history::commands;
use crate::services::ProcessInvoker;

/// Turns the single-file diff of one commit into a short excerpt.
pub struct DiffSummarizer<'a> {
    invoker: &'a dyn ProcessInvoker,
    repo: &'a Path,
}

impl<'a> DiffSummarizer<'a> {
    pub fn new(invoker: &'a dyn ProcessInvoker, repo: &'a Path) -> Self {
        Self { invoker, repo }
    }

    pub async fn summarize(&self, id: &str, path: &str) -> AppResult<FileChange> {
        let failure = |reason: String| AppError::FileDiff {
            id: id.to_string(),
            path: path.to_string(),
            reason,
        };

        let diff = self
            .invoker
            .run(self.repo, &commands::file_diff(id, path))
            .await
            .map_err(|err| failure(err.to_string()))?;

        let excerpt_lines = extract_excerpt(&diff);
        if excerpt_lines.is_empty() {
            return Err(failure("no added or removed lines".to_string()));
        }

        Ok(FileChange {
            path: path.to_string(),
            excerpt_lines,
        })
    }
}

/// First added or removed lines of a unified diff, skipping `+++`/`---` headers.
pub fn extract_excerpt(diff: &str) -> Vec<String> {
    diff.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| is_change_line(line))
        .take(MAX_EXCERPT_LINES)
        .map(str::to_string)
        .collect()
}

fn is_change_line(line: &str) -> bool {
    (line.starts_with('+') || line.starts_with('-'))
        && !line.starts_with("+++")
        && !line.starts_with("---")
}
