use std::path::Path;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::domain::commit::{CommitRecord, FileChange};
use crate::domain::request::{HistoryRequest, HistoryWindow};
use crate::error::AppResult;
use crate::history::{CommitDetailFetcher, CommitListResolver, DiffSummarizer};
use crate::services::ProcessInvoker;

/// Drives resolver, detail fetcher and diff summarizer for one request.
///
/// Resolver failures abort the call. Failures for a single commit or file
/// are logged and that item is left out.
pub struct CommitAggregator {
    invoker: Arc<dyn ProcessInvoker>,
    diff_concurrency: usize,
}

impl CommitAggregator {
    pub fn new(invoker: Arc<dyn ProcessInvoker>, diff_concurrency: usize) -> Self {
        Self {
            invoker,
            diff_concurrency: diff_concurrency.max(1),
        }
    }

    pub async fn collect(&self, request: &HistoryRequest) -> AppResult<Vec<CommitRecord>> {
        let repo = request.repo_path.as_path();
        let resolver = CommitListResolver::new(self.invoker.as_ref(), repo);

        let ids = match request.window {
            HistoryWindow::Recent { days } => return resolver.recent_window(days).await,
            HistoryWindow::Day(date) => resolver.day_window(date).await?,
        };

        let fetcher = CommitDetailFetcher::new(self.invoker.as_ref(), repo);
        let mut commits = Vec::with_capacity(ids.len());
        for id in &ids {
            let mut record = match fetcher.fetch(id).await {
                Ok(record) => record,
                Err(err) => {
                    warn!(commit = %id, error = %err, "dropping commit");
                    continue;
                }
            };
            record.file_changes = self.summarize_files(repo, &record).await;
            commits.push(record);
        }

        info!(
            resolved = ids.len(),
            kept = commits.len(),
            "collected commit history"
        );
        Ok(commits)
    }

    /// Excerpts for each changed file, in `changed_files` order.
    async fn summarize_files(&self, repo: &Path, record: &CommitRecord) -> Vec<FileChange> {
        let summarizer = DiffSummarizer::new(self.invoker.as_ref(), repo);
        let summarizer = &summarizer;
        let id = record.id.as_str();

        let results: Vec<_> = stream::iter(record.changed_files.iter())
            .map(|path| async move { summarizer.summarize(id, path).await })
            .buffered(self.diff_concurrency)
            .collect()
            .await;

        results
            .into_iter()
            .filter_map(|result| match result {
                Ok(change) => Some(change),
                Err(err) => {
                    warn!(error = %err, "dropping file change");
                    None
                }
            })
            .collect()
    }
}
