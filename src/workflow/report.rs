use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::info;

use crate::context::AppContext;
use crate::domain::report::ReportRequest;
use crate::domain::request::{HistoryRequest, HistoryWindow};
use crate::error::{AppError, AppResult};

pub enum ReportOutcome {
    Drafted { report: String, commits: usize },
    NoCommits,
}

pub async fn draft_daily_report(
    ctx: &AppContext,
    repo_path: PathBuf,
    date: NaiveDate,
    note: Option<String>,
) -> AppResult<ReportOutcome> {
    let request = HistoryRequest::new(repo_path, HistoryWindow::Day(date));
    let commits = ctx.aggregator().collect(&request).await?;
    if commits.is_empty() {
        info!(%date, "no commits to report");
        return Ok(ReportOutcome::NoCommits);
    }

    let count = commits.len();
    let report = ctx
        .language_model
        .draft_report(&ReportRequest {
            date,
            repo_path: request.repo_path,
            note,
            commits,
        })
        .await?;

    if report.trim().is_empty() {
        return Err(AppError::LanguageModel(
            "language model returned an empty report".to_string(),
        ));
    }

    Ok(ReportOutcome::Drafted {
        report,
        commits: count,
    })
}
