use std::path::PathBuf;

use chrono::NaiveDate;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::report::{ReportOutcome, draft_daily_report};

#[derive(Debug, Clone)]
pub struct ReportCommandArgs {
    pub repo: PathBuf,
    pub date: NaiveDate,
    pub note: Option<String>,
}

pub async fn run(ctx: &AppContext, args: ReportCommandArgs) -> AppResult<ReportOutcome> {
    if !ctx.config.is_known_model() {
        tracing::warn!(model = %ctx.config.model, "model is not in the known model list");
    }
    draft_daily_report(ctx, args.repo, args.date, args.note).await
}
