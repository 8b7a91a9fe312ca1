use std::io;
use std::path::PathBuf;

use crate::context::AppContext;
use crate::domain::commit::CommitRecord;
use crate::domain::request::{HistoryRequest, HistoryWindow};
use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct CommitsCommandArgs {
    pub repo: PathBuf,
    pub window: HistoryWindow,
}

pub async fn run(ctx: &AppContext, args: CommitsCommandArgs) -> AppResult<String> {
    let request = HistoryRequest::new(args.repo, args.window);
    let commits = ctx.aggregator().collect(&request).await?;
    render(&commits)
}

fn render(commits: &[CommitRecord]) -> AppResult<String> {
    let json = serde_json::to_string_pretty(commits).map_err(io::Error::from)?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::config::{AppConfig, StoredConfig};
    use crate::infra::llm::ChatCompletionsClient;
    use crate::infra::scripted::ScriptedInvoker;

    #[tokio::test]
    async fn prints_records_as_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let config = AppConfig::resolve(StoredConfig::default(), |_| None);
        let model = Arc::new(ChatCompletionsClient::new(
            None,
            config.api_base_url.clone(),
            config.model.clone(),
            config.default_prompt.clone(),
        ));
        let ctx = AppContext::new(config, Arc::new(ScriptedInvoker::demo(date, 7)), model);

        let out = run(
            &ctx,
            CommitsCommandArgs {
                repo: dir.path().to_path_buf(),
                window: HistoryWindow::Day(date),
            },
        )
        .await
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let commits = value.as_array().unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0]["message"], "fix: tighten form validation");
        assert_eq!(commits[1]["files"].as_array().unwrap().len(), 2);
        assert_eq!(commits[1]["fileChanges"][0]["file"], "src/components/Login.vue");
    }
}
