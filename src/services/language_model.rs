use async_trait::async_trait;

use crate::domain::report::ReportRequest;
use crate::error::AppResult;

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    async fn draft_report(&self, request: &ReportRequest) -> AppResult<String>;
}
