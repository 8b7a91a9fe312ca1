use std::path::Path;

use async_trait::async_trait;

use crate::error::AppResult;

/// Runs version-control commands inside a working directory.
///
/// Implementations check that `dir` is an accessible directory before every
/// call and report a non-zero exit as `AppError::ProcessExecution`.
#[async_trait]
pub trait ProcessInvoker: Send + Sync {
    async fn run(&self, dir: &Path, argv: &[String]) -> AppResult<String>;
}
