use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{LanguageModelService, ProcessInvoker};
use crate::workflow::history::CommitAggregator;

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub process: Arc<dyn ProcessInvoker>,
    pub language_model: Arc<dyn LanguageModelService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        process: Arc<dyn ProcessInvoker>,
        language_model: Arc<dyn LanguageModelService>,
    ) -> Self {
        Self {
            config,
            process,
            language_model,
        }
    }

    pub fn aggregator(&self) -> CommitAggregator {
        CommitAggregator::new(self.process.clone(), self.config.diff_concurrency)
    }
}
