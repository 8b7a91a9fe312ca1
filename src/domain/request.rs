use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryWindow {
    /// Every commit dated on this calendar day, in git's local time.
    Day(NaiveDate),
    /// Commits from the last `days` days, without diff excerpts.
    Recent { days: u32 },
}

impl HistoryWindow {
    pub fn recent(days: u32) -> AppResult<Self> {
        if days == 0 {
            return Err(AppError::InvalidRequest(
                "recent window must cover at least one day".to_string(),
            ));
        }
        Ok(HistoryWindow::Recent { days })
    }
}

#[derive(Debug, Clone)]
pub struct HistoryRequest {
    pub repo_path: PathBuf,
    pub window: HistoryWindow,
}

impl HistoryRequest {
    pub fn new(repo_path: impl Into<PathBuf>, window: HistoryWindow) -> Self {
        Self {
            repo_path: repo_path.into(),
            window,
        }
    }
}

/// Parses an ISO-8601 date or date-time and keeps the calendar date as written.
pub fn parse_day(input: &str) -> AppResult<NaiveDate> {
    let value = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(stamp.date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|stamp| stamp.date())
        .map_err(|_| AppError::InvalidRequest(format!("'{input}' is not an ISO-8601 date")))
}
