use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot access directory {}: {reason}", path.display())]
    DirectoryAccess { path: PathBuf, reason: String },
    #[error("not a git repository: {}: {message}", path.display())]
    NotARepository { path: PathBuf, message: String },
    #[error("`{command}` failed ({}): {stderr}", describe_status(*status))]
    ProcessExecution {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
    #[error("failed to fetch commit {id}: {source}")]
    CommitFetch {
        id: String,
        #[source]
        source: Box<AppError>,
    },
    #[error("failed to summarize {path} in {id}: {reason}")]
    FileDiff {
        id: String,
        path: String,
        reason: String,
    },
    #[error("unexpected git output: {0}")]
    MalformedOutput(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("language model error: {0}")]
    LanguageModel(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    pub fn commit_fetch(id: &str, source: AppError) -> Self {
        AppError::CommitFetch {
            id: id.to_string(),
            source: Box::new(source),
        }
    }
}

fn describe_status(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {code}"),
        None => "no exit status".to_string(),
    }
}

pub type AppResult<T> = Result<T, AppError>;
