use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::ProcessInvoker;

/// Spawns the git executable once per call.
///
/// Children run under the C locale so stderr stays untranslated.
pub struct GitProcess {
    program: String,
    timeout: Option<Duration>,
}

impl GitProcess {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    fn describe(&self, argv: &[String]) -> String {
        let mut command = self.program.clone();
        for arg in argv {
            command.push(' ');
            command.push_str(arg);
        }
        command
    }
}

#[async_trait]
impl ProcessInvoker for GitProcess {
    async fn run(&self, dir: &Path, argv: &[String]) -> AppResult<String> {
        ensure_accessible_dir(dir).await?;

        let command = self.describe(argv);
        debug!(dir = %dir.display(), %command, "running");

        let child = Command::new(&self.program)
            .args(argv)
            .current_dir(dir)
            .env("LC_ALL", "C")
            .env("LANGUAGE", "C")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(AppError::ProcessExecution {
                        command,
                        status: None,
                        stderr: format!("timed out after {}s", limit.as_secs_f64()),
                    });
                }
            },
            None => child.await,
        }
        .map_err(|err| AppError::ProcessExecution {
            command: command.clone(),
            status: None,
            stderr: format!("failed to spawn: {err}"),
        })?;

        if !output.status.success() {
            return Err(AppError::ProcessExecution {
                command,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Fails with `DirectoryAccess` unless `dir` is a directory that can be listed.
pub async fn ensure_accessible_dir(dir: &Path) -> AppResult<()> {
    let access_error = |reason: String| AppError::DirectoryAccess {
        path: dir.to_path_buf(),
        reason,
    };

    let metadata = tokio::fs::metadata(dir)
        .await
        .map_err(|err| access_error(err.to_string()))?;
    if !metadata.is_dir() {
        return Err(access_error("not a directory".to_string()));
    }
    let _entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|err| access_error(err.to_string()))?;
    Ok(())
}
