use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{AppError, AppResult};
use crate::history::commands;
use crate::infra::process::ensure_accessible_dir;
use crate::services::ProcessInvoker;

enum Scripted {
    Stdout(String),
    Failure { status: i32, stderr: String },
}

/// Answers git queries from a fixed table instead of spawning processes.
///
/// Only selected explicitly (tests, `--demo`); any argv missing from the
/// table fails like a git error would.
#[derive(Default)]
pub struct ScriptedInvoker {
    responses: HashMap<Vec<String>, Scripted>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, argv: Vec<String>, stdout: impl Into<String>) -> Self {
        self.responses.insert(argv, Scripted::Stdout(stdout.into()));
        self
    }

    pub fn fail(mut self, argv: Vec<String>, status: i32, stderr: impl Into<String>) -> Self {
        self.responses.insert(
            argv,
            Scripted::Failure {
                status,
                stderr: stderr.into(),
            },
        );
        self
    }

    /// Two synthetic commits on `date`, with diffs for every file. The same
    /// commits answer a recent window of `recent_days`.
    pub fn demo(date: NaiveDate, recent_days: u32) -> Self {
        const LOGIN: &str = "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678";
        const VALIDATE: &str = "b2c3d4e5f60718293a4b5c6d7e8f901234567890";
        let stamp = date.format("%a %b %-d 10:24:00 %Y +0800").to_string();

        Self::new()
            .respond(commands::day_log(date), format!("{VALIDATE}\n{LOGIN}"))
            .respond(
                commands::recent_log(recent_days),
                format!(
                    "{VALIDATE}|Demo User|{stamp}|fix: tighten form validation\n\
                     src/utils/validators.js\n\n\
                     {LOGIN}|Demo User|{stamp}|feat: add user login\n\
                     src/components/Login.vue\nsrc/services/auth.js\n"
                ),
            )
            .respond(
                commands::commit_metadata(LOGIN),
                format!("{LOGIN}|Demo User|{stamp}|feat: add user login"),
            )
            .respond(
                commands::changed_files(LOGIN),
                "src/components/Login.vue\nsrc/services/auth.js\n",
            )
            .respond(
                commands::diff_stat(LOGIN),
                " src/components/Login.vue | 9 ++++++---\n src/services/auth.js     | 6 ++++++\n \
                 2 files changed, 12 insertions(+), 3 deletions(-)\n",
            )
            .respond(
                commands::file_diff(LOGIN, "src/components/Login.vue"),
                "diff --git a/src/components/Login.vue b/src/components/Login.vue\n\
                 --- a/src/components/Login.vue\n\
                 +++ b/src/components/Login.vue\n\
                 @@ -1,3 +1,6 @@\n\
                 -import { useState } from 'react';\n\
                 +import { ref, reactive } from 'vue';\n\
                 +import { useAuth } from '../services/auth';\n\
                 +const { login, isAuthenticated } = useAuth();\n",
            )
            .respond(
                commands::file_diff(LOGIN, "src/services/auth.js"),
                "diff --git a/src/services/auth.js b/src/services/auth.js\n\
                 --- /dev/null\n\
                 +++ b/src/services/auth.js\n\
                 @@ -0,0 +1,6 @@\n\
                 +export const useAuth = () => {\n\
                 +  const isAuthenticated = ref(false);\n\
                 +  const login = async () => {\n\
                 +    isAuthenticated.value = true;\n\
                 +  };\n\
                 +  return { login, isAuthenticated };\n",
            )
            .respond(
                commands::commit_metadata(VALIDATE),
                format!("{VALIDATE}|Demo User|{stamp}|fix: tighten form validation"),
            )
            .respond(commands::changed_files(VALIDATE), "src/utils/validators.js\n")
            .respond(
                commands::diff_stat(VALIDATE),
                " src/utils/validators.js | 5 ++++-\n 1 file changed, 4 insertions(+), 1 deletion(-)\n",
            )
            .respond(
                commands::file_diff(VALIDATE, "src/utils/validators.js"),
                "--- a/src/utils/validators.js\n\
                 +++ b/src/utils/validators.js\n\
                 @@ -1 +1,4 @@\n\
                 -export const validateEmail = (email) => EMAIL.test(email);\n\
                 +export const validateEmail = (email) => {\n\
                 +  if (!email) return false;\n\
                 +  return EMAIL.test(email.trim());\n\
                 +};\n",
            )
    }
}

#[async_trait]
impl ProcessInvoker for ScriptedInvoker {
    async fn run(&self, dir: &Path, argv: &[String]) -> AppResult<String> {
        ensure_accessible_dir(dir).await?;

        match self.responses.get(argv) {
            Some(Scripted::Stdout(stdout)) => Ok(stdout.clone()),
            Some(Scripted::Failure { status, stderr }) => Err(AppError::ProcessExecution {
                command: format!("git {}", argv.join(" ")),
                status: Some(*status),
                stderr: stderr.clone(),
            }),
            None => Err(AppError::ProcessExecution {
                command: format!("git {}", argv.join(" ")),
                status: Some(128),
                stderr: "no scripted response".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unscripted_commands_fail() {
        let dir = tempfile::tempdir().unwrap();
        let invoker = ScriptedInvoker::new();
        let err = invoker
            .run(dir.path(), &["status".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ProcessExecution { .. }));
    }

    #[tokio::test]
    async fn still_checks_the_directory() {
        let invoker = ScriptedInvoker::new().respond(vec!["status".to_string()], "clean");
        let err = invoker
            .run(Path::new("/definitely/not/here"), &["status".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DirectoryAccess { .. }));
    }
}
