use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const CONFIG_DIR_NAME: &str = "daylog";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_API_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_PROMPT: &str = "Summarize today's work from my git commits in detail: \
the tasks completed, the problems solved and the progress made. Use a clear layout with \
bullet points and include the key technical details.";
pub const KNOWN_MODELS: [&str; 3] = ["deepseek-chat", "deepseek-reasoner", "deepseek-coder"];

/// Settings as persisted on disk. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_program: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_concurrency: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_timeout_secs: Option<u64>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| AppError::Configuration("no config directory on this platform".to_string()))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// Effective settings: environment over config file over defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model: String,
    pub default_prompt: String,
    pub git_program: String,
    pub diff_concurrency: usize,
    pub command_timeout: Option<Duration>,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Ok(Self::resolve(stored, |key| env::var(key).ok()))
    }

    pub fn resolve(stored: StoredConfig, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |key: &str, stored: Option<String>| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .or(stored)
                .filter(|value| !value.trim().is_empty())
        };

        Self {
            api_key: pick("DAYLOG_API_KEY", stored.api_key),
            api_base_url: pick("DAYLOG_API_BASE_URL", stored.api_base_url)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            model: pick("DAYLOG_MODEL", stored.model).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            default_prompt: pick("DAYLOG_DEFAULT_PROMPT", stored.default_prompt)
                .unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            git_program: stored.git_program.unwrap_or_else(|| "git".to_string()),
            diff_concurrency: stored.diff_concurrency.unwrap_or(1).max(1),
            command_timeout: stored
                .command_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    pub fn is_known_model(&self) -> bool {
        KNOWN_MODELS.contains(&self.model.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_apply_without_settings() {
        let config = AppConfig::resolve(StoredConfig::default(), no_env);
        assert_eq!(config.api_key, None);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.default_prompt, DEFAULT_PROMPT);
        assert_eq!(config.git_program, "git");
        assert_eq!(config.diff_concurrency, 1);
        assert_eq!(config.command_timeout, None);
        assert!(config.is_known_model());
    }

    #[test]
    fn environment_wins_over_file() {
        let stored = StoredConfig {
            api_key: Some("file-key".to_string()),
            model: Some("deepseek-coder".to_string()),
            command_timeout_secs: Some(30),
            ..StoredConfig::default()
        };
        let env: HashMap<&str, &str> = [("DAYLOG_API_KEY", "env-key"), ("DAYLOG_MODEL", " ")]
            .into_iter()
            .collect();
        let config = AppConfig::resolve(stored, |key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.model, "deepseek-coder");
        assert_eq!(config.command_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn unknown_models_are_flagged() {
        let stored = StoredConfig {
            model: Some("gpt-x".to_string()),
            ..StoredConfig::default()
        };
        assert!(!AppConfig::resolve(stored, no_env).is_known_model());
    }

    #[test]
    fn stored_config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        assert_eq!(StoredConfig::load_from(&path).unwrap(), StoredConfig::default());

        let stored = StoredConfig {
            api_key: Some("sk-123".to_string()),
            default_prompt: Some("Be brief.".to_string()),
            diff_concurrency: Some(4),
            ..StoredConfig::default()
        };
        stored.save_to(&path).unwrap();
        assert_eq!(StoredConfig::load_from(&path).unwrap(), stored);
    }

    #[test]
    fn corrupt_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            StoredConfig::load_from(&path),
            Err(AppError::Configuration(_))
        ));
    }
}
