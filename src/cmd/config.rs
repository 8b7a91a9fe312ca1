use std::io::{self, BufRead, Write};

use clap::{Args, Subcommand};

use crate::config::{
    DEFAULT_API_BASE_URL, DEFAULT_MODEL, KNOWN_MODELS, StoredConfig, config_file_path,
};
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    println!("Configuring daylog.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("The API key is stored in the local config file; protect your filesystem accordingly.");
    println!();

    configure(&mut cfg, &mut input, &mut output)?;
    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn configure(cfg: &mut StoredConfig, input: &mut impl BufRead, out: &mut impl Write) -> AppResult<()> {
    apply_prompt(input, out, "API key", &mut cfg.api_key, true)?;
    apply_prompt(
        input,
        out,
        &format!("API base URL (default {DEFAULT_API_BASE_URL})"),
        &mut cfg.api_base_url,
        false,
    )?;
    apply_prompt(
        input,
        out,
        &format!("Model ({})", KNOWN_MODELS.join("/")),
        &mut cfg.model,
        false,
    )?;
    apply_prompt(input, out, "Default prompt", &mut cfg.default_prompt, false)?;
    apply_prompt(input, out, "Git executable", &mut cfg.git_program, false)?;

    let mut concurrency = cfg.diff_concurrency.map(|n| n.to_string());
    apply_prompt(input, out, "Parallel diff queries per commit", &mut concurrency, false)?;
    cfg.diff_concurrency = parse_number(concurrency, "parallel diff queries")?;

    let mut timeout = cfg.command_timeout_secs.map(|n| n.to_string());
    apply_prompt(input, out, "Git command timeout in seconds", &mut timeout, false)?;
    cfg.command_timeout_secs = parse_number(timeout, "timeout")?;

    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("API key: {}", mask_secret(&cfg.api_key));
    println!(
        "API base URL: {}",
        display_or(&cfg.api_base_url, DEFAULT_API_BASE_URL)
    );
    println!("Model: {}", display_or(&cfg.model, DEFAULT_MODEL));
    println!("Default prompt: {}", display_value(&cfg.default_prompt));
    println!("Git executable: {}", display_or(&cfg.git_program, "git"));
    println!(
        "Parallel diff queries: {}",
        cfg.diff_concurrency.unwrap_or(1)
    );
    println!(
        "Git command timeout: {}",
        cfg.command_timeout_secs
            .map(|secs| format!("{secs}s"))
            .unwrap_or_else(|| "<none>".to_string())
    );

    Ok(())
}

fn parse_number<T: std::str::FromStr>(value: Option<String>, field: &str) -> AppResult<Option<T>> {
    value
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| AppError::Configuration(format!("{field} must be a number, got '{raw}'")))
        })
        .transpose()
}

fn apply_prompt(
    input: &mut impl BufRead,
    out: &mut impl Write,
    field: &str,
    target: &mut Option<String>,
    secret: bool,
) -> AppResult<()> {
    match prompt(input, out, field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(
    input: &mut impl BufRead,
    out: &mut impl Write,
    field: &str,
    current: Option<&str>,
    secret: bool,
) -> AppResult<PromptAction> {
    match (current, secret) {
        (Some(_), true) => write!(out, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => write!(out, "{field} [{value}] (Enter to keep, '-' to clear): ")?,
        (None, _) => write!(out, "{field} (Enter to skip): ")?,
    }
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let trimmed = line.trim();

    if trimmed.is_empty() {
        Ok(PromptAction::Keep)
    } else if trimmed == "-" {
        Ok(PromptAction::Clear)
    } else {
        Ok(PromptAction::Set(trimmed.to_string()))
    }
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<default>".to_string())
}

fn display_or(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

enum PromptAction {
    Keep,
    Clear,
    Set(String),
}
