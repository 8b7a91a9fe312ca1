mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod history;
mod infra;
mod services;
mod workflow;

use std::error::Error as _;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::commits::{self, CommitsCommandArgs};
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::report::{self, ReportCommandArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::request::{HistoryWindow, parse_day};
use crate::error::AppResult;
use crate::infra::llm::ChatCompletionsClient;
use crate::infra::process::GitProcess;
use crate::infra::scripted::ScriptedInvoker;
use crate::services::ProcessInvoker;
use crate::workflow::report::ReportOutcome;

#[derive(Parser)]
#[command(
    name = "daylog",
    author,
    version,
    about = "Daily reports from local git history"
)]
struct Cli {
    /// Log pipeline progress to stderr (overrides DAYLOG_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the commits of a day or of the last few days as JSON.
    Commits(CommitsArgs),
    /// Draft a daily report from one day's commits.
    Report(ReportArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct PipelineArgs {
    /// Repository to read; defaults to the current directory.
    #[arg(short, long)]
    repo: Option<PathBuf>,
    /// Answer git queries from built-in sample data instead of running git.
    #[arg(long)]
    demo: bool,
    /// Kill git commands that run longer than this.
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,
    /// Diff queries run in parallel within one commit.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    diff_concurrency: Option<u32>,
}

#[derive(Args)]
struct CommitsArgs {
    #[command(flatten)]
    pipeline: PipelineArgs,
    /// Day to list (ISO-8601); defaults to today.
    #[arg(short, long, conflicts_with = "recent")]
    date: Option<String>,
    /// List the last N days without diff excerpts.
    #[arg(long, value_name = "DAYS", value_parser = clap::value_parser!(u32).range(1..))]
    recent: Option<u32>,
}

#[derive(Args)]
struct ReportArgs {
    #[command(flatten)]
    pipeline: PipelineArgs,
    /// Day to report on (ISO-8601); defaults to today.
    #[arg(short, long)]
    date: Option<String>,
    /// Extra instructions appended to the prompt.
    #[arg(short, long)]
    note: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(cli.command).await {
        eprintln!("Error: {error}");
        let mut source = error.source();
        while let Some(cause) = source {
            eprintln!("  Caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("DAYLOG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(command: Commands) -> AppResult<()> {
    match command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Commits(args) => run_commits(args).await,
        Commands::Report(args) => run_report(args).await,
    }
}

async fn run_commits(args: CommitsArgs) -> AppResult<()> {
    let date = resolve_date(args.date.as_deref())?;
    let window = match args.recent {
        Some(days) => HistoryWindow::recent(days)?,
        None => HistoryWindow::Day(date),
    };
    let recent_days = args.recent.unwrap_or(7);
    let (context, repo) = build_context(&args.pipeline, date, recent_days)?;

    let json = commits::run(&context, CommitsCommandArgs { repo, window }).await?;
    println!("{json}");
    Ok(())
}

async fn run_report(args: ReportArgs) -> AppResult<()> {
    let date = resolve_date(args.date.as_deref())?;
    let (context, repo) = build_context(&args.pipeline, date, 7)?;

    if context.config.api_key.is_none() {
        eprintln!("Warning: API key not configured; report drafting will fail.");
    }

    let outcome = report::run(
        &context,
        ReportCommandArgs {
            repo,
            date,
            note: args.note,
        },
    )
    .await?;

    match outcome {
        ReportOutcome::Drafted { report, commits } => {
            eprintln!("Drafted from {commits} commit(s).");
            println!("{report}");
        }
        ReportOutcome::NoCommits => println!("No commits found on {date}."),
    }
    Ok(())
}

fn resolve_date(input: Option<&str>) -> AppResult<chrono::NaiveDate> {
    match input {
        Some(value) => parse_day(value),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn build_context(
    args: &PipelineArgs,
    date: chrono::NaiveDate,
    recent_days: u32,
) -> AppResult<(AppContext, PathBuf)> {
    let mut config = AppConfig::load()?;
    if let Some(secs) = args.timeout_secs {
        config.command_timeout = (secs > 0).then(|| std::time::Duration::from_secs(secs));
    }
    if let Some(n) = args.diff_concurrency {
        config.diff_concurrency = n as usize;
    }

    let repo = match &args.repo {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    let process: Arc<dyn ProcessInvoker> = if args.demo {
        Arc::new(ScriptedInvoker::demo(date, recent_days))
    } else {
        Arc::new(GitProcess::new(
            config.git_program.clone(),
            config.command_timeout,
        ))
    };
    let language_model = Arc::new(ChatCompletionsClient::new(
        config.api_key.clone(),
        config.api_base_url.clone(),
        config.model.clone(),
        config.default_prompt.clone(),
    ));

    Ok((AppContext::new(config, process, language_model), repo))
}
