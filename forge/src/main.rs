//! IdeaForge - product interview CLI
//!
//! CLI entry point: runs the interview or inspects the stage table.

use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use ideaforge::InterviewTurnResult;
use ideaforge::cli::{Cli, Command, OutputFormat, generate_after_help};
use ideaforge::config::Config;
use ideaforge::gateway::create_gateway;
use ideaforge::interview::Stage;
use ideaforge::prompts::PromptLoader;
use ideaforge::repl::InterviewRepl;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ideaforge")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("ideaforge.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(model = %config.llm.model, mode = %config.gateway_mode(), "IdeaForge loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Interview { offline, output }) => cmd_interview(config, offline, output).await,
        Some(Command::Stages { format }) => cmd_stages(format),
        None => {
            debug!("main: no command, defaulting to interview");
            cmd_interview(config, false, None).await
        }
    }
}

async fn cmd_interview(mut config: Config, offline: bool, output: Option<PathBuf>) -> Result<()> {
    debug!(offline, ?output, "cmd_interview: called");
    if offline {
        config.interview.offline = true;
    }
    if let Some(dir) = output {
        config.output.dir = dir;
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let gateway = create_gateway(&config, PromptLoader::new(&cwd)).context("Failed to set up the language model")?;

    let mut repl = InterviewRepl::new(gateway, config.output.dir.clone());
    repl.run().await
}

/// One row of the stage table
#[derive(Serialize)]
struct StageRow {
    stage: Stage,
    turns: &'static str,
    #[serde(flatten)]
    result: InterviewTurnResult,
}

fn cmd_stages(format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_stages: called");
    let rows: Vec<StageRow> = Stage::ALL
        .iter()
        .map(|stage| StageRow {
            stage: *stage,
            turns: stage.turn_range(),
            result: stage.turn_result(),
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&rows)?),
        OutputFormat::Text => {
            for row in &rows {
                let title = row
                    .result
                    .form
                    .as_ref()
                    .and_then(|f| f.title.as_deref())
                    .unwrap_or("(generation handoff)");
                println!("{:<20} turns {:<6} {}", row.stage.to_string().bold(), row.turns, title.cyan());
                if let Some(form) = &row.result.form {
                    for field in &form.fields {
                        let required = if field.required { " *" } else { "" };
                        println!("    {:<18} {}{}", field.id, field.label, required);
                        if !field.options.is_empty() {
                            println!("    {:<18} {}", "", field.options.join(" | ").dimmed());
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
