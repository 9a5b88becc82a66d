use clap::Parser;
use chronicle_core::clock::{SystemClockProvider, UserContext};
use chronicle_core::db;
use chronicle_core::error::CoreError;
use chronicle_core::repository::SqliteRepository;
use owo_colors::{OwoColorize, Style};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod views;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Ignoring invalid configuration: {}", "Warning:".yellow().bold(), e);
            config::Config::default()
        }
    };
    init_tracing(&config.log_level);

    let db_pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            handle_error(e.into());
            std::process::exit(1);
        }
    };
    let repository = SqliteRepository::new(db_pool);

    if let Err(e) = run(&repository, &config, cli.command).await {
        handle_error(e);
        std::process::exit(1);
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(
    repository: &SqliteRepository,
    config: &config::Config,
    command: cli::Commands,
) -> anyhow::Result<()> {
    let clocks = SystemClockProvider::new(repository.clone(), config.fallback_timezone());
    let ctx = UserContext::resolve(&clocks, config.user_id).await?;
    let engine = config.engine();
    tracing::debug!(user_id = %ctx.user_id, timezone = %ctx.tz().name(), "Resolved user context");

    match command {
        cli::Commands::Day(command) => {
            commands::day::show_day(repository, &ctx, &engine, command).await
        }
        cli::Commands::Week(command) => {
            commands::week::show_week(repository, &ctx, &engine, command).await
        }
        cli::Commands::Stats(command) => {
            commands::stats::show_stats(repository, &ctx, command).await
        }
        cli::Commands::Materialize(command) => {
            commands::materialize::materialize_range(repository, &ctx, &engine, command).await
        }
        cli::Commands::Recur(command) => {
            commands::recur::add_recurring_event(repository, &ctx, command).await
        }
        cli::Commands::Zone(command) => {
            commands::zone::zone_command(repository, &ctx, command).await
        }
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    match err.chain().find_map(|cause| cause.downcast_ref::<CoreError>()) {
        Some(CoreError::NotFound(s)) => {
            eprintln!("{} {}", "Error:".style(error_style), s);
        }
        Some(CoreError::InvalidInput(s)) => {
            eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
        }
        Some(CoreError::InvalidTimezone(s)) => {
            eprintln!(
                "{} Invalid timezone: {}. Use IANA names like 'America/New_York'",
                "Error:".style(error_style),
                s.yellow()
            );
        }
        Some(CoreError::InvalidRecurrence(s)) => {
            eprintln!("{} Invalid recurrence: {}", "Error:".style(error_style), s);
        }
        Some(core_error @ (CoreError::Database(_) | CoreError::Migration(_))) => {
            eprintln!("{} {}", "Error:".style(error_style), core_error);
            if let Some(source) = std::error::Error::source(core_error) {
                eprintln!("  caused by: {}", source);
            }
        }
        _ => eprintln!("{} {}", "Error:".style(error_style), err),
    }
}
