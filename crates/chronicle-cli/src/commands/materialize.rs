use anyhow::{anyhow, Result};
use chrono::Duration;
use chronicle_core::clock::UserContext;
use chronicle_core::config::EngineConfig;
use chronicle_core::materialization::Materializer;
use chronicle_core::repository::Repository;
use chronicle_core::timezone::start_of_day;
use chronicle_core::window::TimeWindow;
use owo_colors::OwoColorize;

use crate::cli::MaterializeCommand;
use crate::parser::parse_date;

pub async fn materialize_range<R: Repository>(
    repository: &R,
    ctx: &UserContext,
    engine: &EngineConfig,
    command: MaterializeCommand,
) -> Result<()> {
    let from = parse_date(&command.from, &ctx.clock)?;
    let to = parse_date(&command.to, &ctx.clock)?;
    if to < from {
        return Err(anyhow!("--to ({}) is before --from ({})", to, from));
    }

    let window = TimeWindow::new(
        start_of_day(from, ctx.tz()),
        start_of_day(to + Duration::days(1), ctx.tz()),
    );

    let summary = Materializer::new(repository, engine.expander())
        .materialize_user_window(repository, ctx, window)
        .await?;

    println!(
        "{} Materialized {} of {} elapsed occurrences ({} already recorded) between {} and {}.",
        "✓".green(),
        summary.created.bold(),
        summary.candidates,
        summary.already_present,
        from,
        to
    );
    Ok(())
}
