use anyhow::Result;
use chronicle_core::clock::UserContext;
use chronicle_core::config::EngineConfig;
use chronicle_core::repository::Repository;
use chronicle_core::view::ViewComposer;

use crate::cli::DayCommand;
use crate::parser::parse_optional_date;
use crate::views::table::display_day;

pub async fn show_day<R: Repository>(
    repository: &R,
    ctx: &UserContext,
    engine: &EngineConfig,
    command: DayCommand,
) -> Result<()> {
    let date = parse_optional_date(command.date.as_deref(), &ctx.clock)?;
    let view = ViewComposer::new(repository, engine.expander())
        .generate_day_view(ctx, date)
        .await?;

    display_day(&view, ctx.tz());
    Ok(())
}
