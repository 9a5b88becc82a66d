use anyhow::Result;
use chronicle_core::clock::UserContext;
use chronicle_core::config::EngineConfig;
use chronicle_core::repository::Repository;
use chronicle_core::view::ViewComposer;

use crate::cli::WeekCommand;
use crate::parser::parse_optional_date;
use crate::views::table::display_week;

pub async fn show_week<R: Repository>(
    repository: &R,
    ctx: &UserContext,
    engine: &EngineConfig,
    command: WeekCommand,
) -> Result<()> {
    let anchor = parse_optional_date(command.date.as_deref(), &ctx.clock)?;
    let view = ViewComposer::new(repository, engine.expander())
        .generate_week_view(ctx, anchor)
        .await?;

    display_week(&view, ctx.tz());
    Ok(())
}
