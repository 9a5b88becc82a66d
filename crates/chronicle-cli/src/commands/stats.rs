use anyhow::Result;
use chronicle_core::clock::UserContext;
use chronicle_core::models::Badge;
use chronicle_core::repository::Repository;
use chronicle_core::stats::StatsAggregator;
use uuid::Uuid;

use crate::cli::StatsCommand;
use crate::views::table::display_stats;

pub async fn show_stats<R: Repository>(
    repository: &R,
    ctx: &UserContext,
    command: StatsCommand,
) -> Result<()> {
    let badge = Badge {
        id: Uuid::now_v7(),
        owner_id: ctx.user_id,
        name: "Selected labels".to_string(),
        label_ids: command.labels.into_iter().collect(),
    };

    let stats = StatsAggregator::new(repository)
        .compute_stats_for_badge(&badge, ctx)
        .await?;

    display_stats(&stats);
    Ok(())
}
