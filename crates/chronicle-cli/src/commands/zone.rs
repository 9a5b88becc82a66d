use anyhow::Result;
use chronicle_core::clock::UserContext;
use chronicle_core::repository::SqliteRepository;
use chronicle_core::timezone::parse_timezone;
use owo_colors::OwoColorize;

use crate::cli::ZoneCommand;

pub async fn zone_command(
    repository: &SqliteRepository,
    ctx: &UserContext,
    command: ZoneCommand,
) -> Result<()> {
    match command.timezone {
        Some(timezone) => {
            let tz = parse_timezone(&timezone)?;
            repository.upsert_user(ctx.user_id, tz).await?;
            println!("{} Timezone set to {}.", "✓".green(), tz.name().bold());
        }
        None => println!("{}", ctx.tz().name()),
    }
    Ok(())
}
