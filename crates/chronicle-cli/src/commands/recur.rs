use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};
use chronicle_core::clock::UserContext;
use chronicle_core::models::{NewRecurringEvent, RecurrenceRule};
use chronicle_core::repository::SqliteRepository;
use chronicle_core::timezone::parse_timezone;
use owo_colors::OwoColorize;

use crate::cli::{Every, RecurCommand};
use crate::parser::{parse_date, parse_optional_date, parse_time};

/// Build the recurrence rule described by the command's flags
pub fn build_rule(command: &RecurCommand, valid_from: NaiveDate) -> Result<RecurrenceRule> {
    let interval = command.interval;
    let rule = match command.every {
        Every::Daily => RecurrenceRule::Daily { interval },
        Every::Weekly => RecurrenceRule::Weekly {
            interval,
            days: command.on.clone(),
        },
        Every::Monthly => match command.nth {
            Some(ordinal) => {
                let [weekday] = command.on.as_slice() else {
                    return Err(anyhow!("--nth needs exactly one weekday in --on"));
                };
                RecurrenceRule::MonthlyOnWeekday {
                    interval,
                    ordinal,
                    weekday: *weekday,
                }
            }
            None => RecurrenceRule::MonthlyOnDay {
                interval,
                day: command.day.unwrap_or(valid_from.day() as i8),
            },
        },
        Every::Yearly => RecurrenceRule::Yearly { interval },
    };
    Ok(rule)
}

pub async fn add_recurring_event(
    repository: &SqliteRepository,
    ctx: &UserContext,
    command: RecurCommand,
) -> Result<()> {
    let valid_from = parse_optional_date(command.from.as_deref(), &ctx.clock)?;
    let valid_to = command
        .until
        .as_deref()
        .map(|until| parse_date(until, &ctx.clock))
        .transpose()?;
    let start_time = command.at.as_deref().map(parse_time).transpose()?;
    let timezone = match command.timezone.as_deref() {
        Some(timezone) => parse_timezone(timezone)?,
        None => *ctx.tz(),
    };
    let rule = build_rule(&command, valid_from)?;

    let event = repository
        .add_recurring_event(NewRecurringEvent {
            owner_id: ctx.user_id,
            label_id: command.label,
            title: command.title,
            rule,
            start_time,
            duration_minutes: command.duration,
            valid_from,
            valid_to,
            timezone,
        })
        .await?;

    println!(
        "{} Recurring event '{}' added with ID: {}",
        "✓".green(),
        event.title.bold(),
        event.id.to_string().yellow()
    );
    Ok(())
}
