use chrono::Weekday;
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use crate::parser::parse_weekday;

/// A personal calendar with recurring events and label time tracking
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the events of one day
    Day(DayCommand),
    /// Show the Monday-start week containing a day
    Week(WeekCommand),
    /// Show time statistics for a set of labels
    Stats(StatsCommand),
    /// Persist elapsed recurring-event occurrences in a date range
    Materialize(MaterializeCommand),
    /// Add a recurring event
    Recur(RecurCommand),
    /// Show or set your timezone
    Zone(ZoneCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct DayCommand {
    /// The day to show (YYYY-MM-DD or e.g. "tomorrow"); defaults to today
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct WeekCommand {
    /// Any day of the week to show; defaults to today
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct StatsCommand {
    /// Label IDs combined into one badge
    #[arg(short, long = "label", num_args = 1.., required = true)]
    pub labels: Vec<Uuid>,
}

#[derive(Parser, Debug, Clone)]
pub struct MaterializeCommand {
    /// First day of the range
    #[arg(long)]
    pub from: String,
    /// Last day of the range (inclusive)
    #[arg(long)]
    pub to: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Every {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Parser, Debug, Clone)]
pub struct RecurCommand {
    /// Title of the recurring event
    pub title: String,
    /// How often the event repeats
    #[arg(long, value_enum)]
    pub every: Every,
    /// Repeat every N units
    #[arg(long, default_value_t = 1)]
    pub interval: u16,
    /// Weekdays for weekly events, or the weekday for monthly events with --nth
    #[arg(long, value_delimiter = ',', value_parser = parse_weekday)]
    pub on: Vec<Weekday>,
    /// Day of month for monthly events (negative counts from the end)
    #[arg(long, allow_hyphen_values = true, conflicts_with = "nth")]
    pub day: Option<i8>,
    /// Ordinal weekday for monthly events, e.g. -1 with --on fri for the last Friday
    #[arg(long, allow_hyphen_values = true, requires = "on")]
    pub nth: Option<i8>,
    /// Local start time (e.g. "09:00", "6:30 pm"); omit for all-day events
    #[arg(long)]
    pub at: Option<String>,
    /// Duration in minutes
    #[arg(long)]
    pub duration: Option<i64>,
    /// First day the event occurs; defaults to today
    #[arg(long)]
    pub from: Option<String>,
    /// Last day the event may occur (inclusive)
    #[arg(long)]
    pub until: Option<String>,
    /// Label the event's time is tracked under
    #[arg(long)]
    pub label: Option<Uuid>,
    /// Authoring timezone (IANA format); defaults to your timezone
    #[arg(long)]
    pub timezone: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ZoneCommand {
    /// New timezone (IANA format, e.g. "Europe/Berlin")
    pub timezone: Option<String>,
}
