use chronicle_core::models::{BadgeStats, CalendarEntry, DayView, WeekView};
use chronicle_core::timezone::format_with_timezone;
use chrono_tz::Tz;
use comfy_table::{Attribute, Cell, Color, Row, Table};

/// Marker shown in front of virtual occurrences
pub const VIRTUAL_MARKER: &str = "↻";

fn time_cell(entry: &CalendarEntry, tz: &Tz) -> Cell {
    match entry.end_at() {
        Some(end_at) => Cell::new(format!(
            "{}-{}",
            format_with_timezone(entry.start_at(), tz, "%H:%M"),
            format_with_timezone(end_at, tz, "%H:%M")
        )),
        None => Cell::new("all day").fg(Color::Cyan),
    }
}

fn title_cell(entry: &CalendarEntry) -> Cell {
    if entry.is_virtual() {
        Cell::new(format!("{} {}", VIRTUAL_MARKER, entry.title()))
            .fg(Color::DarkGrey)
            .add_attribute(Attribute::Italic)
    } else {
        Cell::new(entry.title())
    }
}

fn label_cell(entry: &CalendarEntry) -> Cell {
    match entry.label_id() {
        Some(label_id) => Cell::new(&label_id.to_string()[..8]),
        None => Cell::new("None"),
    }
}

fn entry_row(day: Option<String>, entry: &CalendarEntry, tz: &Tz) -> Row {
    let mut row = Row::new();
    if let Some(day) = day {
        row.add_cell(Cell::new(day).add_attribute(Attribute::Bold));
    }
    row.add_cell(time_cell(entry, tz));
    row.add_cell(title_cell(entry));
    row.add_cell(label_cell(entry));
    row
}

pub fn display_day(view: &DayView, tz: &Tz) {
    println!("{}", view.date.format("%A, %Y-%m-%d"));

    if view.entries.is_empty() {
        println!("No events found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Time", "Title", "Label"]);
    for entry in &view.entries {
        table.add_row(entry_row(None, entry, tz));
    }

    println!("{table}");
    print_legend(&view.entries);
}

pub fn display_week(view: &WeekView, tz: &Tz) {
    let mut table = Table::new();
    table.set_header(vec!["Day", "Time", "Title", "Label"]);

    for day in &view.days {
        let heading = day.date.format("%a %Y-%m-%d").to_string();
        if day.entries.is_empty() {
            table.add_row(vec![
                Cell::new(heading).add_attribute(Attribute::Bold),
                Cell::new(""),
                Cell::new("-").fg(Color::DarkGrey),
                Cell::new(""),
            ]);
            continue;
        }
        for (index, entry) in day.entries.iter().enumerate() {
            let day_label = (index == 0).then(|| heading.clone()).unwrap_or_default();
            table.add_row(entry_row(Some(day_label), entry, tz));
        }
    }

    println!("{table}");
    print_legend(&view.entries);
}

fn print_legend(entries: &[CalendarEntry]) {
    if entries.iter().any(CalendarEntry::is_virtual) {
        println!("{} planned occurrence, not yet recorded", VIRTUAL_MARKER);
    }
}

/// Minutes as `h:mm`, keeping the sign of negative totals
pub fn format_minutes(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let minutes = minutes.abs();
    format!("{}{}:{:02}", sign, minutes / 60, minutes % 60)
}

pub fn display_stats(stats: &BadgeStats) {
    let mut table = Table::new();
    table.set_header(vec!["Period", "Minutes", "Hours"]);

    let periods = [
        ("Today", stats.today),
        ("This week", stats.this_week),
        ("Last week", stats.last_week),
        ("This month", stats.this_month),
        ("Last month", stats.last_month),
        ("All time", stats.all_time),
    ];
    for (period, minutes) in periods {
        table.add_row(vec![
            Cell::new(period),
            Cell::new(minutes),
            Cell::new(format_minutes(minutes)),
        ]);
    }

    println!("{table}");
}
