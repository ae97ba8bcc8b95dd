//! Feed rendering: tables for people, JSON for scripts.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use prettytable::{format, Cell, Row, Table};

use crate::display::ColourManager;
use crate::notifications::{relative_age, FeedSummary, NotificationRecord};

const TABLE_HEADERS: [&str; 7] = ["", "ID", "TYPE", "PRIORITY", "CATEGORY", "TITLE", "AGE"];

/// Compact table with a two-space indent
pub fn format_compact_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);

    let header_cells: Vec<Cell> = headers.iter()
        .map(|header| Cell::new(header))
        .collect();
    table.add_row(Row::new(header_cells));

    for row in rows {
        let data_cells: Vec<Cell> = row.iter()
            .map(|cell| Cell::new(cell))
            .collect();
        table.add_row(Row::new(data_cells));
    }

    let table_output = table.to_string();
    let mut result = String::new();
    for line in table_output.lines() {
        result.push_str("  ");
        result.push_str(line);
        result.push('\n');
    }

    result
}

/// One table row per record, newest first as given
pub fn format_feed_table(records: &[&NotificationRecord], colours: &ColourManager, now: DateTime<Utc>) -> String {
    if records.is_empty() {
        return "  No notifications\n".to_string();
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            vec![
                colours.unread_marker(record.read).to_string(),
                record.id.sequence().to_string(),
                colours.kind(record.kind).to_string(),
                colours.priority(record.priority).to_string(),
                record.category.to_string(),
                record.title.clone(),
                relative_age(record.timestamp, now),
            ]
        })
        .collect();

    format_compact_table(&TABLE_HEADERS, &rows)
}

/// "5 notifications, 2 unread, 1 high priority"
pub fn format_summary(summary: &FeedSummary, colours: &ColourManager) -> String {
    let noun = if summary.total == 1 { "notification" } else { "notifications" };
    format!(
        "{} {}, {} unread, {} high priority",
        colours.highlight(&summary.total.to_string()),
        noun,
        summary.unread,
        summary.high_priority
    )
}

/// Pretty-printed JSON array of records
pub fn format_feed_json(records: &[&NotificationRecord]) -> Result<String> {
    serde_json::to_string_pretty(records)
        .context("Failed to serialize notifications to JSON")
}

/// Single line announcing a record as it arrives in a watched feed
pub fn format_arrival(record: &NotificationRecord, colours: &ColourManager) -> String {
    let local: DateTime<Local> = record.timestamp.with_timezone(&Local);
    format!(
        "[{}] {} {} ({}, {}): {}",
        local.format("%H:%M:%S"),
        colours.kind(record.kind),
        record.title,
        record.category,
        colours.priority(record.priority),
        record.message
    )
}
