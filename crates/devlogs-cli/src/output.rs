//! Output formatting helpers for the CLI.

use chrono::{DateTime, TimeZone, Utc};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use devlogs_core::Entry;

const TABLE_SUMMARY_MAX: usize = 60;

/// Convert a nanosecond timestamp for display.
pub fn timestamp(ns: u64) -> DateTime<Utc> {
    Utc.timestamp_nanos(i64::try_from(ns).unwrap_or(i64::MAX))
}

fn format_timestamp(ns: u64) -> String {
    timestamp(ns).format("%Y-%m-%d %H:%M").to_string()
}

/// First line of the body, shortened for a table cell.
pub fn entry_summary(entry: &Entry) -> String {
    let first_line = entry.body().lines().next().unwrap_or("");
    if first_line.chars().count() <= TABLE_SUMMARY_MAX {
        return first_line.to_string();
    }
    let cut: String = first_line.chars().take(TABLE_SUMMARY_MAX - 1).collect();
    format!("{}…", cut)
}

/// Convert an entry to JSON for output.
pub fn entry_json(entry: &Entry) -> serde_json::Value {
    serde_json::json!({
        "position": entry.position(),
        "title": entry.title(),
        "body": entry.body(),
        "created_at": timestamp(entry.created_at()).to_rfc3339(),
        "updated_at": timestamp(entry.updated_at()).to_rfc3339(),
    })
}

/// Convert multiple entries to a JSON array for output.
pub fn entries_json(entries: &[Entry]) -> serde_json::Value {
    serde_json::Value::Array(entries.iter().map(entry_json).collect())
}

/// Render the entry list as a table.
pub fn entries_table(entries: &[Entry]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Title", "Updated", "Summary"]);

    for (index, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            index.to_string(),
            entry.title().to_string(),
            format_timestamp(entry.updated_at()),
            entry_summary(entry),
        ]);
    }
    table.to_string()
}

/// Print a single entry in human-readable format.
pub fn print_entry(index: usize, entry: &Entry, quiet: bool) {
    if !quiet {
        println!("#{} {}", index, entry.title());
        println!("Created: {}", format_timestamp(entry.created_at()));
        if entry.updated_at() != entry.created_at() {
            println!("Updated: {}", format_timestamp(entry.updated_at()));
        }
        println!();
    }
    println!("{}", entry.body());
}
