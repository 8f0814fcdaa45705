//! # Rendering
//!
//! Turns `CmdResult` pieces into terminal output. Layout math (widths,
//! truncation, padding) is Unicode-aware; colours come from `colored`, which
//! turns itself off when stdout is not a terminal.

use super::styles::{category_badge, colored_category, status_label, status_marker};
use chrono::{DateTime, Utc};
use colored::Colorize;
use daybook::api::{CmdMessage, MessageLevel};
use daybook::commands::status::StorageStatus;
use daybook::config::DaybookConfig;
use daybook::model::Record;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 16;
const ID_WIDTH: usize = 14;
const DATE_WIDTH: usize = 11;
const CATEGORY_WIDTH: usize = 10;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

/// One line per record: id, date, status marker, title, category, age.
pub fn render_record_list(records: &[Record], now: DateTime<Utc>) -> String {
    if records.is_empty() {
        return "No records found. Add one with `daybook add <title>`.\n".to_string();
    }

    let mut out = String::new();
    for record in records {
        let id = format!("{:<width$}", record.id, width = ID_WIDTH);
        let date = format!("{:<width$}", record.date.format("%Y-%m-%d"), width = DATE_WIDTH);
        let category_text = format!("{:<width$}", record.category.as_str(), width = CATEGORY_WIDTH);
        let time_ago = format_time_ago(record.created_at, now);

        // id + date + "● " + category + time
        let fixed = ID_WIDTH + DATE_WIDTH + 2 + 1 + CATEGORY_WIDTH + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let title = truncate_to_width(&record.title, available);
        let padding = available.saturating_sub(title.width());

        out.push_str(&format!(
            "{}{}{} {}{} {}{}\n",
            id.dimmed(),
            date,
            status_marker(record.status),
            title,
            " ".repeat(padding),
            colored_category(record.category, &category_text),
            time_ago.dimmed()
        ));
    }
    out
}

pub fn render_full_records(records: &[Record]) -> String {
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            out.push_str("\n================================\n\n");
        }
        out.push_str(&format!("{}\n", record.title.bold()));
        out.push_str(&format!(
            "📅 {}  {}  {}\n",
            record.date.format("%B %-d, %Y"),
            category_badge(record.category),
            status_label(record.status)
        ));
        out.push_str("--------------------------------\n");
        if !record.description.is_empty() {
            out.push_str(&record.description);
            out.push('\n');
        }
        let mut footer = format!(
            "id {} · created {}",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M")
        );
        if let Some(updated) = record.updated_at {
            footer.push_str(&format!(" · updated {}", updated.format("%Y-%m-%d %H:%M")));
        }
        out.push_str(&format!("{}\n", footer.dimmed()));
    }
    out
}

fn active(flag: bool) -> String {
    if flag {
        "✅ Active".to_string()
    } else {
        "❌ Disabled".to_string()
    }
}

pub fn render_status(status: &StorageStatus, now: DateTime<Utc>) -> String {
    let last_backup = match status.last_backup {
        Some(at) => format_time_ago(at, now).trim().to_string(),
        None => "never".to_string(),
    };
    let folder = match &status.folder {
        Some(folder) => format!("{} ({})", folder.name, folder.path.display()),
        None => "Downloads folder".to_string(),
    };
    let user = status
        .user_email
        .clone()
        .unwrap_or_else(|| "not signed in".to_string());

    let rows = [
        ("Mode", status.mode.label().to_string()),
        ("Records", status.record_count.to_string()),
        ("Size", format!("{:.2} KB", status.size_kb())),
        ("Local storage", active(status.local_active())),
        ("Disk", active(status.disk_active())),
        (
            "Auto backup",
            format!(
                "{} ({})",
                if status.auto_backup { "on" } else { "off" },
                status.cadence
            ),
        ),
        ("Last backup", last_backup),
        ("Folder", folder),
        ("Cloud", user),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        out.push_str(&format!("{}{}\n", format!("{:<14}", format!("{}:", label)).bold(), value));
    }
    out
}

pub fn render_status_line(status: &StorageStatus) -> String {
    format!("💾 {}", status.summary_line())
}

pub fn render_config(config: &DaybookConfig) -> String {
    config
        .list_all()
        .into_iter()
        .map(|(key, value)| format!("{} = {}\n", key, value))
        .collect()
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
