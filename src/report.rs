//! Listing formatters for the CLI.
//!
//! Pure functions: (data, OutputFormat) -> String.
//! No I/O, no side effects.

use humansize::{format_size, BINARY};
use serde::Serialize;

use crate::export::inspect;
use crate::types::{GeneratedImageRecord, OutputFormat, StylePreset};

/// Format the history list.
pub fn format_history(entries: &[GeneratedImageRecord], format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_history_human(entries),
        OutputFormat::Json => to_json(&entries),
    }
}

/// Format the style catalog.
pub fn format_styles(styles: &[StylePreset], format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_styles_human(styles),
        OutputFormat::Json => {
            let rows: Vec<StyleRow> = styles.iter().map(StyleRow::from).collect();
            to_json(&rows)
        }
    }
}

// ============================================================================
// HUMAN FORMAT
// ============================================================================

fn format_history_human(entries: &[GeneratedImageRecord]) -> String {
    if entries.is_empty() {
        return "No wallpapers generated yet.\n".to_string();
    }

    let mut out = String::new();
    out.push_str("=== Recent Wallpapers ===\n");
    for record in entries {
        let when = record
            .created_at()
            .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown time".to_string());
        let size = inspect(&record.url)
            .map(|info| format_size(info.bytes, BINARY))
            .unwrap_or_else(|| "remote".to_string());
        out.push_str(&format!("[{}] {}  ({})\n", record.id, when, size));
        out.push_str(&format!("  └─ {}\n", record.prompt));
    }
    out.push('\n');
    out.push_str(&format!("Total: {}\n", entries.len()));
    out
}

fn format_styles_human(styles: &[StylePreset]) -> String {
    let mut out = String::new();
    out.push_str("=== Styles ===\n");
    for style in styles {
        out.push_str(&format!(
            "{} {:<16} {:<14} {}\n",
            style.icon, style.id, style.name, style.prompt
        ));
    }
    out
}

// ============================================================================
// JSON FORMAT
// ============================================================================

#[derive(Serialize)]
struct StyleRow {
    id: &'static str,
    name: &'static str,
    prompt: &'static str,
    icon: &'static str,
}

impl From<&StylePreset> for StyleRow {
    fn from(style: &StylePreset) -> Self {
        StyleRow {
            id: style.id,
            name: style.name,
            prompt: style.prompt,
            icon: style.icon,
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        // Our types always serialize; fail explicitly if that ever changes
        panic!("Failed to serialize to JSON: {}", e)
    })
}

// ============================================================================
// TESTS
// ============================================================================
