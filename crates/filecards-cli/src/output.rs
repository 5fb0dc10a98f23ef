//! Rendering of listings, records, and status lines.
//!
//! Listings and records go to stdout so `--format json` output can be piped;
//! warnings and errors go to stderr next to the log stream.

use serde::Serialize;
use serde_json::Value;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Error,
}

/// Print a folder listing with a heading and an item count.
pub fn print_listing<T: Serialize + Tabled>(heading: &str, rows: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{heading}");
            if rows.is_empty() {
                println!("  (empty)");
                return;
            }
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{table}");
            println!("{} item(s)", rows.len());
        }
        OutputFormat::Json => print_json(&rows),
    }
}

/// Print one record: aligned `key: value` lines, or the JSON object.
pub fn print_record<T: Serialize>(record: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(record),
        OutputFormat::Table => match serde_json::to_value(record) {
            Ok(Value::Object(fields)) => {
                for (key, value) in &fields {
                    print_kv(key, &scalar(value));
                }
            }
            Ok(other) => println!("{}", scalar(&other)),
            Err(e) => status(Tone::Error, &format!("Cannot render record: {e}")),
        },
    }
}

/// Print a success line.
pub fn print_success(msg: &str) {
    status(Tone::Success, msg);
}

/// Print a warning line.
pub fn print_warning(msg: &str) {
    status(Tone::Warning, msg);
}

/// Print an error line.
pub fn print_error(msg: &str) {
    status(Tone::Error, msg);
}

/// Print a key-value pair.
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}

fn status(tone: Tone, msg: &str) {
    match tone {
        Tone::Success => println!("✓ {msg}"),
        Tone::Warning => eprintln!("⚠ {msg}"),
        Tone::Error => eprintln!("✗ {msg}"),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => status(Tone::Error, &format!("Cannot encode JSON: {e}")),
    }
}

/// Flatten a JSON value for the key-value view. Arrays join on `, `; nested
/// objects stay as compact JSON.
fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.is_empty() => "-".to_string(),
        Value::Array(items) => items.iter().map(scalar).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}
