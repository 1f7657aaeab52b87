//! Rendering of place records as an aligned text table or JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::model::PlaceRecord;

/// Which temperature scale(s) the table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempDisplay {
    Fahrenheit,
    Celsius,
    #[default]
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Table,
    #[default]
    Json,
}

/// Extra rule width on top of the place and temperature columns.
const RULE_PADDING: usize = 25;

const PLACE_HEADER: &str = "PLACE";
const TEMP_HEADER: &str = "TEMP";

pub fn render(records: &[PlaceRecord], output: OutputMode, display: TempDisplay) -> Result<String> {
    match output {
        OutputMode::Table => Ok(to_table(records, display)),
        OutputMode::Json => to_json(records),
    }
}

pub fn to_json(records: &[PlaceRecord]) -> Result<String> {
    serde_json::to_string(records).context("Failed to serialize place records to JSON")
}

/// Render records as a table:
///
/// ```text
/// PLACE     | TEMP            | CONDITION
/// ==============================================
/// Tokyo     | 10.0 C / 50.0 F | clear
/// Atlantis <location not found>
/// ```
pub fn to_table(records: &[PlaceRecord], display: TempDisplay) -> String {
    // first pass: column contents and widths
    let temps: Vec<Option<String>> =
        records.iter().map(|r| r.temp_f().map(|f| format_temp(f, display))).collect();

    let place_width = records.iter().map(|r| width(r.name())).max().unwrap_or(0);
    let temp_width = temps.iter().flatten().map(|t| width(t)).max().unwrap_or(0);
    // columns never get narrower than their header; the rule tracks the data only
    let place_col = place_width.max(width(PLACE_HEADER));
    let temp_col = temp_width.max(width(TEMP_HEADER));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} | {} | CONDITION",
        pad(PLACE_HEADER, place_col),
        pad(TEMP_HEADER, temp_col),
    );
    out.push_str(&"=".repeat(place_width + temp_width + RULE_PADDING));
    out.push('\n');

    for (record, temp) in records.iter().zip(&temps) {
        match (record.error(), temp) {
            (Some(error), _) => {
                let _ = writeln!(out, "{} {}", record.name(), error);
            }
            (None, Some(temp)) => {
                let _ = writeln!(
                    out,
                    "{} | {} | {}",
                    pad(record.name(), place_col),
                    pad(temp, temp_col),
                    record.condition().unwrap_or_default(),
                );
            }
            // unreachable by construction of PlaceRecord
            (None, None) => {
                let _ = writeln!(out, "{}", record.name());
            }
        }
    }

    out
}

pub fn fahrenheit_to_celsius(temp_f: f64) -> f64 {
    round1((temp_f - 32.0) * 5.0 / 9.0)
}

pub fn celsius_to_fahrenheit(temp_c: f64) -> f64 {
    round1(temp_c * 9.0 / 5.0 + 32.0)
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn format_temp(temp_f: f64, display: TempDisplay) -> String {
    let c = number(fahrenheit_to_celsius(temp_f));
    let f = number(temp_f);
    match display {
        TempDisplay::Celsius => format!("{c} C"),
        TempDisplay::Fahrenheit => format!("{f} F"),
        TempDisplay::Both => format!("{c} C / {f} F"),
    }
}

/// Shortest decimal form, but always with a fractional part (`59.0`, not `59`).
fn number(value: f64) -> String {
    let s = value.to_string();
    if value.is_finite() && !s.contains(['.', 'e', 'E']) { format!("{s}.0") } else { s }
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, to: usize) -> String {
    format!("{s}{}", " ".repeat(to.saturating_sub(width(s))))
}
