//! Cell coercion helpers.
//!
//! Every helper is total: a cell that cannot be coerced maps to `None` (or
//! an empty list) so that the row is kept with the field marked missing.

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

lazy_static! {
    static ref LEADING_YEAR: Regex = Regex::new(r"^(-?\d{4})(?:$|[-/T ])").unwrap();
    static ref QUOTED_ITEM: Regex =
        Regex::new(r#"'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)""#).unwrap();
}

/// Written-out date layouts, tried after the leading-year fast path.
const DATE_FORMATS: &[&str] = &["%B %d, %Y", "%B %d %Y", "%d %B %Y", "%m/%d/%Y", "%m-%d-%Y"];

fn parse_written_date(cell: &str) -> Option<NaiveDate> {
    // Month and year only ("April 1998") goes first: "%B %d %Y" would
    // otherwise read it as the 19th of April, year 98.
    NaiveDate::parse_from_str(&format!("1 {}", cell), "%d %B %Y")
        .ok()
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(cell, format).ok())
        })
        .filter(|date| (1000..=9999).contains(&date.year()))
}

fn is_null_token(cell: &str) -> bool {
    matches!(
        cell.to_ascii_lowercase().as_str(),
        "" | "nan" | "null" | "none" | "na" | "n/a" | "nat"
    )
}

/// Extracts the release year from a bare year, an ISO or written-out date,
/// or a timestamp.
pub fn parse_year(cell: &str) -> Option<i32> {
    let cell = cell.trim();
    if is_null_token(cell) {
        return None;
    }
    if let Some(caps) = LEADING_YEAR.captures(cell) {
        return caps[1].parse().ok();
    }
    if let Some(date) = parse_written_date(cell) {
        return Some(date.year());
    }
    // Numeric exports sometimes write years as floats ("1995.0").
    let value: f64 = cell.parse().ok()?;
    if value.is_finite() && value.fract() == 0.0 && (1000.0..=9999.0).contains(&value) {
        return Some(value as i32);
    }
    None
}

/// Parses a rating, rejecting values outside the 0–10 scale.
pub fn parse_score(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if is_null_token(cell) {
        return None;
    }
    let value: f64 = cell.parse().ok()?;
    if value.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&value) {
        Some(value)
    } else {
        None
    }
}

/// Parses a non-negative count written either as an integer or as a float
/// with no fractional part.
pub fn parse_count(cell: &str) -> Option<u64> {
    let cell = cell.trim();
    if is_null_token(cell) {
        return None;
    }
    if let Ok(value) = cell.parse::<u64>() {
        return Some(value);
    }
    let value: f64 = cell.parse().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        Some(value as u64)
    } else {
        None
    }
}

pub fn parse_text(cell: &str) -> Option<String> {
    let cell = cell.trim();
    if is_null_token(cell) {
        None
    } else {
        Some(cell.to_string())
    }
}

fn unescape(item: &str) -> String {
    let mut out = String::with_capacity(item.len());
    let mut chars = item.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn push_unique(labels: &mut Vec<String>, label: String) {
    let label = label.trim().to_string();
    if !label.is_empty() && !labels.iter().any(|l| l.eq_ignore_ascii_case(&label)) {
        labels.push(label);
    }
}

/// Parses a multi-valued label cell.
///
/// Accepts list literals (`['Action', "Slice of Life"]`) and plain
/// separated values (`Action, Comedy` or `Action|Comedy`). Duplicates,
/// compared ignoring case, are dropped keeping the first occurrence.
pub fn parse_label_list(cell: &str) -> Vec<String> {
    let cell = cell.trim();
    let mut labels = Vec::new();
    if is_null_token(cell) {
        return labels;
    }

    if let Some(inner) = cell.strip_prefix('[') {
        let Some(inner) = inner.strip_suffix(']') else {
            return labels;
        };
        for caps in QUOTED_ITEM.captures_iter(inner) {
            let raw = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            push_unique(&mut labels, unescape(raw));
        }
        return labels;
    }

    let separator = if cell.contains('|') { '|' } else { ',' };
    for part in cell.split(separator) {
        push_unique(&mut labels, part.to_string());
    }
    labels
}
