//! Tolerant parsing of the scalar cells found in finance sheets.
//!
//! Nothing here fails: amounts fall back to `0.0`, currencies to PEN and
//! dates to the [`UNKNOWN_MONTH`] sentinel (or the raw text for display).
use crate::core::currency::Currency;
use chrono::NaiveDate;
use serde_json::Value;

/// Month key used for dates that match none of the known layouts.
pub const UNKNOWN_MONTH: &str = "Unknown";

/// Parses an amount cell. Numbers pass through, strings go through
/// [`parse_amount_str`], anything else counts as zero.
pub fn parse_amount(raw: &Value) -> f64 {
    match raw {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_amount_str(s),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

/// Parses a string amount written with either decimal convention.
///
/// When both `.` and `,` appear the later one is the decimal point. A lone
/// comma is decimal only if exactly two characters follow it (`12,50`),
/// otherwise it separates thousands (`1,200`). Several commas are always
/// thousands separators.
pub fn parse_amount_str(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    let normalized = match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (None, Some(comma)) if s.matches(',').count() == 1 => {
            if s[comma + 1..].chars().count() == 2 {
                s.replace(',', ".")
            } else {
                s.replace(',', "")
            }
        }
        (None, Some(_)) => s.replace(',', ""),
        _ => s.to_string(),
    };

    normalized.parse::<f64>().unwrap_or(0.0)
}

/// Resolves a currency cell; see [`Currency::parse`].
pub fn parse_currency(raw: &Value) -> Currency {
    Currency::parse(&cell_text(raw))
}

/// A date layout with fixed field widths.
struct DateLayout {
    separator: char,
    order: FieldOrder,
    year_digits: usize,
}

enum FieldOrder {
    YearMonthDay,
    DayMonthYear,
}

const DATE_LAYOUTS: [DateLayout; 5] = [
    // 2025-12-31
    DateLayout {
        separator: '-',
        order: FieldOrder::YearMonthDay,
        year_digits: 4,
    },
    // 31/12/2025
    DateLayout {
        separator: '/',
        order: FieldOrder::DayMonthYear,
        year_digits: 4,
    },
    // 31-12-2025
    DateLayout {
        separator: '-',
        order: FieldOrder::DayMonthYear,
        year_digits: 4,
    },
    // 2025/12/31
    DateLayout {
        separator: '/',
        order: FieldOrder::YearMonthDay,
        year_digits: 4,
    },
    // 31/12/25
    DateLayout {
        separator: '/',
        order: FieldOrder::DayMonthYear,
        year_digits: 2,
    },
];

impl DateLayout {
    /// Day and month must be zero padded; `15/1/2026` matches nothing.
    fn parse(&self, s: &str) -> Option<NaiveDate> {
        let parts: Vec<&str> = s.split(self.separator).collect();
        let [a, b, c] = parts.as_slice() else {
            return None;
        };
        let (year, month, day) = match self.order {
            FieldOrder::YearMonthDay => (*a, *b, *c),
            FieldOrder::DayMonthYear => (*c, *b, *a),
        };

        let year = fixed_width_number(year, self.year_digits)? as i32;
        let month = fixed_width_number(month, 2)?;
        let day = fixed_width_number(day, 2)?;

        let year = match self.year_digits {
            // Same pivot as strptime's %y
            2 if year < 69 => 2000 + year,
            2 => 1900 + year,
            _ if year == 0 => return None,
            _ => year,
        };

        NaiveDate::from_ymd_opt(year, month, day)
    }
}

fn fixed_width_number(s: &str, width: usize) -> Option<u32> {
    if s.len() != width || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Drops any time of day: everything from the first space, then from the
/// first `T`.
fn date_part(raw: &str) -> &str {
    let s = raw.trim();
    let s = s.split(' ').next().unwrap_or(s);
    s.split('T').next().unwrap_or(s)
}

/// Tries each known layout in order and returns the first that parses.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = date_part(raw);
    if s.is_empty() {
        return None;
    }
    DATE_LAYOUTS.iter().find_map(|layout| layout.parse(s))
}

/// ISO date and month key of a date cell, as returned by [`parse_iso_date`]
/// and [`parse_date_key`]. The cell is parsed once.
pub fn date_keys(raw: &str) -> (String, String) {
    match parse_date(raw) {
        Some(date) => (
            date.format("%Y-%m-%d").to_string(),
            date.format("%Y-%m").to_string(),
        ),
        None => (date_part(raw).to_string(), UNKNOWN_MONTH.to_string()),
    }
}

/// `YYYY-MM` bucket for a date cell, or [`UNKNOWN_MONTH`].
pub fn parse_date_key(raw: &str) -> String {
    date_keys(raw).1
}

/// `YYYY-MM-DD` for a date cell. Unrecognized dates come back as the raw
/// text with the time part removed, which is not necessarily a date.
pub fn parse_iso_date(raw: &str) -> String {
    date_keys(raw).0
}

/// Text content of a cell as it would be displayed. `null` is empty.
pub fn cell_text(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
