use chrono::NaiveDate;
use thiserror::Error;

use crate::schema::DateFormat;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Unrecognised date: {0}")]
    Unrecognised(String),

    #[error("Ambiguous two-digit year: {0}")]
    TwoDigitYear(String),
}

const MONTH_ABBREVIATIONS: &[(&str, u32)] = &[
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// Parse a raw date string under the schema's declared format family.
/// Two-digit years are rejected rather than assigned a century.
pub fn resolve(raw: &str, format: DateFormat) -> Result<NaiveDate, DateError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DateError::Unrecognised(raw.to_string()));
    }
    match format {
        DateFormat::DayMonthYear => resolve_numeric(raw),
        DateFormat::DayMonthAbbrYear => resolve_month_name(raw),
    }
}

fn resolve_numeric(raw: &str) -> Result<NaiveDate, DateError> {
    let parts: Vec<&str> = raw.split(['/', '-']).collect();
    if parts.len() != 3 || !parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())) {
        return Err(DateError::Unrecognised(raw.to_string()));
    }
    // Year position tells the component order apart: 31/12/2024 vs 2024-12-31.
    let (y, m, d) = if parts[2].len() == 4 {
        (parts[2], parts[1], parts[0])
    } else if parts[0].len() == 4 {
        (parts[0], parts[1], parts[2])
    } else {
        return Err(DateError::TwoDigitYear(raw.to_string()));
    };
    build_date(raw, y, m, d)
}

fn resolve_month_name(raw: &str) -> Result<NaiveDate, DateError> {
    let parts: Vec<&str> = raw.split(['-', ' ']).filter(|p| !p.is_empty()).collect();
    if parts.len() != 3 {
        return Err(DateError::Unrecognised(raw.to_string()));
    }
    let (d, month_name, y) = (parts[0], parts[1], parts[2]);
    if !d.chars().all(|c| c.is_ascii_digit()) || !y.chars().all(|c| c.is_ascii_digit()) {
        return Err(DateError::Unrecognised(raw.to_string()));
    }
    if y.len() != 4 {
        return Err(DateError::TwoDigitYear(raw.to_string()));
    }
    if !month_name.chars().all(|c| c.is_ascii_alphabetic()) || month_name.len() < 3 {
        return Err(DateError::Unrecognised(raw.to_string()));
    }
    let abbr = month_name[..3].to_ascii_lowercase();
    let month = MONTH_ABBREVIATIONS
        .iter()
        .find(|(name, _)| *name == abbr)
        .map(|&(_, n)| n)
        .ok_or_else(|| DateError::Unrecognised(raw.to_string()))?;
    let day: u32 = d
        .parse()
        .map_err(|_| DateError::Unrecognised(raw.to_string()))?;
    let year: i32 = y
        .parse()
        .map_err(|_| DateError::Unrecognised(raw.to_string()))?;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateError::Unrecognised(raw.to_string()))
}

fn build_date(raw: &str, y: &str, m: &str, d: &str) -> Result<NaiveDate, DateError> {
    let year: i32 = y
        .parse()
        .map_err(|_| DateError::Unrecognised(raw.to_string()))?;
    let month: u32 = m
        .parse()
        .map_err(|_| DateError::Unrecognised(raw.to_string()))?;
    let day: u32 = d
        .parse()
        .map_err(|_| DateError::Unrecognised(raw.to_string()))?;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateError::Unrecognised(raw.to_string()))
}
