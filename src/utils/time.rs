//! Timestamp parsing, hour bucketing and time-window selection.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyzerError;

/// Naive date-time layouts accepted after RFC 3339, read as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an audit trail timestamp into UTC.
///
/// Accepts RFC 3339 (including the `Z` suffix and explicit offsets),
/// minute-precision ISO 8601 with an offset or `Z`, naive ISO 8601
/// date-times and bare dates. Naive values are read as UTC; a bare date
/// means midnight.
pub fn parse_timestamp(ts: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Ok(dt.with_timezone(&Utc));
    }

    let with_offset = match ts.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => ts.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_str(&with_offset, "%Y-%m-%dT%H:%M%:z") {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(ts, fmt).ok())
    {
        return Ok(naive.and_utc());
    }

    NaiveDate::parse_from_str(ts, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .with_context(|| format!("Failed to parse timestamp: {}", ts))
}

/// Hour bucket key for volume histograms, e.g. `2025-10-07 13:00`.
pub fn hour_bucket(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:00").to_string()
}

/// Format a timestamp for display
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Calculate duration between two timestamps in human-readable format
pub fn duration_human(start: &DateTime<Utc>, end: &DateTime<Utc>) -> String {
    let duration = end.signed_duration_since(*start);
    let seconds = duration.num_seconds();

    if seconds < 60 {
        format!("{} seconds", seconds)
    } else if seconds < 3600 {
        format!("{} minutes", seconds / 60)
    } else if seconds < 86400 {
        format!("{:.1} hours", seconds as f64 / 3600.0)
    } else {
        format!("{:.1} days", seconds as f64 / 86400.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowUnit {
    Hours,
    Days,
}

/// A look-back window such as `24h` or `7d`.
///
/// Entries at or after `now - window` are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub amount: u32,
    pub unit: WindowUnit,
}

impl TimeWindow {
    pub fn duration(&self) -> Duration {
        let amount = i64::from(self.amount);
        match self.unit {
            WindowUnit::Hours => Duration::hours(amount),
            WindowUnit::Days => Duration::days(amount),
        }
    }

    /// Oldest timestamp still inside the window, measured back from `now`.
    pub fn cutoff_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.duration())
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl FromStr for TimeWindow {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || AnalyzerError::InvalidTimeWindow(s.to_string());

        let (digits, unit) = if let Some(digits) = s.strip_suffix('h') {
            (digits, WindowUnit::Hours)
        } else if let Some(digits) = s.strip_suffix('d') {
            (digits, WindowUnit::Days)
        } else {
            return Err(invalid());
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let amount = digits.parse::<u32>().map_err(|_| invalid())?;

        Ok(Self { amount, unit })
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.unit {
            WindowUnit::Hours => 'h',
            WindowUnit::Days => 'd',
        };
        write!(f, "{}{}", self.amount, suffix)
    }
}
