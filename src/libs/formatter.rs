//! Display formatting for console tables and exports.
//!
//! Amounts are whole yen. Timestamps are shown in the system time zone, never
//! in the viewer's local zone, so every operator sees the same wall clock.
//!
//! ```rust
//! use castline::libs::formatter::{format_minutes, format_yen};
//!
//! assert_eq!(format_yen(1234567), "¥1,234,567");
//! assert_eq!(format_minutes(90), "01:30");
//! ```

use chrono::{DateTime, FixedOffset, Utc};

/// `¥12,345`; negative amounts keep their sign in front of the symbol.
pub fn format_yen(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-¥{}", grouped)
    } else {
        format!("¥{}", grouped)
    }
}

/// Absent amounts print as `-` so "not applicable" is not read as zero.
pub fn format_optional_yen(amount: Option<i64>) -> String {
    amount.map(format_yen).unwrap_or_else(|| "-".to_string())
}

/// Minutes as `HH:MM`; negative values clamp to `00:00`.
pub fn format_minutes(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

pub fn format_local_datetime(instant: &DateTime<Utc>, tz: &FixedOffset) -> String {
    instant.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_local_time(instant: &DateTime<Utc>, tz: &FixedOffset) -> String {
    instant.with_timezone(tz).format("%H:%M").to_string()
}

pub fn format_optional_local_time(instant: Option<&DateTime<Utc>>, tz: &FixedOffset) -> String {
    instant.map(|i| format_local_time(i, tz)).unwrap_or_else(|| "-".to_string())
}

pub fn format_flag(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
