//! Day and month boundaries in the system time zone.
//!
//! The whole system agrees on a single fixed UTC offset (see
//! [`ScheduleConfig`](crate::libs::config::ScheduleConfig)). Every function
//! here is pure: "now" is always an argument, never read from the clock.
//!
//! Windows are closed intervals: `end` is the last representable millisecond
//! of the day or month, so `[start, end]` containment matches how the
//! aggregators count reservations.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use serde::Serialize;

/// A closed `[start, end]` interval of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        is_within(instant, self.start, self.end)
    }
}

/// Midnight of `date` in the system time zone, as UTC.
fn local_midnight(date: NaiveDate, tz: &FixedOffset) -> DateTime<Utc> {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    // A fixed offset has no gaps, so the mapping is always single.
    tz.from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// Start of the local day containing `now`.
pub fn start_of_day(now: DateTime<Utc>, tz: &FixedOffset) -> DateTime<Utc> {
    local_midnight(now.with_timezone(tz).date_naive(), tz)
}

/// Last millisecond of the local day containing `now`.
pub fn end_of_day(now: DateTime<Utc>, tz: &FixedOffset) -> DateTime<Utc> {
    start_of_day(now, tz) + Duration::days(1) - Duration::milliseconds(1)
}

/// Start of the local month containing `now`.
pub fn start_of_month(now: DateTime<Utc>, tz: &FixedOffset) -> DateTime<Utc> {
    let local = now.with_timezone(tz).date_naive();
    let first = local.with_day(1).unwrap_or(local);
    local_midnight(first, tz)
}

/// Last millisecond of the local month containing `now`.
pub fn end_of_month(now: DateTime<Utc>, tz: &FixedOffset) -> DateTime<Utc> {
    let local = now.with_timezone(tz).date_naive();
    let (year, month) = if local.month() == 12 {
        (local.year() + 1, 1)
    } else {
        (local.year(), local.month() + 1)
    };
    let next_first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(local);
    local_midnight(next_first, tz) - Duration::milliseconds(1)
}

pub fn day_window(now: DateTime<Utc>, tz: &FixedOffset) -> TimeWindow {
    TimeWindow::new(start_of_day(now, tz), end_of_day(now, tz))
}

pub fn month_window(now: DateTime<Utc>, tz: &FixedOffset) -> TimeWindow {
    TimeWindow::new(start_of_month(now, tz), end_of_month(now, tz))
}

/// Closed-interval containment: `start <= instant <= end`.
pub fn is_within(instant: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    start <= instant && instant <= end
}

/// Half-open overlap of `[a_start, a_end)` and `[b_start, b_end)`.
///
/// Intervals that only touch at a boundary do not overlap. This is the same
/// predicate the store's shift and reservation triggers apply.
pub fn overlaps(a_start: DateTime<Utc>, a_end: DateTime<Utc>, b_start: DateTime<Utc>, b_end: DateTime<Utc>) -> bool {
    a_start < b_end && b_start < a_end
}

/// Shifts `instant` by whole minutes, saturating at the ends of the
/// representable range instead of panicking.
pub fn add_minutes(instant: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    Duration::try_minutes(minutes)
        .and_then(|delta| instant.checked_add_signed(delta))
        .unwrap_or(if minutes < 0 { DateTime::<Utc>::MIN_UTC } else { DateTime::<Utc>::MAX_UTC })
}

/// Builds the fixed offset for a configured number of minutes east of UTC.
///
/// Offsets outside ±24h fall back to UTC.
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}
