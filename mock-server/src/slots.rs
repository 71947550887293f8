//! Working-day slot generator.
//!
//! Slots run back to back from `WORK_START` for the event type's duration and
//! must end by `WORK_END`. Slots starting inside the lunch break are dropped,
//! as is anything overlapping an existing booking of any event type.

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};

pub const TIMEZONE_NAME: &str = "Asia/Kolkata";

const WORK_START: (u32, u32) = (9, 0);
const WORK_END: (u32, u32) = (17, 0);
const BREAK_START: (u32, u32) = (13, 0);
const BREAK_END: (u32, u32) = (14, 0);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: String,
    pub end: String,
}

/// Busy interval, half-open: `[start, end)`.
pub type Interval = (DateTime<FixedOffset>, DateTime<FixedOffset>);

/// Clinic offset, UTC+05:30.
pub fn clinic_tz() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap_or_else(|| Utc.fix())
}

/// Parse `YYYY-MM-DD`.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Parse an RFC 3339 timestamp, or a naive `YYYY-MM-DDTHH:MM:SS` taken as
/// clinic local time.
pub fn parse_time(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&clinic_tz()));
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").ok()?;
    clinic_tz().from_local_datetime(&naive).single()
}

pub fn overlaps(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>, busy: &[Interval]) -> bool {
    busy.iter().any(|(b_start, b_end)| start < *b_end && end > *b_start)
}

pub fn generate(date: NaiveDate, duration_minutes: u32, busy: &[Interval]) -> Vec<Slot> {
    let tz = clinic_tz();
    let at = |(h, m): (u32, u32)| NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();
    let (Some(mut current), Some(end_of_day)) = (
        tz.from_local_datetime(&date.and_time(at(WORK_START))).single(),
        tz.from_local_datetime(&date.and_time(at(WORK_END))).single(),
    ) else {
        return Vec::new();
    };
    if duration_minutes == 0 {
        return Vec::new();
    }
    let step = Duration::minutes(i64::from(duration_minutes));
    let lunch = at(BREAK_START)..at(BREAK_END);

    let mut slots = Vec::new();
    while current + step <= end_of_day {
        let slot_end = current + step;
        if !lunch.contains(&current.time()) && !overlaps(current, slot_end, busy) {
            slots.push(Slot {
                start: current.to_rfc3339(),
                end: slot_end.to_rfc3339(),
            });
        }
        current = slot_end;
    }
    slots
}
