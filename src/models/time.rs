use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeDelta, TimeZone,
    Utc,
};
use chrono_tz::Tz;

/// Longest DST gap walked over when a day bound does not exist locally.
const MAX_GAP_MINUTES: usize = 180;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"];

/// Reads an ISO-like instant as wall-clock time in `tz`.
///
/// Offset-carrying strings (`Z`, `-03:00`) are converted into `tz`; naive
/// strings are taken to already be local.
pub fn local_wall_clock(instant: &str, tz: Tz) -> Option<NaiveDateTime> {
    let instant = instant.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(instant) {
        return Some(parsed.with_timezone(&tz).naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(instant, format).ok())
}

/// Calendar date portion of an ISO string (`2026-01-05T...` -> `2026-01-05`).
pub fn date_key(instant: &str) -> &str {
    instant.split('T').next().unwrap_or(instant).trim()
}

pub fn format_hhmm(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Hour component of an `HH:MM` string, 0 if it can't be read.
pub fn hour_of(hhmm: &str) -> u32 {
    hhmm.split(':')
        .next()
        .and_then(|h| h.trim().parse().ok())
        .unwrap_or(0)
}

pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Local midnight to local 23:59:59.999 of `date` in `tz`, as UTC instants.
///
/// When midnight falls in a DST gap the day starts at the first local time
/// that exists (00:00 -> 01:00 in Santiago on the spring-forward Sunday).
pub fn local_day_bounds(date: NaiveDate, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = resolve_local(tz, date.and_hms_milli_opt(0, 0, 0, 0)?, TimeDelta::minutes(1))?;
    let end = resolve_local(tz, date.and_hms_milli_opt(23, 59, 59, 999)?, TimeDelta::minutes(-1))?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// Maps a wall-clock time to an instant, stepping by `step` out of a gap.
/// Ambiguous times take the earlier instant when walking forward, the later otherwise.
fn resolve_local(tz: Tz, at: NaiveDateTime, step: TimeDelta) -> Option<DateTime<Tz>> {
    let forward = step > TimeDelta::zero();
    let mut candidate = at;
    for _ in 0..=MAX_GAP_MINUTES {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(instant) => return Some(instant),
            LocalResult::Ambiguous(early, late) => return Some(if forward { early } else { late }),
            LocalResult::None => candidate = candidate.checked_add_signed(step)?,
        }
    }
    None
}

/// `2026-01-05T03:00:00.000Z`
pub fn to_utc_iso(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
