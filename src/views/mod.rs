//! Pure bucketing of the cached appointment list for the calendar grids.
//!
//! Nothing here checks for overlaps; two appointments in the same bucket are
//! simply listed one after the other.

pub mod day;
pub mod list;
pub mod month;
pub mod week;

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};

use crate::models::appointment::Appointment;

/// Sorts by `HH:MM` start time. Fixed width, so string order is chronological.
pub fn sort_by_start(bucket: &mut [&Appointment]) {
    bucket.sort_by(|a, b| a.start_time.cmp(&b.start_time));
}

/// Month-view buckets: `YYYY-MM-DD` to that day's appointments.
pub fn group_by_date(appointments: &[Appointment]) -> HashMap<String, Vec<&Appointment>> {
    let mut map: HashMap<String, Vec<&Appointment>> = HashMap::new();
    for appt in appointments {
        map.entry(appt.date.clone()).or_default().push(appt);
    }
    for bucket in map.values_mut() {
        sort_by_start(bucket);
    }
    map
}

/// `2026-01-05` + 9 -> `2026-01-05-9`
pub fn slot_key(date: &str, hour: u32) -> String {
    format!("{}-{}", date, hour)
}

/// Week/day-view buckets keyed by [`slot_key`].
pub fn group_by_date_hour<'a, I>(appointments: I) -> HashMap<String, Vec<&'a Appointment>>
where
    I: IntoIterator<Item = &'a Appointment>,
{
    let mut map: HashMap<String, Vec<&Appointment>> = HashMap::new();
    for appt in appointments {
        map.entry(slot_key(&appt.date, appt.start_hour()))
            .or_default()
            .push(appt);
    }
    for bucket in map.values_mut() {
        sort_by_start(bucket);
    }
    map
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

pub fn week_days(date: NaiveDate) -> Vec<NaiveDate> {
    week_start(date).iter_days().take(7).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayStats {
    pub count: usize,
    /// Sum of `end hour - start hour`; minutes are ignored.
    pub hours: i64,
}

pub fn day_stats(appointments: &[Appointment], date: &str) -> DayStats {
    appointments
        .iter()
        .filter(|appt| appt.date == date)
        .fold(DayStats::default(), |acc, appt| DayStats {
            count: acc.count + 1,
            hours: acc.hours + appt.end_hour() as i64 - appt.start_hour() as i64,
        })
}

/// `00:00`, `00:30`, ... `23:30`.
pub fn time_options() -> Vec<String> {
    (0..24)
        .flat_map(|hour| [format!("{:02}:00", hour), format!("{:02}:30", hour)])
        .collect()
}
