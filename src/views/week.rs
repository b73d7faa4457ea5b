use std::collections::HashMap;
use std::ops::Range;

use chrono::NaiveDate;

use crate::models::appointment::Appointment;
use crate::models::time::parse_date;
use crate::views::{group_by_date_hour, slot_key, week_days, week_start};

pub const ALL_HOURS: Range<u32> = 0..24;
/// Rows of the compact weekly grid (08:00 to 19:00).
pub const WORKING_HOURS: Range<u32> = 8..20;

#[derive(Debug, Clone)]
pub struct WeekGrid<'a> {
    pub days: Vec<NaiveDate>,
    buckets: HashMap<String, Vec<&'a Appointment>>,
}

impl<'a> WeekGrid<'a> {
    pub fn slot(&self, day: NaiveDate, hour: u32) -> &[&'a Appointment] {
        let key = slot_key(&day.format("%Y-%m-%d").to_string(), hour);
        self.buckets.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

pub fn in_week(appt: &Appointment, anchor: NaiveDate) -> bool {
    parse_date(&appt.date).is_some_and(|date| week_start(date) == week_start(anchor))
}

/// Buckets only the appointments of `anchor`'s Monday-first week.
pub fn week_grid(appointments: &[Appointment], anchor: NaiveDate) -> WeekGrid<'_> {
    WeekGrid {
        days: week_days(anchor),
        buckets: group_by_date_hour(appointments.iter().filter(|appt| in_week(appt, anchor))),
    }
}
