use chrono::NaiveDate;

use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::views::week::in_week;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    Day(NaiveDate),
    Week(NaiveDate),
}

#[derive(Debug, Clone)]
pub struct ListFilter {
    pub scope: ListScope,
    pub status: Option<AppointmentStatus>,
    pub search: Option<String>,
}

impl ListFilter {
    pub fn day(date: NaiveDate) -> Self {
        Self {
            scope: ListScope::Day(date),
            status: None,
            search: None,
        }
    }

    /// A status or name filter searches every cached appointment and ignores the scope.
    pub fn is_global(&self) -> bool {
        self.status.is_some() || self.search.as_deref().is_some_and(|s| !s.is_empty())
    }
}

pub fn filter_appointments<'a>(appointments: &'a [Appointment], filter: &ListFilter) -> Vec<&'a Appointment> {
    let needle = filter.search.as_deref().map(str::to_lowercase).unwrap_or_default();
    let global = filter.is_global();

    let mut result: Vec<&Appointment> = appointments
        .iter()
        .filter(|appt| {
            global
                || match filter.scope {
                    ListScope::Day(date) => appt.date == date.format("%Y-%m-%d").to_string(),
                    ListScope::Week(anchor) => in_week(appt, anchor),
                }
        })
        .filter(|appt| filter.status.is_none_or(|status| appt.status == status))
        .filter(|appt| needle.is_empty() || appt.patient_name.to_lowercase().contains(&needle))
        .collect();

    result.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.start_time.cmp(&b.start_time)));
    result
}
