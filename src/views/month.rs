use chrono::{Datelike, Days, Months, NaiveDate};

use crate::models::appointment::Appointment;
use crate::views::{group_by_date, week_start};

/// How many appointments a month cell previews before "+N".
pub const MONTH_PREVIEWS: usize = 2;

#[derive(Debug, Clone)]
pub struct MonthCell<'a> {
    pub date: NaiveDate,
    pub in_month: bool,
    pub count: usize,
    pub previews: Vec<&'a Appointment>,
    pub overflow: usize,
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Monday-first days covering every week that touches `month`'s month.
pub fn month_days(month: NaiveDate) -> Vec<NaiveDate> {
    let first = first_of_month(month);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.checked_sub_days(Days::new(1)))
        .unwrap_or(first);
    let start = week_start(first);
    let end = week_start(last)
        .checked_add_days(Days::new(6))
        .unwrap_or(last);
    start.iter_days().take_while(|day| *day <= end).collect()
}

pub fn month_grid(appointments: &[Appointment], month: NaiveDate) -> Vec<MonthCell<'_>> {
    let by_date = group_by_date(appointments);
    let target = first_of_month(month);
    month_days(month)
        .into_iter()
        .map(|date| {
            let key = date.format("%Y-%m-%d").to_string();
            let bucket = by_date.get(&key).cloned().unwrap_or_default();
            let count = bucket.len();
            MonthCell {
                date,
                in_month: date.month() == target.month() && date.year() == target.year(),
                count,
                previews: bucket.into_iter().take(MONTH_PREVIEWS).collect(),
                overflow: count.saturating_sub(MONTH_PREVIEWS),
            }
        })
        .collect()
}
