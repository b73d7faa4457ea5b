use chrono::NaiveDate;

use crate::models::appointment::Appointment;
use crate::views::sort_by_start;

/// The appointments of one date, ordered by start time.
pub fn day_appointments(appointments: &[Appointment], date: NaiveDate) -> Vec<&Appointment> {
    let key = date.format("%Y-%m-%d").to_string();
    let mut day: Vec<&Appointment> = appointments.iter().filter(|appt| appt.date == key).collect();
    sort_by_start(&mut day);
    day
}

/// 24 hourly rows, each holding the appointments that start in that hour.
pub fn day_schedule(appointments: &[Appointment], date: NaiveDate) -> Vec<(u32, Vec<&Appointment>)> {
    let mut hours: Vec<(u32, Vec<&Appointment>)> = (0..24).map(|hour| (hour, Vec::new())).collect();
    for appt in day_appointments(appointments, date) {
        if let Some((_, bucket)) = hours.get_mut(appt.start_hour() as usize) {
            bucket.push(appt);
        }
    }
    hours
}
