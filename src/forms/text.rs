use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use chrono_tz::Tz;

use crate::models::time::local_wall_clock;

const WEEKDAYS: [&str; 7] = [
    "lunes",
    "martes",
    "miércoles",
    "jueves",
    "viernes",
    "sábado",
    "domingo",
];

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Duration as the service expects it: `1-hora-30-minutos`, `2-horas`, `45-minutos`.
pub fn duration_text(minutes: i64) -> String {
    let hours = minutes.div_euclid(60);
    let rest = minutes.rem_euclid(60);
    let hour_word = if hours > 1 { "horas" } else { "hora" };
    if hours > 0 && rest > 0 {
        format!("{}-{}-{}-minutos", hours, hour_word, rest)
    } else if hours > 0 {
        format!("{}-{}", hours, hour_word)
    } else {
        format!("{}-minutos", rest)
    }
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAYS[date.weekday().num_days_from_monday() as usize]
}

pub fn month_name(date: NaiveDate) -> &'static str {
    MONTHS[date.month0() as usize]
}

/// `Lunes, 5 de enero de 2026 - 09:00hs`
pub fn long_datetime_text(at: &NaiveDateTime) -> String {
    let date = at.date();
    capitalize(&format!(
        "{}, {} de {} de {} - {:02}:{:02}hs",
        weekday_name(date),
        date.day(),
        month_name(date),
        date.year(),
        at.hour(),
        at.minute()
    ))
}

/// `lunes 5 de enero`, used for headings.
pub fn short_date_text(date: NaiveDate) -> String {
    format!("{} {} de {}", weekday_name(date), date.day(), month_name(date))
}

/// `05-01-2026`
pub fn fecha_text(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Local timestamp without offset: `2026-01-05T09:00:00.000`.
pub fn local_iso(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}

/// Slot instant rendered as clinic-local `HH:MM`; the raw string if unreadable.
pub fn slot_time_text(slot: &str, tz: Tz) -> String {
    local_wall_clock(slot, tz)
        .map(|local| local.format("%H:%M").to_string())
        .unwrap_or_else(|| slot.to_string())
}
