use std::fmt;
use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::api::ApiCalendarEvent;
use crate::models::time::{date_key, format_hhmm, local_wall_clock};

pub const DEFAULT_TREATMENT: &str = "Consulta";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    /// Maps the service's `estado`, ignoring case and surrounding whitespace
    /// (`"Si"` is confirmed). Anything unrecognised is `Pending`.
    pub fn from_estado(estado: &str) -> Self {
        match estado.trim().to_lowercase().as_str() {
            "cancelado" => AppointmentStatus::Cancelled,
            "si" | "confirmado" => AppointmentStatus::Confirmed,
            "finalizado" | "completado" => AppointmentStatus::Completed,
            _ => AppointmentStatus::Pending,
        }
    }

    pub fn as_estado(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pendiente",
            AppointmentStatus::Confirmed => "si",
            AppointmentStatus::Completed => "finalizado",
            AppointmentStatus::Cancelled => "cancelado",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pendiente",
            AppointmentStatus::Confirmed => "Confirmado",
            AppointmentStatus::Completed => "Completado",
            AppointmentStatus::Cancelled => "Cancelado",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts both the client names (`confirmed`) and the service vocabulary (`si`).
impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "pendiente" => Ok(AppointmentStatus::Pending),
            "confirmed" | "confirmado" | "si" => Ok(AppointmentStatus::Confirmed),
            "completed" | "completado" | "finalizado" => Ok(AppointmentStatus::Completed),
            "cancelled" | "canceled" | "cancelado" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown status `{}`", other)),
        }
    }
}

/// Client-side projection of a calendar event. Rebuilt on every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_name: String,
    pub patient_phone: String,
    /// `YYYY-MM-DD`, taken verbatim from the event's start string.
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub treatment: String,
    pub profesional: String,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn from_event(event: &ApiCalendarEvent, tz: Tz) -> Self {
        Appointment {
            id: event.id,
            patient_name: event.titulo.clone().unwrap_or_default(),
            patient_phone: event.celular.clone().unwrap_or_default(),
            date: date_key(&event.inicio).to_string(),
            start_time: time_of_day(event.id, &event.inicio, tz),
            end_time: time_of_day(event.id, &event.fin, tz),
            treatment: DEFAULT_TREATMENT.to_string(),
            profesional: event.profesional.clone().unwrap_or_default(),
            status: AppointmentStatus::from_estado(event.estado.as_deref().unwrap_or_default()),
        }
    }

    pub fn start_hour(&self) -> u32 {
        crate::models::time::hour_of(&self.start_time)
    }

    pub fn end_hour(&self) -> u32 {
        crate::models::time::hour_of(&self.end_time)
    }
}

fn time_of_day(id: i64, instant: &str, tz: Tz) -> String {
    match local_wall_clock(instant, tz) {
        Some(local) => format_hhmm(&local.time()),
        None => {
            warn!("Event {} has unreadable instant `{}`", id, instant);
            // keep the raw HH:MM if the string has one
            instant
                .split('T')
                .nth(1)
                .and_then(|t| t.get(..5))
                .unwrap_or("00:00")
                .to_string()
        }
    }
}
