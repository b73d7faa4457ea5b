//! Create/edit forms and the payload fields derived from them.

pub mod text;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::error::FormError;
use crate::models::api::{ApiCliente, CreateTurnoPayload, UpdateTurnoFullPayload};
use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::models::time::{parse_date, parse_hhmm};
use crate::forms::text::{duration_text, fecha_text, local_iso, long_datetime_text};

pub const DEFAULT_START: &str = "09:00";
pub const DEFAULT_END: &str = "09:30";

/// Raw fields of the "new appointment" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentForm {
    pub nombre: String,
    pub celular: String,
    /// `YYYY-MM-DD`
    pub fecha: String,
    pub horario_comienzo: String,
    pub horario_fin: String,
    pub nombre_peluquero: String,
}

impl AppointmentForm {
    pub fn new(date: NaiveDate, profesional: &str) -> Self {
        Self {
            nombre: String::new(),
            celular: String::new(),
            fecha: date.format("%Y-%m-%d").to_string(),
            horario_comienzo: DEFAULT_START.to_string(),
            horario_fin: DEFAULT_END.to_string(),
            nombre_peluquero: profesional.to_string(),
        }
    }

    /// Prefills patient fields from the client directory.
    pub fn select_client(&mut self, client: &ApiCliente) {
        self.nombre = client.nombre.clone();
        self.celular = client.celular.clone();
    }

    pub fn to_payload(&self) -> Result<CreateTurnoPayload, FormError> {
        let times = TimeRange::parse(&self.fecha, &self.horario_comienzo, &self.horario_fin)?;
        require("nombre", &self.nombre)?;
        require("celular", &self.celular)?;
        require("nombrePeluquero", &self.nombre_peluquero)?;
        Ok(CreateTurnoPayload {
            celular: self.celular.trim().to_string(),
            nombre: self.nombre.trim().to_string(),
            fecha: fecha_text(times.date),
            horario_comienzo: local_iso(&times.start),
            horario_fin: local_iso(&times.end),
            horario_comienzo_texto: long_datetime_text(&times.start),
            horario_fin_texto: long_datetime_text(&times.end),
            duracion_texto: times.duration_text(),
            uid_cal: Uuid::new_v4().to_string(),
            nombre_peluquero: self.nombre_peluquero.trim().to_string(),
        })
    }
}

/// Raw fields of the edit form, prefilled from an existing appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditAppointmentForm {
    pub id: i64,
    pub nombre: String,
    pub celular: String,
    pub fecha: String,
    pub horario_comienzo: String,
    pub horario_fin: String,
    pub nombre_peluquero: String,
    pub estado: AppointmentStatus,
}

impl EditAppointmentForm {
    pub fn from_appointment(appt: &Appointment) -> Self {
        Self {
            id: appt.id,
            nombre: appt.patient_name.clone(),
            celular: appt.patient_phone.clone(),
            fecha: appt.date.clone(),
            horario_comienzo: appt.start_time.clone(),
            horario_fin: appt.end_time.clone(),
            nombre_peluquero: appt.profesional.clone(),
            estado: appt.status,
        }
    }

    pub fn to_payload(&self) -> Result<UpdateTurnoFullPayload, FormError> {
        let times = TimeRange::parse(&self.fecha, &self.horario_comienzo, &self.horario_fin)?;
        require("nombre", &self.nombre)?;
        Ok(UpdateTurnoFullPayload {
            celular: self.celular.trim().to_string(),
            nombre: self.nombre.trim().to_string(),
            fecha: fecha_text(times.date),
            horario_comienzo: local_iso(&times.start),
            horario_fin: local_iso(&times.end),
            horario_comienzo_texto: long_datetime_text(&times.start),
            horario_fin_texto: long_datetime_text(&times.end),
            duracion_texto: times.duration_text(),
            nombre_peluquero: self.nombre_peluquero.trim().to_string(),
            estado: self.estado.as_estado().to_string(),
        })
    }
}

struct TimeRange {
    date: NaiveDate,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeRange {
    fn parse(fecha: &str, start: &str, end: &str) -> Result<Self, FormError> {
        let date = parse_date(fecha).ok_or_else(|| FormError::InvalidDate(fecha.to_string()))?;
        let start_time = parse_time(start)?;
        let end_time = parse_time(end)?;
        if end_time <= start_time {
            return Err(FormError::EndNotAfterStart {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self {
            date,
            start: date.and_time(start_time),
            end: date.and_time(end_time),
        })
    }

    fn duration_text(&self) -> String {
        duration_text((self.end - self.start).num_minutes())
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, FormError> {
    parse_hhmm(value).ok_or_else(|| FormError::InvalidTime(value.to_string()))
}

fn require(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::MissingField(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fixtures::appt;

    fn form() -> AppointmentForm {
        let mut form = AppointmentForm::new(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), "Gabriela García");
        form.nombre = " Ana Pérez ".to_string();
        form.celular = "5493573000000".to_string();
        form.horario_comienzo = "09:00".to_string();
        form.horario_fin = "10:30".to_string();
        form
    }

    #[test]
    fn create_payload_derives_service_fields() {
        let payload = form().to_payload().unwrap();
        assert_eq!(payload.nombre, "Ana Pérez");
        assert_eq!(payload.fecha, "05-01-2026");
        assert_eq!(payload.horario_comienzo, "2026-01-05T09:00:00.000");
        assert_eq!(payload.horario_fin, "2026-01-05T10:30:00.000");
        assert_eq!(payload.horario_comienzo_texto, "Lunes, 5 de enero de 2026 - 09:00hs");
        assert_eq!(payload.horario_fin_texto, "Lunes, 5 de enero de 2026 - 10:30hs");
        assert_eq!(payload.duracion_texto, "1-hora-30-minutos");
        assert_eq!(payload.nombre_peluquero, "Gabriela García");
        assert!(Uuid::parse_str(&payload.uid_cal).is_ok());
    }

    #[test]
    fn each_payload_gets_a_fresh_uid() {
        let form = form();
        assert_ne!(form.to_payload().unwrap().uid_cal, form.to_payload().unwrap().uid_cal);
    }

    #[test]
    fn rejects_end_before_start_and_missing_fields() {
        let mut bad = form();
        bad.horario_fin = "08:30".to_string();
        assert!(matches!(bad.to_payload(), Err(FormError::EndNotAfterStart { .. })));

        let mut bad = form();
        bad.nombre = "  ".to_string();
        assert_eq!(bad.to_payload(), Err(FormError::MissingField("nombre")));

        let mut bad = form();
        bad.fecha = "05/01/2026".to_string();
        assert!(matches!(bad.to_payload(), Err(FormError::InvalidDate(_))));

        let mut bad = form();
        bad.horario_comienzo = "9h".to_string();
        assert!(matches!(bad.to_payload(), Err(FormError::InvalidTime(_))));
    }

    #[test]
    fn select_client_prefills_patient() {
        let mut form = AppointmentForm::new(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), "Dra");
        form.select_client(&ApiCliente {
            celular: "111".to_string(),
            nombre: "Luis".to_string(),
        });
        assert_eq!(form.nombre, "Luis");
        assert_eq!(form.celular, "111");
        assert_eq!(form.horario_comienzo, DEFAULT_START);
    }

    #[test]
    fn edit_payload_maps_status_back() {
        let mut existing = appt(9, "2026-01-05", "11:00", "12:00");
        existing.status = AppointmentStatus::Completed;
        let edit = EditAppointmentForm::from_appointment(&existing);
        let payload = edit.to_payload().unwrap();
        assert_eq!(payload.estado, "finalizado");
        assert_eq!(payload.duracion_texto, "1-hora");
        assert_eq!(payload.horario_comienzo, "2026-01-05T11:00:00.000");
    }
}
