use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::error::ApiError;
use crate::models::api::{ConfirmarTurnoPayload, CreateTurnoPayload, UpdateTurnoFullPayload};
use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::models::time::{date_key, local_day_bounds, local_wall_clock, parse_date, to_utc_iso};
use crate::service::calendar_api::CalendarApi;

pub const ERR_FETCH_APPOINTMENTS: &str = "Error al cargar los turnos";
pub const ERR_FETCH_SLOTS: &str = "Error al cargar horarios disponibles";
pub const ERR_CREATE_FROM_SLOT: &str = "Error al crear turno";
pub const ERR_CREATE: &str = "Error al crear el turno";
pub const ERR_UPDATE_STATUS: &str = "Error al actualizar el estado del turno";
pub const ERR_UPDATE: &str = "Error al actualizar el turno";
pub const ERR_CANCEL: &str = "Error al cancelar el turno";
pub const ERR_DELETE: &str = "Error al eliminar el turno";

/// Default reason sent when a status change to cancelled goes through `CancelarTurno`.
pub const DEFAULT_CANCELLATION_REASON: &str = "cancelado";

/// Distinguishes "nothing fetched yet", "fetched and empty" and "fetch failed".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentState {
    pub appointments: Vec<Appointment>,
    pub available_slots: Vec<String>,
    pub slots_date: Option<NaiveDate>,
    pub is_loading: bool,
    pub is_loading_slots: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub appointments_state: LoadState,
    pub slots_state: LoadState,
}

/// Cache of the appointment list and the available slots of one day.
///
/// Mutations go to the service and are followed by a full refetch; nothing is
/// merged locally. Fetches carry a generation ticket so a response that
/// resolves after a newer fetch started is dropped instead of applied.
pub struct AppointmentStore {
    api: Arc<dyn CalendarApi>,
    timezone: Tz,
    state: Mutex<AppointmentState>,
    fetch_generation: AtomicU64,
    slots_generation: AtomicU64,
}

impl AppointmentStore {
    pub fn new(api: Arc<dyn CalendarApi>, timezone: Tz) -> Self {
        Self {
            api,
            timezone,
            state: Mutex::new(AppointmentState::default()),
            fetch_generation: AtomicU64::new(0),
            slots_generation: AtomicU64::new(0),
        }
    }

    pub async fn snapshot(&self) -> AppointmentState {
        self.state.lock().await.clone()
    }

    pub async fn appointments(&self) -> Vec<Appointment> {
        self.state.lock().await.appointments.clone()
    }

    pub async fn available_slots(&self) -> Vec<String> {
        self.state.lock().await.available_slots.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    pub async fn appointments_by_date(&self, date: &str) -> Vec<Appointment> {
        let state = self.state.lock().await;
        state
            .appointments
            .iter()
            .filter(|appt| appt.date == date)
            .cloned()
            .collect()
    }

    pub async fn appointment_by_id(&self, id: i64) -> Option<Appointment> {
        let state = self.state.lock().await;
        state.appointments.iter().find(|appt| appt.id == id).cloned()
    }

    /// Drops cached data and invalidates any in-flight fetch.
    pub async fn reset(&self) {
        self.fetch_generation.fetch_add(1, Ordering::SeqCst);
        self.slots_generation.fetch_add(1, Ordering::SeqCst);
        *self.state.lock().await = AppointmentState::default();
    }

    /// Replaces the cached list with a fresh `GET /Calendar`.
    pub async fn fetch_appointments(&self) -> bool {
        let ticket = self.fetch_generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.lock().await;
            state.is_loading = true;
            state.error = None;
            state.appointments_state = LoadState::Loading;
        }

        let result = self.api.list_events().await;

        let mut state = self.state.lock().await;
        if self.fetch_generation.load(Ordering::SeqCst) != ticket {
            debug!("Discarding stale appointment fetch #{}", ticket);
            return result.is_ok();
        }
        match result {
            Ok(events) => {
                state.appointments = events
                    .iter()
                    .map(|event| Appointment::from_event(event, self.timezone))
                    .collect();
                state.is_loading = false;
                state.last_updated = Some(Utc::now());
                state.appointments_state = LoadState::Loaded;
                info!("Loaded {} appointments", state.appointments.len());
                true
            }
            Err(err) => {
                error!("Error fetching appointments: {}", err);
                state.error = Some(ERR_FETCH_APPOINTMENTS.to_string());
                state.is_loading = false;
                state.appointments_state = LoadState::Failed(ERR_FETCH_APPOINTMENTS.to_string());
                false
            }
        }
    }

    /// Loads the bookable slots of `date` (clinic-local day).
    pub async fn fetch_available_slots(&self, date: NaiveDate) -> bool {
        let ticket = self.slots_generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.lock().await;
            state.is_loading_slots = true;
            state.error = None;
            state.slots_state = LoadState::Loading;
        }

        let result = match local_day_bounds(date, self.timezone) {
            Some((start, end)) => {
                self.api
                    .available_slots(&to_utc_iso(&start), &to_utc_iso(&end))
                    .await
            }
            None => Err(ApiError::Decode(format!(
                "no local midnight for {} in {}",
                date, self.timezone
            ))),
        };

        let mut state = self.state.lock().await;
        if self.slots_generation.load(Ordering::SeqCst) != ticket {
            debug!("Discarding stale slot fetch #{} for {}", ticket, date);
            return result.is_ok();
        }
        match result {
            Ok(mut response) => {
                let key = date.format("%Y-%m-%d").to_string();
                state.available_slots = response.slots.remove(&key).unwrap_or_default();
                state.slots_date = Some(date);
                state.is_loading_slots = false;
                state.slots_state = LoadState::Loaded;
                true
            }
            Err(err) => {
                error!("Error fetching available slots for {}: {}", date, err);
                state.error = Some(ERR_FETCH_SLOTS.to_string());
                state.is_loading_slots = false;
                state.slots_state = LoadState::Failed(ERR_FETCH_SLOTS.to_string());
                false
            }
        }
    }

    pub async fn create(&self, payload: &CreateTurnoPayload) -> bool {
        self.mutate("creating appointment", ERR_CREATE, self.api.create(payload))
            .await
    }

    /// Books one of the slots returned by [`AppointmentStore::fetch_available_slots`].
    pub async fn create_from_slot(&self, slot: &str, patient_name: &str, patient_phone: &str) -> bool {
        let payload = ConfirmarTurnoPayload {
            start_time: slot.to_string(),
            nombre: patient_name.to_string(),
            celular: patient_phone.to_string(),
            duracion: None,
            duracion_texto: None,
            time_zone: Some(self.timezone.name().to_string()),
        };
        let booked = self
            .mutate(
                "booking slot",
                ERR_CREATE_FROM_SLOT,
                self.api.confirmar_turno(&payload),
            )
            .await;
        if booked {
            if let Some(date) = self.slot_date(slot) {
                self.fetch_available_slots(date).await;
            }
        }
        booked
    }

    pub async fn update_status(&self, id: i64, estado: &str) -> bool {
        self.mutate(
            "updating appointment status",
            ERR_UPDATE_STATUS,
            self.api.update_estado(id, estado),
        )
        .await
    }

    /// Status change as the day panel does it: cancelling goes through
    /// `CancelarTurno`, everything else through `UpdateEstado`.
    pub async fn set_status(&self, id: i64, status: AppointmentStatus) -> bool {
        match status {
            AppointmentStatus::Cancelled => self.cancel(id, DEFAULT_CANCELLATION_REASON).await,
            other => self.update_status(id, other.as_estado()).await,
        }
    }

    pub async fn update_full(&self, id: i64, payload: &UpdateTurnoFullPayload) -> bool {
        self.mutate("updating appointment", ERR_UPDATE, self.api.update_full(id, payload))
            .await
    }

    pub async fn cancel(&self, id: i64, cancellation_reason: &str) -> bool {
        self.mutate(
            "cancelling appointment",
            ERR_CANCEL,
            self.api.cancel(id, cancellation_reason),
        )
        .await
    }

    pub async fn delete(&self, id: i64) -> bool {
        self.mutate("deleting appointment", ERR_DELETE, self.api.delete_turno(id))
            .await
    }

    async fn mutate<F>(&self, action: &str, failure: &'static str, call: F) -> bool
    where
        F: Future<Output = Result<(), ApiError>>,
    {
        {
            let mut state = self.state.lock().await;
            state.is_loading = true;
            state.error = None;
        }

        match call.await {
            Ok(()) => {
                info!("Succeeded {}", action);
                self.fetch_appointments().await;
                self.state.lock().await.is_loading = false;
                true
            }
            Err(err) => {
                error!("Error {}: {}", action, err);
                let mut state = self.state.lock().await;
                state.error = Some(failure.to_string());
                state.is_loading = false;
                false
            }
        }
    }

    fn slot_date(&self, slot: &str) -> Option<NaiveDate> {
        local_wall_clock(slot, self.timezone)
            .map(|local| local.date())
            .or_else(|| parse_date(date_key(slot)))
    }
}
