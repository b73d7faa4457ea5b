use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::America::Argentina::Buenos_Aires;
use chrono_tz::America::Santiago;
use chrono_tz::Asia::Tokyo;
use dentalAgenda::error::ApiError;
use dentalAgenda::forms::AppointmentForm;
use dentalAgenda::models::api::{
    ApiCalendarEvent, ApiTurnosResponse, AvailableSlotsResponse, ConfirmarTurnoPayload,
    CreateTurnoPayload, UpdateTurnoFullPayload,
};
use dentalAgenda::models::appointment::AppointmentStatus;
use dentalAgenda::service::appointment_store::{
    AppointmentStore, ERR_CANCEL, ERR_CREATE, ERR_DELETE, ERR_FETCH_APPOINTMENTS,
    ERR_FETCH_SLOTS, LoadState,
};
use dentalAgenda::service::calendar_api::CalendarApi;
use dentalAgenda::views::group_by_date;
use tokio::sync::{Mutex, Notify};

/// In-memory stand-in for the scheduling service.
#[derive(Default)]
struct FakeCalendar {
    events: Mutex<Vec<ApiCalendarEvent>>,
    slots: Mutex<HashMap<String, Vec<String>>>,
    calls: Mutex<Vec<String>>,
    slot_ranges: Mutex<Vec<(String, String)>>,
    fail_mutations: bool,
    fail_fetch: bool,
    next_id: AtomicUsize,
}

impl FakeCalendar {
    fn with_events(events: Vec<ApiCalendarEvent>) -> Self {
        Self {
            events: Mutex::new(events),
            next_id: AtomicUsize::new(100),
            ..Default::default()
        }
    }

    async fn record(&self, call: &str) {
        self.calls.lock().await.push(call.to_string());
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.fail_mutations {
            Err(ApiError::Server {
                status: 500,
                message: "boom".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

fn event(id: i64, inicio: &str, fin: &str, estado: &str) -> ApiCalendarEvent {
    ApiCalendarEvent {
        id,
        titulo: Some(format!("Paciente {}", id)),
        inicio: inicio.to_string(),
        fin: fin.to_string(),
        profesional: Some("Gabriela García".to_string()),
        estado: Some(estado.to_string()),
        celular: Some("5493573000000".to_string()),
    }
}

#[async_trait]
impl CalendarApi for FakeCalendar {
    async fn list_events(&self) -> Result<Vec<ApiCalendarEvent>, ApiError> {
        self.record("list").await;
        if self.fail_fetch {
            return Err(ApiError::Server {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(self.events.lock().await.clone())
    }

    async fn create(&self, turno: &CreateTurnoPayload) -> Result<(), ApiError> {
        self.record("create").await;
        self.check()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        let mut created = event(id, &turno.horario_comienzo, &turno.horario_fin, "pendiente");
        created.titulo = Some(turno.nombre.clone());
        self.events.lock().await.push(created);
        Ok(())
    }

    async fn update_estado(&self, id: i64, estado: &str) -> Result<(), ApiError> {
        self.record(&format!("estado:{}:{}", id, estado)).await;
        self.check()?;
        for e in self.events.lock().await.iter_mut().filter(|e| e.id == id) {
            e.estado = Some(estado.to_string());
        }
        Ok(())
    }

    async fn cancel(&self, id: i64, cancellation_reason: &str) -> Result<(), ApiError> {
        self.record(&format!("cancel:{}:{}", id, cancellation_reason)).await;
        self.check()?;
        for e in self.events.lock().await.iter_mut().filter(|e| e.id == id) {
            e.estado = Some("cancelado".to_string());
        }
        Ok(())
    }

    async fn update_full(&self, id: i64, turno: &UpdateTurnoFullPayload) -> Result<(), ApiError> {
        self.record(&format!("update:{}", id)).await;
        self.check()?;
        for e in self.events.lock().await.iter_mut().filter(|e| e.id == id) {
            e.titulo = Some(turno.nombre.clone());
            e.inicio = turno.horario_comienzo.clone();
            e.fin = turno.horario_fin.clone();
            e.estado = Some(turno.estado.clone());
        }
        Ok(())
    }

    async fn delete_turno(&self, id: i64) -> Result<(), ApiError> {
        self.record(&format!("delete:{}", id)).await;
        self.check()?;
        self.events.lock().await.retain(|e| e.id != id);
        Ok(())
    }

    async fn available_slots(
        &self,
        start_time: &str,
        end_time: &str,
    ) -> Result<AvailableSlotsResponse, ApiError> {
        self.record("slots").await;
        self.slot_ranges
            .lock()
            .await
            .push((start_time.to_string(), end_time.to_string()));
        if self.fail_fetch {
            return Err(ApiError::Server {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(AvailableSlotsResponse {
            slots: self.slots.lock().await.clone(),
        })
    }

    async fn confirmar_turno(&self, data: &ConfirmarTurnoPayload) -> Result<(), ApiError> {
        self.record(&format!("confirm:{}", data.start_time)).await;
        self.check()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        self.events
            .lock()
            .await
            .push(event(id, &data.start_time, &data.start_time, "pendiente"));
        self.slots
            .lock()
            .await
            .values_mut()
            .for_each(|slots| slots.retain(|s| s != &data.start_time));
        Ok(())
    }

    async fn turnos(
        &self,
        _estado: Option<&str>,
        _id_empleado: Option<i64>,
    ) -> Result<ApiTurnosResponse, ApiError> {
        Ok(ApiTurnosResponse {
            status: 200,
            data: Vec::new(),
        })
    }
}

fn store(fake: Arc<FakeCalendar>) -> AppointmentStore {
    AppointmentStore::new(fake, Buenos_Aires)
}

fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
}

#[tokio::test]
async fn fetch_maps_events_and_marks_loaded() {
    let fake = Arc::new(FakeCalendar::with_events(vec![
        event(1, "2026-01-05T09:00:00", "2026-01-05T09:30:00", "si"),
        event(2, "2026-01-05T10:00:00", "2026-01-05T11:00:00", "reprogramado"),
    ]));
    let store = store(fake);

    assert_eq!(store.snapshot().await.appointments_state, LoadState::Idle);
    assert!(store.fetch_appointments().await);

    let state = store.snapshot().await;
    assert_eq!(state.appointments_state, LoadState::Loaded);
    assert!(!state.is_loading);
    assert!(state.last_updated.is_some());
    assert_eq!(state.appointments.len(), 2);
    assert_eq!(state.appointments[0].status, AppointmentStatus::Confirmed);
    assert_eq!(state.appointments[1].status, AppointmentStatus::Pending);
    assert_eq!(state.appointments[1].start_time, "10:00");
}

#[tokio::test]
async fn empty_and_failed_fetches_are_distinguishable() {
    let empty = store(Arc::new(FakeCalendar::with_events(Vec::new())));
    assert!(empty.fetch_appointments().await);
    let state = empty.snapshot().await;
    assert!(state.appointments.is_empty());
    assert_eq!(state.appointments_state, LoadState::Loaded);
    assert_eq!(state.error, None);

    let failing = store(Arc::new(FakeCalendar {
        fail_fetch: true,
        ..FakeCalendar::with_events(Vec::new())
    }));
    assert!(!failing.fetch_appointments().await);
    let state = failing.snapshot().await;
    assert_eq!(
        state.appointments_state,
        LoadState::Failed(ERR_FETCH_APPOINTMENTS.to_string())
    );
    assert_eq!(state.error.as_deref(), Some(ERR_FETCH_APPOINTMENTS));
    assert!(!state.is_loading);
}

#[tokio::test]
async fn create_refetches_without_duplicates() {
    let fake = Arc::new(FakeCalendar::with_events(vec![event(
        1,
        "2026-01-05T09:00:00",
        "2026-01-05T09:30:00",
        "pendiente",
    )]));
    let store = store(fake.clone());
    assert!(store.fetch_appointments().await);

    let mut form = AppointmentForm::new(jan(5), "Gabriela García");
    form.nombre = "Ana".to_string();
    form.celular = "123".to_string();
    form.horario_comienzo = "11:00".to_string();
    form.horario_fin = "12:00".to_string();
    assert!(store.create(&form.to_payload().unwrap()).await);
    assert!(store.create(&form.to_payload().unwrap()).await);

    let appointments = store.appointments().await;
    assert_eq!(appointments.len(), 3);
    let mut ids: Vec<i64> = appointments.iter().map(|a| a.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 3);

    let by_date = group_by_date(&appointments);
    let starts: Vec<&str> = by_date["2026-01-05"].iter().map(|a| a.start_time.as_str()).collect();
    assert_eq!(starts, vec!["09:00", "11:00", "11:00"]);

    let calls = fake.calls.lock().await.clone();
    assert_eq!(calls, vec!["list", "create", "list", "create", "list"]);
}

#[tokio::test]
async fn delete_and_update_reflect_fresh_server_state() {
    let fake = Arc::new(FakeCalendar::with_events(vec![
        event(1, "2026-01-05T09:00:00", "2026-01-05T09:30:00", "pendiente"),
        event(2, "2026-01-05T10:00:00", "2026-01-05T10:30:00", "pendiente"),
    ]));
    let store = store(fake);
    assert!(store.fetch_appointments().await);

    assert!(store.delete(1).await);
    assert!(store.appointment_by_id(1).await.is_none());
    assert_eq!(store.appointments().await.len(), 1);

    assert!(store.update_status(2, "si").await);
    assert_eq!(
        store.appointment_by_id(2).await.unwrap().status,
        AppointmentStatus::Confirmed
    );
    assert_eq!(store.appointments_by_date("2026-01-05").await.len(), 1);
}

#[tokio::test]
async fn cancelling_through_set_status_uses_cancel_endpoint() {
    let fake = Arc::new(FakeCalendar::with_events(vec![event(
        7,
        "2026-01-05T09:00:00",
        "2026-01-05T09:30:00",
        "si",
    )]));
    let store = store(fake.clone());

    assert!(store.set_status(7, AppointmentStatus::Cancelled).await);
    assert!(store.set_status(7, AppointmentStatus::Completed).await);

    let calls = fake.calls.lock().await.clone();
    assert!(calls.contains(&"cancel:7:cancelado".to_string()));
    assert!(calls.contains(&"estado:7:finalizado".to_string()));
}

#[tokio::test]
async fn failed_mutations_record_message_and_skip_refetch() {
    let fake = Arc::new(FakeCalendar {
        fail_mutations: true,
        ..FakeCalendar::with_events(Vec::new())
    });
    let store = store(fake.clone());

    let mut form = AppointmentForm::new(jan(5), "Dra");
    form.nombre = "Ana".to_string();
    form.celular = "1".to_string();
    assert!(!store.create(&form.to_payload().unwrap()).await);
    assert_eq!(store.error().await.as_deref(), Some(ERR_CREATE));
    assert!(!store.snapshot().await.is_loading);

    assert!(!store.cancel(3, "cancelado").await);
    assert_eq!(store.error().await.as_deref(), Some(ERR_CANCEL));

    assert!(!store.delete(3).await);
    assert_eq!(store.error().await.as_deref(), Some(ERR_DELETE));

    let calls = fake.calls.lock().await.clone();
    assert!(!calls.contains(&"list".to_string()));
}

#[tokio::test]
async fn slots_are_taken_from_the_requested_date_only() {
    let fake = Arc::new(FakeCalendar::with_events(Vec::new()));
    fake.slots.lock().await.extend([
        (
            "2026-01-05".to_string(),
            vec!["2026-01-05T12:00:00.000Z".to_string(), "2026-01-05T12:30:00.000Z".to_string()],
        ),
        ("2026-01-06".to_string(), vec!["2026-01-06T12:00:00.000Z".to_string()]),
    ]);
    let store = store(fake.clone());

    assert!(store.fetch_available_slots(jan(5)).await);
    let state = store.snapshot().await;
    assert_eq!(state.available_slots.len(), 2);
    assert_eq!(state.slots_date, Some(jan(5)));
    assert_eq!(state.slots_state, LoadState::Loaded);

    let ranges = fake.slot_ranges.lock().await.clone();
    assert_eq!(
        ranges[0],
        (
            "2026-01-05T03:00:00.000Z".to_string(),
            "2026-01-06T02:59:59.999Z".to_string()
        )
    );

    assert!(store.fetch_available_slots(jan(7)).await);
    assert!(store.available_slots().await.is_empty());
}

#[tokio::test]
async fn slots_east_of_utc_use_the_local_date_key() {
    let fake = Arc::new(FakeCalendar::with_events(Vec::new()));
    fake.slots.lock().await.extend([
        ("2026-01-04".to_string(), vec!["2026-01-04T23:00:00.000Z".to_string()]),
        (
            "2026-01-05".to_string(),
            vec!["2026-01-05T00:00:00.000Z".to_string(), "2026-01-05T01:00:00.000Z".to_string()],
        ),
    ]);
    let store = AppointmentStore::new(fake.clone(), Tokyo);

    assert!(store.fetch_available_slots(jan(5)).await);
    assert_eq!(
        store.available_slots().await,
        vec!["2026-01-05T00:00:00.000Z".to_string(), "2026-01-05T01:00:00.000Z".to_string()]
    );
    let ranges = fake.slot_ranges.lock().await.clone();
    assert_eq!(
        ranges[0],
        (
            "2026-01-04T15:00:00.000Z".to_string(),
            "2026-01-05T14:59:59.999Z".to_string()
        )
    );
}

#[tokio::test]
async fn slots_load_on_a_day_whose_midnight_is_skipped() {
    let fake = Arc::new(FakeCalendar::with_events(Vec::new()));
    fake.slots
        .lock()
        .await
        .insert("2026-09-06".to_string(), vec!["2026-09-06T13:00:00.000Z".to_string()]);
    let store = AppointmentStore::new(fake.clone(), Santiago);
    let sunday = NaiveDate::from_ymd_opt(2026, 9, 6).unwrap();

    assert!(store.fetch_available_slots(sunday).await);
    let state = store.snapshot().await;
    assert_eq!(state.error, None);
    assert_eq!(state.available_slots.len(), 1);
    assert_eq!(
        fake.slot_ranges.lock().await[0].0,
        "2026-09-06T04:00:00.000Z".to_string()
    );
}

#[tokio::test]
async fn slot_fetch_failure_is_recorded() {
    let store = store(Arc::new(FakeCalendar {
        fail_fetch: true,
        ..FakeCalendar::with_events(Vec::new())
    }));
    assert!(!store.fetch_available_slots(jan(5)).await);
    let state = store.snapshot().await;
    assert_eq!(state.error.as_deref(), Some(ERR_FETCH_SLOTS));
    assert!(!state.is_loading_slots);
}

#[tokio::test]
async fn booking_a_slot_refreshes_appointments_and_slots() {
    let fake = Arc::new(FakeCalendar::with_events(Vec::new()));
    fake.slots.lock().await.insert(
        "2026-01-05".to_string(),
        vec!["2026-01-05T12:00:00.000Z".to_string(), "2026-01-05T12:30:00.000Z".to_string()],
    );
    let store = store(fake.clone());
    assert!(store.fetch_available_slots(jan(5)).await);

    assert!(store.create_from_slot("2026-01-05T12:00:00.000Z", "Ana", "123").await);

    let state = store.snapshot().await;
    assert_eq!(state.appointments.len(), 1);
    assert_eq!(state.appointments[0].start_time, "09:00");
    assert_eq!(state.available_slots, vec!["2026-01-05T12:30:00.000Z".to_string()]);
}

/// First list call blocks until released and returns the old server state.
struct RacingCalendar {
    inner: FakeCalendar,
    list_calls: AtomicUsize,
    release_first: Notify,
}

#[async_trait]
impl CalendarApi for RacingCalendar {
    async fn list_events(&self) -> Result<Vec<ApiCalendarEvent>, ApiError> {
        let call = self.list_calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            self.release_first.notified().await;
            return Ok(vec![event(1, "2026-01-05T09:00:00", "2026-01-05T09:30:00", "pendiente")]);
        }
        self.inner.list_events().await
    }

    async fn create(&self, turno: &CreateTurnoPayload) -> Result<(), ApiError> {
        self.inner.create(turno).await
    }

    async fn update_estado(&self, id: i64, estado: &str) -> Result<(), ApiError> {
        self.inner.update_estado(id, estado).await
    }

    async fn cancel(&self, id: i64, reason: &str) -> Result<(), ApiError> {
        self.inner.cancel(id, reason).await
    }

    async fn update_full(&self, id: i64, turno: &UpdateTurnoFullPayload) -> Result<(), ApiError> {
        self.inner.update_full(id, turno).await
    }

    async fn delete_turno(&self, id: i64) -> Result<(), ApiError> {
        self.inner.delete_turno(id).await
    }

    async fn available_slots(&self, start: &str, end: &str) -> Result<AvailableSlotsResponse, ApiError> {
        self.inner.available_slots(start, end).await
    }

    async fn confirmar_turno(&self, data: &ConfirmarTurnoPayload) -> Result<(), ApiError> {
        self.inner.confirmar_turno(data).await
    }

    async fn turnos(&self, estado: Option<&str>, id: Option<i64>) -> Result<ApiTurnosResponse, ApiError> {
        self.inner.turnos(estado, id).await
    }
}

#[tokio::test]
async fn stale_fetch_does_not_overwrite_newer_result() {
    let fake = Arc::new(RacingCalendar {
        inner: FakeCalendar::with_events(vec![
            event(1, "2026-01-05T09:00:00", "2026-01-05T09:30:00", "pendiente"),
            event(2, "2026-01-05T10:00:00", "2026-01-05T10:30:00", "pendiente"),
        ]),
        list_calls: AtomicUsize::new(0),
        release_first: Notify::new(),
    });
    let store = Arc::new(AppointmentStore::new(fake.clone(), Buenos_Aires));

    let slow = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_appointments().await }
    });
    while fake.list_calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    assert!(store.fetch_appointments().await);
    assert_eq!(store.appointments().await.len(), 2);

    fake.release_first.notify_one();
    slow.await.unwrap();

    assert_eq!(store.appointments().await.len(), 2);
    assert_eq!(store.snapshot().await.appointments_state, LoadState::Loaded);
}

#[tokio::test]
async fn reset_clears_cached_state() {
    let store = store(Arc::new(FakeCalendar::with_events(vec![event(
        1,
        "2026-01-05T09:00:00",
        "2026-01-05T09:30:00",
        "pendiente",
    )])));
    assert!(store.fetch_appointments().await);
    store.reset().await;
    let state = store.snapshot().await;
    assert!(state.appointments.is_empty());
    assert_eq!(state.appointments_state, LoadState::Idle);
}
