use async_trait::async_trait;

use crate::clients::http::ApiClient;
use crate::error::ApiError;
use crate::models::api::{
    ApiCalendarEvent, ApiTurnosResponse, AvailableSlotsResponse, CancelTurnoRequest,
    ConfirmarTurnoPayload, CreateTurnoPayload, UpdateTurnoFullPayload,
};

/// `/Calendar` and slot endpoints of the scheduling service.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    async fn list_events(&self) -> Result<Vec<ApiCalendarEvent>, ApiError>;
    async fn create(&self, turno: &CreateTurnoPayload) -> Result<(), ApiError>;
    async fn update_estado(&self, id: i64, estado: &str) -> Result<(), ApiError>;
    async fn cancel(&self, id: i64, cancellation_reason: &str) -> Result<(), ApiError>;
    async fn update_full(&self, id: i64, turno: &UpdateTurnoFullPayload) -> Result<(), ApiError>;
    async fn delete_turno(&self, id: i64) -> Result<(), ApiError>;
    async fn available_slots(
        &self,
        start_time: &str,
        end_time: &str,
    ) -> Result<AvailableSlotsResponse, ApiError>;
    async fn confirmar_turno(&self, data: &ConfirmarTurnoPayload) -> Result<(), ApiError>;
    async fn turnos(
        &self,
        estado: Option<&str>,
        id_empleado: Option<i64>,
    ) -> Result<ApiTurnosResponse, ApiError>;
}

#[async_trait]
impl CalendarApi for ApiClient {
    async fn list_events(&self) -> Result<Vec<ApiCalendarEvent>, ApiError> {
        self.send_json(self.get("/Calendar")).await
    }

    async fn create(&self, turno: &CreateTurnoPayload) -> Result<(), ApiError> {
        self.send(self.post("/Calendar/CreateTurno").json(turno)).await?;
        Ok(())
    }

    async fn update_estado(&self, id: i64, estado: &str) -> Result<(), ApiError> {
        let request = self
            .put("/Calendar/UpdateEstado")
            .query(&[("id", id.to_string()), ("estado", estado.to_string())]);
        self.send(request).await?;
        Ok(())
    }

    async fn cancel(&self, id: i64, cancellation_reason: &str) -> Result<(), ApiError> {
        let body = CancelTurnoRequest {
            cancellation_reason: cancellation_reason.to_string(),
        };
        let request = self
            .post("/Calendar/CancelarTurno")
            .query(&[("id", id)])
            .json(&body);
        self.send(request).await?;
        Ok(())
    }

    async fn update_full(&self, id: i64, turno: &UpdateTurnoFullPayload) -> Result<(), ApiError> {
        let request = self
            .put("/Calendar/UpdateTurnoFull")
            .query(&[("id", id)])
            .json(turno);
        self.send(request).await?;
        Ok(())
    }

    async fn delete_turno(&self, id: i64) -> Result<(), ApiError> {
        self.send(self.delete("/Calendar/DeleteTurno").query(&[("id", id)]))
            .await?;
        Ok(())
    }

    async fn available_slots(
        &self,
        start_time: &str,
        end_time: &str,
    ) -> Result<AvailableSlotsResponse, ApiError> {
        let request = self
            .get("/Schedules/AvailableSlots")
            .query(&[("startTime", start_time), ("endTime", end_time)]);
        self.send_json(request).await
    }

    async fn confirmar_turno(&self, data: &ConfirmarTurnoPayload) -> Result<(), ApiError> {
        self.send(self.post("/Calendar/ConfirmarTurno").json(data)).await?;
        Ok(())
    }

    async fn turnos(
        &self,
        estado: Option<&str>,
        id_empleado: Option<i64>,
    ) -> Result<ApiTurnosResponse, ApiError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(estado) = estado {
            params.push(("estado", estado.to_string()));
        }
        if let Some(id) = id_empleado {
            params.push(("idEmpleado", id.to_string()));
        }
        self.send_json(self.get("/turnos").query(&params)).await
    }
}
