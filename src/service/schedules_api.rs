use async_trait::async_trait;

use crate::clients::http::ApiClient;
use crate::error::ApiError;
use crate::models::api::{
    ApiDisponibilidadResponse, ApiExcepcionesResponse, ApiTiposEventoResponse,
    CreateDisponibilidadRequest, CreateExcepcionRequest,
};

/// Employee availability, exceptions and event types.
#[async_trait]
pub trait SchedulesApi: Send + Sync {
    async fn disponibilidad(&self, empleado_id: i64) -> Result<ApiDisponibilidadResponse, ApiError>;
    async fn create_disponibilidad(
        &self,
        empleado_id: i64,
        data: &CreateDisponibilidadRequest,
    ) -> Result<(), ApiError>;
    async fn excepciones(&self, empleado_id: i64) -> Result<ApiExcepcionesResponse, ApiError>;
    async fn create_excepcion(
        &self,
        empleado_id: i64,
        data: &CreateExcepcionRequest,
    ) -> Result<(), ApiError>;
    async fn delete_excepcion(&self, availability_id: i64, empleado_id: i64) -> Result<(), ApiError>;
    async fn tipos_evento(&self, empleado_id: i64) -> Result<ApiTiposEventoResponse, ApiError>;
}

#[async_trait]
impl SchedulesApi for ApiClient {
    async fn disponibilidad(&self, empleado_id: i64) -> Result<ApiDisponibilidadResponse, ApiError> {
        let request = self
            .get("/Schedules/disponibilidad")
            .query(&[("empleadoId", empleado_id)]);
        self.send_json(request).await
    }

    async fn create_disponibilidad(
        &self,
        empleado_id: i64,
        data: &CreateDisponibilidadRequest,
    ) -> Result<(), ApiError> {
        let request = self
            .post("/Schedules/disponibilidad")
            .query(&[("empleadoId", empleado_id)])
            .json(data);
        self.send(request).await?;
        Ok(())
    }

    async fn excepciones(&self, empleado_id: i64) -> Result<ApiExcepcionesResponse, ApiError> {
        let request = self
            .get("/Schedules/excepciones")
            .query(&[("empleadoId", empleado_id)]);
        self.send_json(request).await
    }

    async fn create_excepcion(
        &self,
        empleado_id: i64,
        data: &CreateExcepcionRequest,
    ) -> Result<(), ApiError> {
        let request = self
            .post("/Schedules/excepciones")
            .query(&[("empleadoId", empleado_id)])
            .json(data);
        self.send(request).await?;
        Ok(())
    }

    async fn delete_excepcion(&self, availability_id: i64, empleado_id: i64) -> Result<(), ApiError> {
        let request = self
            .delete(&format!("/Schedules/excepciones/{}", availability_id))
            .query(&[("empleadoId", empleado_id)]);
        self.send(request).await?;
        Ok(())
    }

    async fn tipos_evento(&self, empleado_id: i64) -> Result<ApiTiposEventoResponse, ApiError> {
        self.send_json(self.get(&format!("/tipos-evento/{}", empleado_id)))
            .await
    }
}
