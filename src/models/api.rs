//! Request and response bodies of the remote scheduling service.
//!
//! Field names follow the service (Spanish, mixed casing); Rust names are
//! snake_case with serde renames.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub usuario: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiLoginResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "token_Type", default)]
    pub token_type: Option<String>,
    #[serde(rename = "expires_At", default)]
    pub expires_at: Option<String>,
    #[serde(rename = "idUsuario", default)]
    pub id_usuario: Option<i64>,
    #[serde(rename = "idEmpleado", default)]
    pub id_empleado: Option<i64>,
    #[serde(rename = "idRol", default)]
    pub id_rol: Option<i64>,
    #[serde(rename = "idEmpresa", default)]
    pub id_empresa: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiDecodedUser {
    #[serde(rename = "idUsuario")]
    pub id_usuario: String,
    pub login: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "idEmpleado", default)]
    pub id_empleado: Option<String>,
    #[serde(rename = "idRol")]
    pub id_rol: String,
    #[serde(rename = "idEmpresa", default)]
    pub id_empresa: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiDecodeTokenResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub usuario: ApiDecodedUser,
    #[serde(default)]
    pub expira: Option<String>,
}

/// One entry of `GET /Calendar`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCalendarEvent {
    pub id: i64,
    #[serde(default)]
    pub titulo: Option<String>,
    pub inicio: String,
    pub fin: String,
    #[serde(default)]
    pub profesional: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub celular: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTurnoPayload {
    pub celular: String,
    pub nombre: String,
    pub fecha: String,
    pub horario_comienzo: String,
    pub horario_fin: String,
    pub horario_comienzo_texto: String,
    pub horario_fin_texto: String,
    pub duracion_texto: String,
    pub uid_cal: String,
    pub nombre_peluquero: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTurnoFullPayload {
    pub celular: String,
    pub nombre: String,
    pub fecha: String,
    pub horario_comienzo: String,
    pub horario_fin: String,
    pub horario_comienzo_texto: String,
    pub horario_fin_texto: String,
    pub duracion_texto: String,
    pub nombre_peluquero: String,
    pub estado: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelTurnoRequest {
    pub cancellation_reason: String,
}

/// Booking of a slot returned by `AvailableSlots`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmarTurnoPayload {
    pub start_time: String,
    pub nombre: String,
    pub celular: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duracion: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duracion_texto: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailableSlotsResponse {
    #[serde(default)]
    pub slots: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCliente {
    pub celular: String,
    pub nombre: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTurnoDetalle {
    pub id: i64,
    #[serde(default)]
    pub celular: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub fecha: String,
    pub horario_comienzo: Option<String>,
    pub horario_fin: Option<String>,
    #[serde(default)]
    pub horario_comienzo_texto: String,
    #[serde(default)]
    pub horario_fin_texto: String,
    #[serde(default)]
    pub duracion_texto: String,
    #[serde(default)]
    pub uid_cal: String,
    #[serde(default)]
    pub nombre_peluquero: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTurnosResponse {
    pub status: i64,
    #[serde(default)]
    pub data: Vec<ApiTurnoDetalle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindow {
    pub days: Vec<String>,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSchedule {
    pub id: i64,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub time_zone: String,
    #[serde(default)]
    pub availability: Vec<AvailabilityWindow>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub overrides: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiScheduleEnvelope {
    #[serde(default)]
    pub status: String,
    pub data: ApiSchedule,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiDisponibilidadResponse {
    #[serde(default)]
    pub status: String,
    pub data: ApiScheduleEnvelope,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDisponibilidadRequest {
    pub schedule_id: i64,
    /// 0 = Sunday .. 6 = Saturday.
    pub days: Vec<u8>,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExcepcionRequest {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiExcepcionesResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTipoEvento {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    pub length: u32,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiEventTypes {
    #[serde(default)]
    pub event_types: Vec<ApiTipoEvento>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTiposEventoResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub empleado_id: Option<i64>,
    #[serde(default)]
    pub empleado: Option<String>,
    #[serde(default)]
    pub data: ApiEventTypes,
}
