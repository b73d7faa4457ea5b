pub mod appointment_store;
pub mod auth_api;
pub mod auth_store;
pub mod calendar_api;
pub mod client_store;
pub mod clients_api;
pub mod schedules_api;
