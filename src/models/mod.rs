pub mod api;
pub mod appointment;
pub mod time;
pub mod user;
