// Biblioteca raíz del crate `semanario`.
// Carga orquestada del horario semanal (semestre actual, bloques horarios y
// horario por semana) y codificación de selecciones de semanas.
pub mod calendar;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod server;
mod server_handlers;
pub mod session;
pub mod upstream;
pub mod weeks;

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;

pub use config::Config;
pub use error::TimetableError;
pub use session::Timetable;
