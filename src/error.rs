// Taxonomía de errores del cargador de horarios.
use serde::Serialize;
use thiserror::Error;

/// Error único del crate. Es `Clone` porque un mismo fallo se entrega a todos
/// los que esperan una petición compartida en vuelo.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum TimetableError {
    /// Payload del upstream incompleto o con formato incorrecto.
    #[error("validation error: {0}")]
    Validation(String),
    /// Fallo de transporte/HTTP al hablar con el upstream.
    #[error("fetch error: {0}")]
    Fetch(String),
    /// El llamador violó el contrato (p.ej. pedir una semana antes de inicializar).
    #[error("precondition error: {0}")]
    Precondition(String),
}

impl TimetableError {
    /// Construye un `Fetch` con el mensaje del upstream recortado, o con
    /// `fallback` si el mensaje queda vacío.
    pub fn fetch(message: impl AsRef<str>, fallback: &str) -> Self {
        let trimmed = message.as_ref().trim();
        if trimmed.is_empty() {
            TimetableError::Fetch(fallback.to_string())
        } else {
            TimetableError::Fetch(trimmed.to_string())
        }
    }

    /// Mensaje sin el prefijo de la variante, tal como se muestra al usuario.
    pub fn message(&self) -> &str {
        match self {
            TimetableError::Validation(m) | TimetableError::Fetch(m) | TimetableError::Precondition(m) => m,
        }
    }
}
