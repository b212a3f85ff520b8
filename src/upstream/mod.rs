//! Colaboradores upstream: semestre actual, catálogo de bloques y horario semanal.
//!
//! Submódulos:
//! - `payload`: formas crudas del JSON y su validación
//! - `file`: implementación que lee documentos JSON de un directorio

mod file;
mod payload;

pub use file::FileApi;
pub use payload::{SectionPayload, SemesterPayload};

use async_trait::async_trait;

use crate::error::TimetableError;
use crate::models::ScheduleEntry;

/// Las tres llamadas de red que consume el cargador. Las implementaciones
/// devuelven `Fetch` ante fallos de transporte; la validación de campos la
/// hacen los cargadores.
#[async_trait]
pub trait TimetableApi: Send + Sync {
    async fn get_current_semester(&self) -> Result<SemesterPayload, TimetableError>;

    async fn get_all_sections(&self) -> Result<Vec<SectionPayload>, TimetableError>;

    async fn get_schedule_for_week(&self, semester_id: i64, week: u32) -> Result<Vec<ScheduleEntry>, TimetableError>;
}
