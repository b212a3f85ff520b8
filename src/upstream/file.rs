// Upstream respaldado por archivos JSON en disco.
//
// Estructura esperada del directorio:
//   semester.json   -> objeto SemesterPayload
//   sections.json   -> arreglo de SectionPayload
//   schedules.json  -> arreglo de ScheduleEntry (con `semesterId`)

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use std::path::{Path, PathBuf};

use super::{SectionPayload, SemesterPayload, TimetableApi};
use crate::error::TimetableError;
use crate::models::ScheduleEntry;

pub const SEMESTER_FILE: &str = "semester.json";
pub const SECTIONS_FILE: &str = "sections.json";
pub const SCHEDULES_FILE: &str = "schedules.json";

#[derive(Debug, Clone)]
pub struct FileApi {
    data_dir: PathBuf,
}

impl FileApi {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        FileApi { data_dir: data_dir.as_ref().to_path_buf() }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Lee y deserializa un documento. Fallos de lectura o JSON mal formado
    /// son `Fetch`; JSON válido con forma o tipos incorrectos es `Validation`.
    async fn read_json<T: DeserializeOwned>(&self, file_name: &str, fallback: &str) -> Result<T, TimetableError> {
        let path = self.data_dir.join(file_name);
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| TimetableError::fetch(format!("failed to read {}: {}", path.display(), e), fallback))?;
        serde_json::from_str::<T>(&contents).map_err(|e| match e.classify() {
            Category::Data => TimetableError::Validation(format!("unexpected payload format in {}: {}", path.display(), e)),
            Category::Io | Category::Syntax | Category::Eof => {
                TimetableError::fetch(format!("invalid JSON in {}: {}", path.display(), e), fallback)
            }
        })
    }
}

#[async_trait]
impl TimetableApi for FileApi {
    async fn get_current_semester(&self) -> Result<SemesterPayload, TimetableError> {
        self.read_json(SEMESTER_FILE, "unable to load current semester").await
    }

    async fn get_all_sections(&self) -> Result<Vec<SectionPayload>, TimetableError> {
        self.read_json(SECTIONS_FILE, "unable to load class sections").await
    }

    /// Entradas del semestre cuya cadena `weeks` cubre la semana pedida.
    /// Las entradas sin `semesterId` se consideran del semestre en curso.
    async fn get_schedule_for_week(&self, semester_id: i64, week: u32) -> Result<Vec<ScheduleEntry>, TimetableError> {
        let fallback = format!("unable to load schedule for week {}", week);
        let all: Vec<ScheduleEntry> = self.read_json(SCHEDULES_FILE, &fallback).await?;
        Ok(all
            .into_iter()
            .filter(|e| e.semester_id.map_or(true, |id| id == semester_id))
            .filter(|e| e.occurs_in_week(week))
            .collect())
    }
}
