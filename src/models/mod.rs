// Estructuras de datos principales

use serde::{Deserialize, Serialize};

/// Ventana del semestre actual tal como la entrega el upstream (ya validada).
/// Inmutable: un refetch exitoso la reemplaza completa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterWindow {
    pub id: i64,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub term_type: Option<String>,
    pub academic_year: Option<String>,
}

/// Valores derivados de la ventana: nunca se guardan por separado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedWeekInfo {
    /// Siempre >= 1
    pub total_weeks: u32,
    /// En [1, total_weeks]
    pub current_week: u32,
}

/// Ventana + semanas derivadas. Se publica como una sola unidad para que
/// ningún consumidor vea una actualización a medias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSemester {
    pub window: SemesterWindow,
    pub weeks: DerivedWeekInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Morning,
    Afternoon,
    Evening,
}

impl PeriodType {
    /// Infiere la jornada a partir de la hora de inicio ("HH:MM").
    pub fn from_start_time(start_time: &str) -> Option<PeriodType> {
        let minutes = time_to_minutes(start_time)?;
        Some(match minutes {
            m if m < 12 * 60 => PeriodType::Morning,
            m if m < 18 * 60 => PeriodType::Afternoon,
            _ => PeriodType::Evening,
        })
    }
}

/// "08:30" -> 510. Acepta "HH:MM" y "HH:MM:SS".
pub fn time_to_minutes(t: &str) -> Option<u32> {
    let mut parts = t.trim().split(':');
    let hh = parts.next()?.trim().parse::<u32>().ok()?;
    let mm = parts.next()?.trim().parse::<u32>().ok()?;
    if hh > 23 || mm > 59 { return None; }
    Some(hh * 60 + mm)
}

/// Entrada del catálogo de bloques horarios (節次).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub section_id: u32,
    pub start_time: String,
    pub end_time: String,
    pub period_type: PeriodType,
    pub campus: Option<String>,
}

/// Una ocurrencia de clase. `weeks` es la cadena de rangos persistida
/// ("1-8,10,12-16").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub schedule_id: i64,
    #[serde(default)]
    pub semester_id: Option<i64>,
    pub course_id: i64,
    pub teacher_id: String,
    pub classroom_id: i64,
    pub section_id: u32,
    /// 1 = lunes ... 7 = domingo
    pub week_day: u8,
    pub weeks: String,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub classroom_building: Option<String>,
    #[serde(default)]
    pub classroom_room_number: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub credit: Option<f64>,
}

impl ScheduleEntry {
    pub fn occurs_in_week(&self, week: u32) -> bool {
        crate::weeks::contains_week(&self.weeks, week)
    }
}

/// Clave compuesta de un horario semanal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekKey {
    pub semester_id: i64,
    pub week: u32,
}

impl WeekKey {
    pub fn new(semester_id: i64, week: u32) -> Self {
        WeekKey { semester_id, week }
    }
}

impl std::fmt::Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "semestre {} / semana {}", self.semester_id, self.week)
    }
}

/// Estado de carga de un recurso (semestre, catálogo, o cada clave semanal).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    NotRequested,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded)
    }
}
