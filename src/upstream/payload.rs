use serde::{Deserialize, Serialize};

use crate::error::TimetableError;
use crate::models::{PeriodType, Section, SemesterWindow};

/// Semestre tal como llega del upstream; todo opcional hasta validar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterPayload {
    #[serde(default, alias = "id")]
    pub semester_id: Option<i64>,
    #[serde(default, alias = "name")]
    pub semester_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub term_type: Option<String>,
    #[serde(default)]
    pub academic_year: Option<String>,
}

fn present(field: &Option<String>) -> Option<String> {
    field.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()).map(str::to_string)
}

impl SemesterPayload {
    /// Exige id, nombre, fecha de inicio y de fin. Las fechas se validan sólo
    /// por presencia: si no parsean, el total cae al valor por defecto.
    pub fn validate(self) -> Result<SemesterWindow, TimetableError> {
        let mut missing: Vec<&str> = Vec::new();
        if self.semester_id.is_none() { missing.push("id"); }
        let name = present(&self.semester_name);
        if name.is_none() { missing.push("name"); }
        let start = present(&self.start_date);
        if start.is_none() { missing.push("startDate"); }
        let end = present(&self.end_date);
        if end.is_none() { missing.push("endDate"); }

        match (self.semester_id, name, start, end) {
            (Some(id), Some(name), Some(start_date), Some(end_date)) => Ok(SemesterWindow {
                id,
                name,
                start_date,
                end_date,
                term_type: self.term_type,
                academic_year: self.academic_year,
            }),
            _ => Err(TimetableError::Validation(format!(
                "semester payload is missing required fields: {}",
                missing.join(", ")
            ))),
        }
    }
}

/// Bloque horario crudo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPayload {
    #[serde(default)]
    pub section_id: Option<u32>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub period_type: Option<PeriodType>,
    #[serde(default)]
    pub campus: Option<String>,
}

impl SectionPayload {
    fn validate(self, index: usize) -> Result<Section, TimetableError> {
        let start_time = present(&self.start_time);
        let end_time = present(&self.end_time);
        let (Some(section_id), Some(start_time), Some(end_time)) = (self.section_id, start_time, end_time) else {
            return Err(TimetableError::Validation(format!(
                "section entry #{} is missing sectionId, startTime or endTime",
                index
            )));
        };
        // si falta la jornada, se infiere por la hora de inicio
        let period_type = self
            .period_type
            .or_else(|| PeriodType::from_start_time(&start_time))
            .unwrap_or(PeriodType::Morning);
        Ok(Section { section_id, start_time, end_time, period_type, campus: self.campus })
    }

    /// Valida todas las entradas y las ordena por `section_id` ascendente.
    /// Una sola entrada incompleta invalida el catálogo completo.
    pub fn validate_catalog(raw: Vec<SectionPayload>) -> Result<Vec<Section>, TimetableError> {
        let mut sections = raw
            .into_iter()
            .enumerate()
            .map(|(i, p)| p.validate(i))
            .collect::<Result<Vec<Section>, TimetableError>>()?;
        sections.sort_by_key(|s| s.section_id);
        Ok(sections)
    }
}
